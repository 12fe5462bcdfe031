use std::path::PathBuf;

use anyhow::{Context, Result};
use canny_edge::{canny, load_image, load_params, CannyParams, GradientNorm, Image};
use clap::Parser;
use log::info;

/// Find the edges in an image using the Canny algorithm.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Image to read, converted to grayscale.
    image: PathBuf,
    /// Low hysteresis threshold.
    #[arg(requires = "high")]
    low: Option<f32>,
    /// High hysteresis threshold.
    high: Option<f32>,
    /// Width of the Gaussian kernel (positive, odd).
    #[arg(long)]
    kernel_size: Option<usize>,
    /// Standard deviation of the Gaussian kernel.
    #[arg(long)]
    sigma: Option<f32>,
    /// Use the Euclidean gradient magnitude instead of |gx| + |gy|.
    #[arg(long)]
    l2: bool,
    /// TOML file with detector parameters. Command line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the edge map to the terminal, down-sampled to this many columns.
    #[arg(long, value_name = "COLUMNS")]
    preview: Option<usize>,
}

impl Args {
    fn params(&self) -> Result<CannyParams> {
        let mut params = match &self.config {
            Some(path) => load_params(path)?,
            None => CannyParams::default(),
        };
        if let (Some(low), Some(high)) = (self.low, self.high) {
            params = params.with_thresholds(low, high);
        }
        if let Some(kernel_size) = self.kernel_size {
            params.kernel_size = kernel_size;
        }
        if let Some(sigma) = self.sigma {
            params.sigma = sigma;
        }
        if self.l2 {
            params.norm = GradientNorm::L2;
        }
        Ok(params)
    }
}

/// Renders a binary edge map as text, one character per block of pixels. Blocks are twice
/// as tall as they are wide to make up for the shape of terminal cells.
fn render_preview(edges: &Image, columns: usize) -> String {
    let (width, height) = edges.dimensions();
    let block_w = ((width + columns - 1) / columns.max(1)).max(1);
    let block_h = block_w * 2;
    let mut out = String::new();
    for by in (0..height).step_by(block_h) {
        for bx in (0..width).step_by(block_w) {
            let hit = (by..(by + block_h).min(height))
                .any(|y| (bx..(bx + block_w).min(width)).any(|x| edges.get(x, y) != 0));
            out.push(if hit { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.params()?;
    info!("parameters: {:?}", params);

    let image = load_image(&args.image)?;
    let detection = canny(&image, &params)
        .with_context(|| format!("edge detection failed for {}", args.image.display()))?;

    println!(
        "{}: {}x{}, {} edge pixels",
        args.image.display(),
        detection.width(),
        detection.height(),
        detection.edge_count()
    );
    if let Some(columns) = args.preview {
        anyhow::ensure!(columns > 0, "--preview needs at least one column");
        print!("{}", render_preview(&detection.to_binary(), columns));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_override_defaults() {
        let args = Args::parse_from(["canny", "in.png", "50", "150", "--sigma", "2.0", "--l2"]);
        let params = args.params().unwrap();
        assert_eq!((params.low_threshold, params.high_threshold), (50.0, 150.0));
        assert_eq!(params.sigma, 2.0);
        assert_eq!(params.norm, GradientNorm::L2);
        assert_eq!(params.kernel_size, 5);
    }

    #[test]
    fn low_without_high_is_rejected() {
        assert!(Args::try_parse_from(["canny", "in.png", "50"]).is_err());
    }

    #[test]
    fn preview_marks_blocks_with_edges() {
        let edges = Image::from_fn(8, 4, |x, _| if x == 5 { 255 } else { 0 });
        assert_eq!(render_preview(&edges, 4), "..#.\n");
        assert_eq!(render_preview(&edges, 8), ".....#..\n.....#..\n");
    }
}
