use image::GrayImage;

use crate::error::{Error, Result};
use crate::grid::{Grid, Image};

/// Classification of a single pixel. Labels only ever move up: `NonEdge` → `Weak` → `Strong`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    /// Not part of an edge.
    #[default]
    NonEdge,
    /// Above the low threshold, an edge only if connected to a strong one.
    Weak,
    /// Part of an edge.
    Strong,
}

/// A label for every pixel of an image.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeMap {
    labels: Grid<EdgeLabel>,
}

impl EdgeMap {
    /// Wraps a label grid.
    pub fn new(labels: Grid<EdgeLabel>) -> EdgeMap {
        EdgeMap { labels }
    }

    /// The underlying label grid.
    pub fn labels(&self) -> &Grid<EdgeLabel> {
        &self.labels
    }

    /// The label at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> EdgeLabel {
        self.labels.get(x, y)
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        self.labels.dimensions()
    }

    /// Number of pixels carrying `label`.
    pub fn count(&self, label: EdgeLabel) -> usize {
        self.labels.as_slice().iter().filter(|l| **l == label).count()
    }

    /// Collapses the labels to a binary raster: `Strong` becomes 255, everything else 0.
    pub fn to_binary(&self) -> Image {
        self.labels.map(|l| if l == EdgeLabel::Strong { 255 } else { 0 })
    }

    /// Same as `to_binary`, as an `image` crate buffer.
    pub fn as_image(&self) -> GrayImage {
        self.to_binary().to_gray_image()
    }
}

/// Checks that both thresholds are non-negative finite numbers and that `low < high`.
pub fn validate_thresholds(low: f32, high: f32) -> Result<()> {
    for (name, t) in [("low", low), ("high", high)] {
        if !t.is_finite() || t < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "{} threshold must be a non-negative finite number, got {}",
                name, t
            )));
        }
    }
    if low >= high {
        return Err(Error::InvalidParameter(format!(
            "low threshold ({}) must be below high threshold ({})",
            low, high
        )));
    }
    Ok(())
}

/// Labels every pixel by magnitude: above `high` is strong, above `low` is weak.
pub fn classify(magnitude: &Grid<f32>, low: f32, high: f32) -> EdgeMap {
    EdgeMap::new(magnitude.map(|m| {
        if m > high {
            EdgeLabel::Strong
        } else if m > low {
            EdgeLabel::Weak
        } else {
            EdgeLabel::NonEdge
        }
    }))
}

/// Promotes every weak pixel that is 8-connected to a strong pixel through other weak
/// pixels. The weak pixels that are left over are dropped.
pub fn link(edges: &EdgeMap) -> EdgeMap {
    let mut labels = edges.labels.clone();
    let (width, height) = labels.dimensions();
    let mut stack: Vec<(usize, usize)> = labels
        .enumerate()
        .filter(|(_, _, l)| *l == EdgeLabel::Strong)
        .map(|(x, y, _)| (x, y))
        .collect();

    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                if labels.get(nx, ny) == EdgeLabel::Weak {
                    labels.set(nx, ny, EdgeLabel::Strong);
                    stack.push((nx, ny));
                }
            }
        }
    }

    EdgeMap::new(labels.map(|l| match l {
        EdgeLabel::Weak => EdgeLabel::NonEdge,
        l => l,
    }))
}

/// Two-threshold edge linking over a suppressed magnitude grid.
pub fn hysteresis(magnitude: &Grid<f32>, low: f32, high: f32) -> Result<EdgeMap> {
    validate_thresholds(low, high)?;
    Ok(link(&classify(magnitude, low, high)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[f32]]) -> Grid<f32> {
        Grid::from_fn(rows[0].len(), rows.len(), |x, y| rows[y][x])
    }

    #[test]
    fn classifies_by_threshold() {
        let mag = grid(&[&[0.0, 50.0, 100.0, 150.0, 200.0, 250.0]]);
        let edges = classify(&mag, 100.0, 200.0);
        use EdgeLabel::*;
        assert_eq!(edges.labels().as_slice(), &[NonEdge, NonEdge, NonEdge, Weak, Weak, Strong]);
    }

    #[test]
    fn weak_chain_is_promoted() {
        let mag = grid(&[
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            &[250.0, 150.0, 0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 150.0, 0.0, 0.0, 150.0],
            &[0.0, 0.0, 0.0, 150.0, 0.0, 0.0],
        ]);
        let edges = hysteresis(&mag, 100.0, 200.0).unwrap();
        assert_eq!(edges.get(0, 1), EdgeLabel::Strong);
        assert_eq!(edges.get(1, 1), EdgeLabel::Strong);
        // Diagonal neighbours count.
        assert_eq!(edges.get(2, 2), EdgeLabel::Strong);
        assert_eq!(edges.get(3, 3), EdgeLabel::Strong);
        // Isolated weak pixels are dropped.
        assert_eq!(edges.get(5, 2), EdgeLabel::NonEdge);
        assert_eq!(edges.count(EdgeLabel::Weak), 0);
        assert_eq!(edges.count(EdgeLabel::Strong), 4);
    }

    #[test]
    fn weak_only_image_has_no_edges() {
        let mag = Grid::filled(8, 8, 150.0);
        let edges = hysteresis(&mag, 100.0, 200.0).unwrap();
        assert_eq!(edges.count(EdgeLabel::Strong), 0);
    }

    #[test]
    fn long_chain_does_not_recurse() {
        // A weak snake across a large image, seeded at one end.
        let (width, height) = (512, 512);
        let mut mag = Grid::filled(width, height, 150.0f32);
        mag.set(0, 0, 300.0);
        let edges = hysteresis(&mag, 100.0, 200.0).unwrap();
        assert_eq!(edges.count(EdgeLabel::Strong), width * height);
    }

    #[test]
    fn binary_output() {
        let mag = grid(&[&[250.0, 0.0, 150.0]]);
        let edges = hysteresis(&mag, 100.0, 200.0).unwrap();
        assert_eq!(edges.to_binary().as_slice(), &[255, 0, 0]);
        let img = edges.as_image();
        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn rejects_bad_thresholds() {
        let mag = Grid::filled(2, 2, 0.0);
        assert!(matches!(hysteresis(&mag, 200.0, 100.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(hysteresis(&mag, 100.0, 100.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(hysteresis(&mag, -1.0, 100.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(hysteresis(&mag, 1.0, f32::INFINITY), Err(Error::InvalidParameter(_))));
        assert!(hysteresis(&mag, 0.0, 1.0).is_ok());
    }
}
