use std::time::Instant;

use log::debug;

use crate::config::CannyParams;
use crate::error::{Error, Result};
use crate::gradient::sobel;
use crate::grid::Image;
use crate::hysteresis::{hysteresis, EdgeLabel, EdgeMap};
use crate::smooth::gaussian_blur;
use crate::suppress::non_maximum_suppression;

/// The result of running the detector over an image.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    edges: EdgeMap,
}

impl Detection {
    /// Width of the source image.
    pub fn width(&self) -> usize {
        self.edges.dimensions().0
    }

    /// Height of the source image.
    pub fn height(&self) -> usize {
        self.edges.dimensions().1
    }

    /// Whether the pixel at `(x, y)` lies on an edge.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.edges.get(x, y) == EdgeLabel::Strong
    }

    /// Number of edge pixels.
    pub fn edge_count(&self) -> usize {
        self.edges.count(EdgeLabel::Strong)
    }

    /// The per-pixel labels. After linking, only `Strong` and `NonEdge` remain.
    pub fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    /// The edge map as a binary raster of 0 and 255.
    pub fn to_binary(&self) -> Image {
        self.edges.to_binary()
    }

    /// The edge map as a binary `image` buffer.
    pub fn as_image(&self) -> image::GrayImage {
        self.edges.as_image()
    }
}

/// Computes the edges in an image using the Canny method.
///
/// The image is blurred with a `kernel_size` wide Gaussian of standard deviation `sigma`,
/// differentiated with Sobel kernels, thinned by non-maximum suppression and finally
/// thresholded with hysteresis: magnitudes above `high_threshold` are edges, magnitudes
/// above `low_threshold` are edges only when connected to one.
pub fn canny(image: &Image, params: &CannyParams) -> Result<Detection> {
    params.validate()?;
    if image.is_empty() {
        return Err(Error::InvalidInput(format!(
            "image must not be empty, got {}x{}",
            image.width(),
            image.height()
        )));
    }

    let time = Instant::now();
    let blurred = gaussian_blur(image, params.kernel_size, params.sigma)?;
    debug!("[{:?}] smoothing", time.elapsed());

    let time = Instant::now();
    let field = sobel(&blurred, params.norm);
    debug!("[{:?}] gradient", time.elapsed());

    let time = Instant::now();
    let suppressed = non_maximum_suppression(&field);
    debug!("[{:?}] non-maximum suppression", time.elapsed());

    let time = Instant::now();
    let edges = hysteresis(&suppressed, params.low_threshold, params.high_threshold)?;
    debug!("[{:?}] hysteresis", time.elapsed());

    Ok(Detection { edges })
}

/// Like `canny`, for anything that converts into an `image::GrayImage`.
pub fn canny_image<T: Into<image::GrayImage>>(image: T, params: &CannyParams) -> Result<Detection> {
    canny(&Image::from(image.into()), params)
}
