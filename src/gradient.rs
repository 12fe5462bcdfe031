//! Sobel gradients with magnitude and quantized direction.
//!
//! The image `y` axis points down, so an angle of 45° points towards the bottom right.

use std::f32::consts::*;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::grid::{Grid, Image};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// How the gradient magnitude is derived from its components.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientNorm {
    /// `|gx| + |gy|`
    #[default]
    L1,
    /// `sqrt(gx² + gy²)`
    L2,
}

impl GradientNorm {
    fn magnitude(self, gx: f32, gy: f32) -> f32 {
        match self {
            GradientNorm::L1 => gx.abs() + gy.abs(),
            GradientNorm::L2 => (gx.powi(2) + gy.powi(2)).sqrt(),
        }
    }
}

/// One of the four principal gradient orientations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Along the X-axis, i.e. a vertical edge.
    Deg0,
    /// Towards the bottom right.
    Deg45,
    /// Along the Y-axis, i.e. a horizontal edge.
    Deg90,
    /// Towards the bottom left.
    Deg135,
}

impl Orientation {
    /// Quantizes an angle in radians to the nearest principal orientation. Opposite
    /// directions fold onto the same orientation.
    pub fn from_angle(theta: f32) -> Orientation {
        let folded = theta.rem_euclid(PI);
        if folded < FRAC_PI_8 || folded >= 7.0 * FRAC_PI_8 {
            Orientation::Deg0
        } else if folded < 3.0 * FRAC_PI_8 {
            Orientation::Deg45
        } else if folded < 5.0 * FRAC_PI_8 {
            Orientation::Deg90
        } else {
            Orientation::Deg135
        }
    }

    /// The neighbour offset one step forward along this orientation. The backward
    /// neighbour is the negation.
    pub fn step(self) -> (isize, isize) {
        match self {
            Orientation::Deg0 => (1, 0),
            Orientation::Deg45 => (1, 1),
            Orientation::Deg90 => (0, 1),
            Orientation::Deg135 => (-1, 1),
        }
    }
}

/// Gradient magnitude and direction for every pixel of an image.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientField {
    magnitude: Grid<f32>,
    direction: Grid<f32>,
}

impl GradientField {
    /// Pairs a magnitude grid with a direction grid (radians). Both must have the same shape.
    pub fn new(magnitude: Grid<f32>, direction: Grid<f32>) -> Result<GradientField> {
        if !magnitude.same_shape(&direction) {
            return Err(Error::InvalidInput(format!(
                "magnitude is {:?} but direction is {:?}",
                magnitude.dimensions(),
                direction.dimensions()
            )));
        }
        Ok(GradientField { magnitude, direction })
    }

    /// Per-pixel gradient strength.
    pub fn magnitude(&self) -> &Grid<f32> {
        &self.magnitude
    }

    /// Per-pixel `atan2(gy, gx)` in radians.
    pub fn direction(&self) -> &Grid<f32> {
        &self.direction
    }

    /// The quantized direction at `(x, y)`.
    pub fn orientation(&self, x: usize, y: usize) -> Orientation {
        Orientation::from_angle(self.direction.get(x, y))
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        self.magnitude.dimensions()
    }
}

/// Convolves the image with the 3×3 Sobel kernels. Border pixels are replicated outwards,
/// like `gaussian_blur` does.
pub fn sobel(image: &Image, norm: GradientNorm) -> GradientField {
    let (width, height) = image.dimensions();
    let components: Grid<(f32, f32)> = Grid::par_from_fn(width, height, |x, y| {
        let mut sum = (0.0, 0.0);
        for (ky, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
            for (kx, (kern_x, kern_y)) in row_x.iter().zip(row_y.iter()).enumerate() {
                let pix = image.get_clamped(
                    x as isize + kx as isize - 1,
                    y as isize + ky as isize - 1,
                ) as f32;
                sum.0 += pix * kern_x;
                sum.1 += pix * kern_y;
            }
        }
        sum
    });
    GradientField {
        magnitude: components.map(|(gx, gy)| norm.magnitude(gx, gy)),
        direction: components.map(|(gx, gy)| gy.atan2(gx)),
    }
}
