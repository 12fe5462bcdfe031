use crate::gradient::{GradientField, Orientation};
use crate::grid::Grid;

/// Narrows the width of detected edges down to a single pixel.
///
/// A pixel keeps its magnitude only if it is a local maximum along its quantized gradient
/// direction. Along the axes it must be strictly greater than the backward neighbour and at
/// least as large as the forward one, so of a ridge that is two equal pixels wide only the
/// backward pixel survives. Along the diagonals it must be strictly greater than both.
/// Neighbours outside the image count as zero.
pub fn non_maximum_suppression(field: &GradientField) -> Grid<f32> {
    let magnitude = field.magnitude();
    let (width, height) = field.dimensions();
    Grid::par_from_fn(width, height, |x, y| {
        let m = magnitude.get(x, y);
        if m <= 0.0 {
            return 0.0;
        }
        let orientation = field.orientation(x, y);
        let (dx, dy) = orientation.step();
        let (x, y) = (x as isize, y as isize);
        let forward = magnitude.checked_get(x + dx, y + dy).unwrap_or(0.0);
        let backward = magnitude.checked_get(x - dx, y - dy).unwrap_or(0.0);
        let beats_forward = match orientation {
            Orientation::Deg0 | Orientation::Deg90 => m >= forward,
            Orientation::Deg45 | Orientation::Deg135 => m > forward,
        };
        if m > backward && beats_forward {
            m
        } else {
            0.0
        }
    })
}
