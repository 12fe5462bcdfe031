use std::f32::consts::*;

use log::trace;

use crate::error::{Error, Result};
use crate::grid::{Grid, Image};

/// Checks that `size` is a positive odd integer and `sigma` a positive, finite number.
pub fn validate_kernel(size: usize, sigma: f32) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(Error::InvalidParameter(format!(
            "kernel size must be a positive odd integer, got {}",
            size
        )));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "sigma must be a positive finite number, got {}",
            sigma
        )));
    }
    Ok(())
}

/// Calculates a normalized 1D Gaussian kernel of `size` taps.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Result<Vec<f32>> {
    validate_kernel(size, sigma)?;
    let radius = (size / 2) as f32;
    let kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - radius;
            E.powf(-d.powi(2) / (2.0 * sigma.powi(2)))
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    trace!("gaussian kernel: size = {}, sigma = {}, sum = {}", size, sigma, sum);
    Ok(kernel.into_iter().map(|k| k / sum).collect())
}

/// Blurs the image with a separable Gaussian of the given size and sigma.
///
/// Pixels outside the image are taken from the nearest border pixel, so that no edges are
/// introduced along the border by some background color outside image bounds.
pub fn gaussian_blur(image: &Image, size: usize, sigma: f32) -> Result<Image> {
    let kernel = gaussian_kernel(size, sigma)?;
    let (width, height) = image.dimensions();
    let radius = (size / 2) as isize;

    let horizontal: Grid<f32> = Grid::par_from_fn(width, height, |x, y| {
        kernel
            .iter()
            .zip(-radius..=radius)
            .map(|(k, dx)| k * image.get_clamped(x as isize + dx, y as isize) as f32)
            .sum::<f32>()
    });
    Ok(Grid::par_from_fn(width, height, |x, y| {
        let sum: f32 = kernel
            .iter()
            .zip(-radius..=radius)
            .map(|(k, dy)| k * horizontal.get_clamped(x as isize, y as isize + dy))
            .sum();
        sum.round().clamp(0.0, 255.0) as u8
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for size in [1, 3, 5, 7, 11] {
            for sigma_i in 1..40 {
                let sigma = sigma_i as f32 / 10.0;
                let kernel = gaussian_kernel(size, sigma).unwrap();
                assert_eq!(kernel.len(), size);
                let sum: f32 = kernel.iter().sum();
                assert!((sum - 1.0).abs() < 1e-5, "sum = {}, sigma = {}", sum, sigma);
                for i in 0..size {
                    assert_eq!(kernel[i], kernel[size - 1 - i]);
                }
                // The center tap carries the most weight.
                assert!(kernel.iter().all(|k| *k <= kernel[size / 2]));
            }
        }
    }

    #[test]
    fn rejects_bad_kernel_parameters() {
        assert!(matches!(gaussian_kernel(0, 1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(gaussian_kernel(4, 1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(gaussian_kernel(3, 0.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(gaussian_kernel(3, -1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(gaussian_kernel(3, f32::NAN), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let image = Grid::filled(9, 7, 128u8);
        let blurred = gaussian_blur(&image, 5, 1.4).unwrap();
        assert_eq!(blurred, image);
    }

    #[test]
    fn blur_keeps_shape_and_spreads_impulse() {
        let image = Grid::from_fn(11, 11, |x, y| if (x, y) == (5, 5) { 255 } else { 0 });
        let blurred = gaussian_blur(&image, 5, 1.0).unwrap();
        assert!(blurred.same_shape(&image));
        assert!(blurred.get(5, 5) < 255);
        assert!(blurred.get(4, 5) > 0);
        assert_eq!(blurred.get(4, 5), blurred.get(6, 5));
        assert_eq!(blurred.get(5, 4), blurred.get(5, 6));
        assert_eq!(blurred.get(0, 0), 0);
    }

    #[test]
    fn size_one_is_identity() {
        let image = Grid::from_fn(6, 4, |x, y| (x * 40 + y) as u8);
        assert_eq!(gaussian_blur(&image, 1, 3.0).unwrap(), image);
    }
}
