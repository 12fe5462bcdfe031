use image::{GrayImage, Luma};
use rayon::prelude::*;

use crate::error::{Error, Result};

/// An owned, row-major 2D buffer whose dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// An 8-bit grayscale raster.
pub type Image = Grid<u8>;

impl<T: Copy> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Grid<T> {
        Grid {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Creates a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F: FnMut(usize, usize) -> T>(width: usize, height: usize, mut f: F) -> Grid<T> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Grid { width, height, data }
    }

    /// Like `from_fn`, but rows are evaluated in parallel.
    pub(crate) fn par_from_fn<F>(width: usize, height: usize, f: F) -> Grid<T>
    where
        T: Default + Send + Sync,
        F: Fn(usize, usize) -> T + Sync,
    {
        let mut data = vec![T::default(); width * height];
        if width > 0 {
            data.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = f(x, y);
                }
            });
        }
        Grid { width, height, data }
    }

    /// Applies `f` to every cell, producing a new grid of the same shape.
    pub fn map<U: Copy, F: FnMut(T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `other` has the same width and height.
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// The value at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        assert!(x < self.width && y < self.height, "({}, {}) out of bounds", x, y);
        self.data[y * self.width + x]
    }

    /// The value at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn checked_get(&self, x: isize, y: isize) -> Option<T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }

    /// The value at `(x, y)` with the coordinates clamped into the grid, i.e. the border
    /// pixels are replicated outwards.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.data[y * self.width + x]
    }

    /// The cells of row `y`.
    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates `(x, y, value)` in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % width, i / width, *v))
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }
}

impl Image {
    /// Builds an image from a row-major pixel buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Image> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "image must not be empty, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(Error::InvalidInput(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width * height,
                width,
                height,
                data.len()
            )));
        }
        Ok(Grid { width, height, data })
    }

    /// Converts into an `image` crate buffer.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.get(x as usize, y as usize)])
        })
    }
}

impl From<&GrayImage> for Image {
    fn from(image: &GrayImage) -> Image {
        Grid {
            width: image.width() as usize,
            height: image.height() as usize,
            data: image.as_raw().clone(),
        }
    }
}

impl From<GrayImage> for Image {
    fn from(image: GrayImage) -> Image {
        let (width, height) = (image.width() as usize, image.height() as usize);
        Grid {
            width,
            height,
            data: image.into_raw(),
        }
    }
}
