#![cfg_attr(all(test, feature = "unstable"), feature(test))]
#![warn(missing_docs)]

//! An implementation of the Canny edge detection algorithm in Rust for 8-bit grayscale
//! images.
//!
//! # Finding the edges in an image
//!
//! ```
//! use canny_edge::{canny, CannyParams, Image};
//!
//! // A dark left half and a bright right half.
//! let image = Image::from_fn(32, 16, |x, _| if x < 16 { 0 } else { 255 });
//! let detection = canny(&image, &CannyParams::default().with_thresholds(100.0, 200.0))
//!     .expect("valid parameters");
//! assert_eq!(detection.edge_count(), 16);
//! ```
//!
//! Images on disk can be read with `load_image`. See the `canny` function and
//! `CannyParams` for details on what each parameter means.
//!
//! The four stages are exposed individually as well:
//! `gaussian_blur` → `sobel` → `non_maximum_suppression` → `hysteresis`.

mod config;
mod edge;
mod error;
mod gradient;
mod grid;
mod hysteresis;
mod io;
mod smooth;
mod suppress;

pub use config::*;
pub use edge::*;
pub use error::*;
pub use gradient::*;
pub use grid::*;
pub use hysteresis::*;
pub use io::*;
pub use smooth::*;
pub use suppress::*;
