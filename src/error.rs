use std::path::PathBuf;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while detecting edges.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input path does not resolve to a readable image.
    #[error("failed to load image {}: {source}", .path.display())]
    LoadError {
        /// Path that was handed to the loader.
        path: PathBuf,
        /// Underlying decoder or I/O failure.
        #[source]
        source: image::ImageError,
    },

    /// A detector parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The pixel data cannot be processed, e.g. a zero-sized image.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A parameter file could not be read or parsed.
    #[error("invalid config {}: {message}", .path.display())]
    Config {
        /// Path of the parameter file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}
