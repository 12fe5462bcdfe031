use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::grid::Image;

/// Reads an image file and converts it to 8-bit grayscale.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| Error::LoadError {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("decoded {} as {:?}", path.display(), decoded.color());
    let luma = decoded.to_luma8();
    if luma.width() == 0 || luma.height() == 0 {
        return Err(Error::InvalidInput(format!("{} has no pixels", path.display())));
    }
    Ok(Image::from(luma))
}
