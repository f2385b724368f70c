use std::path::Path;

use kernelate_image::Image;

use crate::{error::IoError, jpeg::read_image_jpeg_rgba8, png::read_image_png_rgba8};

/// Reads a PNG or JPEG image as four channels _(rgba8)_.
///
/// The decoder is picked from the file extension: `png`, `jpg` or `jpeg`,
/// case-insensitive.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
///
/// # Returns
///
/// A RGBA image with four channels _(rgba8)_.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => read_image_png_rgba8(file_path),
        Some("jpg") | Some("jpeg") => read_image_jpeg_rgba8(file_path),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}
