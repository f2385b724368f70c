use std::{fs, path::Path};

use kernelate_image::{Image, ImageSize};
use zune_jpeg::{errors::DecodeErrors, JpegDecoder};

use crate::{conv_utils::widen_to_rgba8, error::IoError};

/// Read a JPEG image as four channels _(rgba8)_.
///
/// Grayscale and color JPEGs are both widened to RGBA with an opaque alpha.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A RGBA image with four channels _(rgba8)_.
pub fn read_image_jpeg_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("jpg") && !ext.eq_ignore_ascii_case("jpeg")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let jpeg_data = fs::read(file_path)?;
    decode_image_jpeg_rgba8(&jpeg_data)
}

/// Decodes a JPEG image as four channels _(rgba8)_ from raw bytes.
///
/// # Arguments
///
/// - `src` - Raw bytes of the jpeg file
pub fn decode_image_jpeg_rgba8(src: &[u8]) -> Result<Image<u8, 4>, IoError> {
    let mut decoder = JpegDecoder::new(src);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;

    // the decoder picks the output layout from the stream, infer it back
    let num_pixels = image_size.area().max(1);
    let rgba = match img_data.len() / num_pixels {
        1 => widen_to_rgba8::<1>(&img_data),
        3 => widen_to_rgba8::<3>(&img_data),
        4 => img_data,
        n => {
            return Err(IoError::UnsupportedColorType(format!(
                "jpeg decoded to {n} channels"
            )))
        }
    };

    log::debug!("decoded jpeg {image_size}");

    Ok(Image::new(image_size, rgba)?)
}
