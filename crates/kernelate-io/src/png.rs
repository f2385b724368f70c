use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read},
    path::Path,
};

use kernelate_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::{conv_utils::widen_to_rgba8, error::IoError};

/// Read a PNG image as four channels (rgba8).
///
/// Palette images are expanded, 16-bit samples are reduced to 8 bits and
/// gray or RGB images get an opaque alpha channel.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_png_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if file_path
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("png"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    decode_png_impl(BufReader::new(file))
}

/// Decodes a PNG image as four channels (rgba8) from raw bytes.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the png file
pub fn decode_image_png_rgba8(bytes: &[u8]) -> Result<Image<u8, 4>, IoError> {
    decode_png_impl(bytes)
}

fn decode_png_impl<R: Read>(reader: R) -> Result<Image<u8, 4>, IoError> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedColorType(format!(
            "{:?} at {:?} bits",
            info.color_type, info.bit_depth
        )));
    }

    let rgba = match info.color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => widen_to_rgba8::<3>(&buf),
        ColorType::GrayscaleAlpha => widen_to_rgba8::<2>(&buf),
        ColorType::Grayscale => widen_to_rgba8::<1>(&buf),
        other => return Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    };

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    log::debug!("decoded png {size} from {:?}", info.color_type);

    Ok(Image::new(size, rgba)?)
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the RGBA pixel data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let [width, height]: [u32; 2] = image.size().into();
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_raw_png(
        file_path: &Path,
        size: [u32; 2],
        color_type: ColorType,
        depth: BitDepth,
        data: &[u8],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let file = File::create(file_path)?;
        let mut encoder = Encoder::new(BufWriter::new(file), size[0], size[1]);
        encoder.set_color(color_type);
        encoder.set_depth(depth);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
        writer.finish()?;
        Ok(())
    }

    #[test]
    fn read_write_png_rgba8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("pattern.png");

        let data = (0..4 * 3 * 4).map(|v| (v * 5) as u8).collect();
        let image = Image::<u8, 4>::new([4, 3].into(), data)?;
        write_image_png_rgba8(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_png_rgba8(&file_path)?;
        assert_eq!(image_back.cols(), 4);
        assert_eq!(image_back.rows(), 3);
        assert_eq!(image_back, image);

        Ok(())
    }

    #[test]
    fn read_png_gray8_widens() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");
        write_raw_png(
            &file_path,
            [2, 1],
            ColorType::Grayscale,
            BitDepth::Eight,
            &[10, 200],
        )?;

        let image = read_image_png_rgba8(&file_path)?;
        assert_eq!(image.as_slice(), &[10, 10, 10, 255, 200, 200, 200, 255]);
        Ok(())
    }

    #[test]
    fn read_png_rgb16_strips() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb16.png");
        // big endian samples 0x1234, 0xff00, 0x0001
        write_raw_png(
            &file_path,
            [1, 1],
            ColorType::Rgb,
            BitDepth::Sixteen,
            &[0x12, 0x34, 0xff, 0x00, 0x00, 0x01],
        )?;

        let image = read_image_png_rgba8(&file_path)?;
        assert_eq!(image.as_slice(), &[0x12, 0xff, 0x00, 255]);
        Ok(())
    }

    #[test]
    fn write_png_header_size() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("wide.png");

        let image = Image::<u8, 4>::from_size_val([7, 2].into(), 9)?;
        write_image_png_rgba8(&file_path, &image)?;

        let reader = Decoder::new(BufReader::new(File::open(&file_path)?)).read_info()?;
        let info = reader.info();
        assert_eq!((info.width, info.height), (7, 2));
        assert_eq!(info.color_type, ColorType::Rgba);
        Ok(())
    }

    #[test]
    fn decode_png_from_bytes() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("bytes.png");

        let image = Image::<u8, 4>::from_size_pixel([3, 2].into(), [1, 2, 3, 4])?;
        write_image_png_rgba8(&file_path, &image)?;

        let bytes = std::fs::read(&file_path)?;
        assert_eq!(decode_image_png_rgba8(&bytes)?, image);
        Ok(())
    }

    #[test]
    fn read_png_missing() {
        let res = read_image_png_rgba8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_png_wrong_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("image.bmp");
        std::fs::write(&file_path, b"not a png")?;

        let res = read_image_png_rgba8(&file_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }

    #[test]
    fn decode_png_garbage() {
        let res = decode_image_png_rgba8(b"definitely not a png");
        assert!(matches!(res, Err(IoError::PngDecodeError(_))));
    }
}
