use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use kernelate_imgproc::Kernel;

use crate::error::IoError;

/// Read a kernel definition from a JSON file.
///
/// The file holds an object with the weight matrix under `K` and an optional
/// divisor override under `MaxVal`:
///
/// ```json
/// { "K": [[0, -1, 0], [-1, 5, -1], [0, -1, 0]] }
/// ```
///
/// # Errors
///
/// If the file is missing or unreadable, the JSON is malformed, or the matrix
/// is not square with an odd side.
pub fn read_kernel_json(file_path: impl AsRef<Path>) -> Result<Kernel, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    let kernel: Kernel = serde_json::from_reader(BufReader::new(file))?;

    log::debug!(
        "read {side}x{side} kernel from {} (divisor {})",
        file_path.display(),
        kernel.divisor(),
        side = kernel.side(),
    );

    Ok(kernel)
}

/// Decode a kernel definition from a JSON string.
///
/// # Example
///
/// ```
/// use kernelate_io::decode_kernel_json;
///
/// let kernel = decode_kernel_json(r#"{"K": [[1, 1, 1], [1, 1, 1], [1, 1, 1]]}"#).unwrap();
/// assert_eq!(kernel.divisor(), 9);
///
/// assert!(decode_kernel_json(r#"{"K": [[1, 1], [1, 1]]}"#).is_err());
/// ```
pub fn decode_kernel_json(json: &str) -> Result<Kernel, IoError> {
    Ok(serde_json::from_str(json)?)
}

/// Write a kernel definition as pretty printed JSON.
pub fn write_kernel_json(file_path: impl AsRef<Path>, kernel: &Kernel) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer_pretty(&mut writer, kernel)
        .map_err(|e| IoError::KernelEncodeError(e.to_string()))?;
    writer.flush()?;
    Ok(())
}
