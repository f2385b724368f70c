#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access, decoding and encoding
/// failures of images and kernel definitions.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_rgba8`] for format detection by extension.
pub mod functional;

/// JPEG image decoding.
pub mod jpeg;

/// Kernel definition files in JSON.
pub mod kernel;

/// PNG image encoding and decoding.
pub mod png;

/// Internal utility functions for widening pixel layouts to RGBA.
mod conv_utils;

pub use crate::error::IoError;
pub use crate::functional::read_image_any_rgba8;
pub use crate::kernel::{decode_kernel_json, read_kernel_json, write_kernel_json};
pub use crate::png::write_image_png_rgba8;
