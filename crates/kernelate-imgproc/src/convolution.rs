use std::str::FromStr;

use kernelate_image::{Image, ImageError};

use crate::{
    kernel::Kernel,
    parallel::{ExecuteRowsExt, ExecutionStrategy, ParallelError},
};

const CHANNELS: usize = 4;

// output of a kernel whose divisor is zero or negative
const DEGENERATE_PIXEL: [u8; CHANNELS] = [0, 0, 0, u8::MAX];

// value of pixels the border policy leaves unset
const BACKGROUND_PIXEL: [u8; CHANNELS] = [0; CHANNELS];

/// Errors that can occur while convolving an image.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConvolveError {
    /// The destination image does not match the source.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The row workers could not be scheduled.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// What happens to pixels too close to the border for the kernel footprint to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// Leave border pixels at the background value, all channels zero.
    #[default]
    Unset,

    /// Copy border pixels unchanged from the source image.
    CopyThrough,
}

impl FromStr for BorderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unset" => Ok(BorderPolicy::Unset),
            "copy-through" | "copy_through" | "copy" => Ok(BorderPolicy::CopyThrough),
            _ => Err(format!(
                "invalid border policy: {s}, expected `unset` or `copy-through`"
            )),
        }
    }
}

/// Domain of the channel intensity the square root is taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntensityDepth {
    /// The 8-bit channel value as stored, `v`.
    #[default]
    Eight,

    /// The channel value widened to 16 bits, `v * 257`.
    ///
    /// Under an identity kernel this keeps `0` and `255` fixed.
    Sixteen,
}

impl IntensityDepth {
    /// Floor of the square root of every possible 8-bit channel value.
    pub fn sqrt_table(&self) -> [i64; 256] {
        let mut table = [0i64; 256];
        for (v, entry) in table.iter_mut().enumerate() {
            let intensity = match self {
                IntensityDepth::Eight => v as u32,
                IntensityDepth::Sixteen => v as u32 * 257,
            };
            *entry = isqrt(intensity) as i64;
        }
        table
    }
}

impl FromStr for IntensityDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "8" => Ok(IntensityDepth::Eight),
            "16" => Ok(IntensityDepth::Sixteen),
            _ => Err(format!("invalid intensity depth: {s}, expected `8` or `16`")),
        }
    }
}

/// Options for [`convolve`] and [`convolve_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvolveOptions {
    /// Handling of pixels the kernel footprint does not fit around.
    pub border: BorderPolicy,
    /// Domain of the square root applied before weighting.
    pub depth: IntensityDepth,
    /// How rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl ConvolveOptions {
    /// Create the default options: unset border, 8-bit intensities, parallel rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the border policy.
    pub fn with_border(mut self, border: BorderPolicy) -> Self {
        self.border = border;
        self
    }

    /// Set the intensity depth.
    pub fn with_depth(mut self, depth: IntensityDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Convolve an RGBA image with a square integer kernel.
///
/// Allocates the output and delegates to [`convolve_into`].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 4).
/// * `kernel` - The kernel to apply.
/// * `options` - Border, intensity and scheduling options.
///
/// # Returns
///
/// A new image with the same size as `src`.
///
/// # Example
///
/// ```
/// use kernelate_image::Image;
/// use kernelate_imgproc::{convolve, kernels, ConvolveOptions};
///
/// let src = Image::<u8, 4>::from_size_pixel([5, 5].into(), [16, 81, 255, 255]).unwrap();
/// let dst = convolve(&src, &kernels::box_blur(3).unwrap(), &ConvolveOptions::new()).unwrap();
///
/// assert_eq!(dst.pixel(2, 2), Some(&[4u8, 9, 15, 255][..]));
/// assert_eq!(dst.pixel(0, 0), Some(&[0u8, 0, 0, 0][..]));
/// ```
pub fn convolve(
    src: &Image<u8, 4>,
    kernel: &Kernel,
    options: &ConvolveOptions,
) -> Result<Image<u8, 4>, ConvolveError> {
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    convolve_into(src, &mut dst, kernel, options)?;
    Ok(dst)
}

/// Convolve an RGBA image with a square integer kernel into a preallocated image.
///
/// Every interior pixel, one whose full kernel footprint lies inside the image,
/// is replaced by the weighted sum of the square roots of its neighbours'
/// R, G and B intensities divided by [`Kernel::divisor`], with alpha set to 255.
/// Kernel cell `(i, j)` weighs the source pixel `(x - r + i, y - r + j)`.
/// When the divisor is zero or negative every interior pixel is `[0, 0, 0, 255]`.
/// The remaining pixels follow `options.border`.
///
/// An image smaller than the kernel has no interior pixels; that is not an error.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 4).
/// * `dst` - The destination image with shape (H, W, 4). Every pixel is overwritten.
/// * `kernel` - The kernel to apply.
/// * `options` - Border, intensity and scheduling options.
///
/// # Errors
///
/// If `src` and `dst` differ in size, or the execution strategy is invalid.
pub fn convolve_into(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    kernel: &Kernel,
    options: &ConvolveOptions,
) -> Result<(), ConvolveError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        )
        .into());
    }

    options.strategy.validate()?;

    let (width, height) = (src.width(), src.height());
    if width == 0 || height == 0 {
        return Ok(());
    }

    let radius = kernel.radius();
    let divisor = kernel.divisor();

    if divisor <= 0 {
        log::warn!(
            "kernel divisor is {divisor}, interior pixels will be {:?}",
            DEGENERATE_PIXEL
        );
    }

    log::debug!(
        "convolving {} with a {side}x{side} kernel (divisor {divisor}), {:?}",
        src.size(),
        options,
        side = kernel.side(),
    );

    let sqrt_table = options.depth.sqrt_table();
    let border = options.border;
    let src_data = src.as_slice();

    let row_stride = src.row_stride();
    dst.as_slice_mut()
        .execute_rows(row_stride, options.strategy, |y, dst_row| {
            let src_row = &src_data[y * row_stride..(y + 1) * row_stride];
            let row_is_interior = y >= radius && y + radius < height;

            dst_row
                .chunks_exact_mut(CHANNELS)
                .zip(src_row.chunks_exact(CHANNELS))
                .enumerate()
                .for_each(|(x, (dst_pixel, src_pixel))| {
                    if row_is_interior && x >= radius && x + radius < width {
                        let color = if divisor > 0 {
                            weighted_pixel(src_data, width, kernel, &sqrt_table, divisor, x, y)
                        } else {
                            DEGENERATE_PIXEL
                        };
                        dst_pixel.copy_from_slice(&color);
                    } else {
                        match border {
                            BorderPolicy::Unset => dst_pixel.copy_from_slice(&BACKGROUND_PIXEL),
                            BorderPolicy::CopyThrough => dst_pixel.copy_from_slice(src_pixel),
                        }
                    }
                });
        })?;

    Ok(())
}

// PRECONDITION: the kernel footprint centered at (x, y) lies inside the image
// and divisor > 0.
fn weighted_pixel(
    src: &[u8],
    width: usize,
    kernel: &Kernel,
    sqrt_table: &[i64; 256],
    divisor: i64,
    x: usize,
    y: usize,
) -> [u8; CHANNELS] {
    let side = kernel.side();
    let radius = kernel.radius();

    let mut sum = [0i64; 3];
    for (idx, &weight) in kernel.weights().iter().enumerate() {
        if weight == 0 {
            continue;
        }
        let (i, j) = (idx / side, idx % side);
        let offset = ((y - radius + j) * width + (x - radius + i)) * CHANNELS;
        sum.iter_mut()
            .zip(&src[offset..offset + 3])
            .for_each(|(acc, &v)| *acc += sqrt_table[v as usize] * weight as i64);
    }

    let [r, g, b] = sum.map(|s| (s / divisor).clamp(0, u8::MAX as i64) as u8);
    [r, g, b, u8::MAX]
}

fn isqrt(n: u32) -> u32 {
    let mut root = (n as f64).sqrt() as u32;
    // guard against rounding in the float estimate
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}
