#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

use std::path::PathBuf;

use argh::FromArgs;
use kernelate_imgproc::{
    convolve, BorderPolicy, ConvolveOptions, ExecutionStrategy, IntensityDepth,
};
use kernelate_io::{read_image_any_rgba8, read_kernel_json, write_image_png_rgba8};

/// Output file written when none is given on the command line.
pub const DEFAULT_OUTPUT: &str = "spooky.png";

#[derive(FromArgs, Debug, PartialEq)]
/// Apply a square convolution kernel to a PNG or JPEG image and write a PNG
pub struct CliArgs {
    /// path to the input image (png, jpg or jpeg)
    #[argh(positional)]
    pub image: PathBuf,

    /// path to the kernel definition, e.g. {"K": [[1, 1, 1], [1, 1, 1], [1, 1, 1]]}
    #[argh(positional)]
    pub kernel: PathBuf,

    /// path of the output png, defaults to spooky.png
    #[argh(positional)]
    pub output: Option<PathBuf>,

    /// border handling: unset (default) or copy-through
    #[argh(option, default = "BorderPolicy::Unset")]
    pub border: BorderPolicy,

    /// intensity domain of the square root: 8 (default) or 16
    #[argh(option, default = "IntensityDepth::Eight")]
    pub depth: IntensityDepth,

    /// number of worker threads, 0 runs on the calling thread
    #[argh(option)]
    pub threads: Option<usize>,
}

impl CliArgs {
    /// Output path, falling back to [`DEFAULT_OUTPUT`].
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Convolution options selected by the flags.
    pub fn convolve_options(&self) -> ConvolveOptions {
        let strategy = self
            .threads
            .map_or(ExecutionStrategy::ParallelRows, ExecutionStrategy::from_threads);

        ConvolveOptions::new()
            .with_border(self.border)
            .with_depth(self.depth)
            .with_strategy(strategy)
    }
}

/// Read the kernel and the image, convolve and write the result.
///
/// The kernel is read first so a malformed definition fails before the image
/// is touched. Returns the path the result was written to.
pub fn run(args: &CliArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let kernel = read_kernel_json(&args.kernel)?;
    log::info!(
        "kernel {}: {side}x{side}, divisor {}",
        args.kernel.display(),
        kernel.divisor(),
        side = kernel.side(),
    );

    let image = read_image_any_rgba8(&args.image)?;
    log::info!("image {}: {}", args.image.display(), image.size());

    let filtered = convolve(&image, &kernel, &args.convolve_options())?;

    let output = args.output_path();
    write_image_png_rgba8(&output, &filtered)?;
    log::info!("wrote {}", output.display());

    Ok(output)
}

/// Messages of an error and each of its sources, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    std::iter::successors(Some(err), |e| (*e).source())
        .map(ToString::to_string)
        .collect()
}
