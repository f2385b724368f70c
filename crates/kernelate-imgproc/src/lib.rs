#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// convolution of RGBA images with a square integer kernel.
pub mod convolution;

/// square integer kernel type and its configuration format.
pub mod kernel;

/// ready made kernels.
pub mod kernels;

/// row-parallel execution utilities.
pub mod parallel;

pub use convolution::{
    convolve, convolve_into, BorderPolicy, ConvolveError, ConvolveOptions, IntensityDepth,
};
pub use kernel::{Kernel, KernelConfig, KernelError, ShapeViolation};
pub use parallel::{ExecutionStrategy, ParallelError};
