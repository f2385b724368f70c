use crate::kernel::{Kernel, KernelError};

/// Create an identity kernel: a single `1` in the center cell.
///
/// # Arguments
///
/// * `side` - The side length of the kernel, must be odd.
pub fn identity(side: usize) -> Result<Kernel, KernelError> {
    let mut weights = vec![vec![0; side]; side];
    if side % 2 == 1 {
        weights[side / 2][side / 2] = 1;
    }
    Kernel::new(weights)
}

/// Create a box blur kernel: every weight is `1` and the divisor is `side * side`.
///
/// # Arguments
///
/// * `side` - The side length of the kernel, must be odd.
pub fn box_blur(side: usize) -> Result<Kernel, KernelError> {
    Kernel::new(vec![vec![1; side]; side])
}

/// Create the classic 3x3 sharpen kernel, whose weights sum to `1`.
pub fn sharpen() -> Result<Kernel, KernelError> {
    Kernel::new(vec![vec![0, -1, 0], vec![-1, 5, -1], vec![0, -1, 0]])
}

/// Create the 3x3 Laplacian edge detection kernel.
///
/// Its weights sum to zero, so it carries a divisor override of `1`.
pub fn edge_detect() -> Result<Kernel, KernelError> {
    Kernel::with_max_val(
        vec![vec![-1, -1, -1], vec![-1, 8, -1], vec![-1, -1, -1]],
        1,
    )
}
