use serde::{Deserialize, Serialize};

/// The way a kernel matrix breaks the square, odd-sided shape requirement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    /// The matrix has no rows.
    #[error("kernel must be at least one unit wide")]
    Empty,

    /// A row does not have as many entries as the matrix has rows.
    #[error("kernel must be a square: row {row} has {len} entries, expected {side}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of entries in that row.
        len: usize,
        /// Number of rows in the matrix.
        side: usize,
    },

    /// The side length is even, so there is no center cell.
    #[error("kernel must have odd width and height, got {0}")]
    EvenSide(usize),
}

/// Errors raised while building a [`Kernel`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The weight matrix is empty, not square or has an even side.
    #[error("invalid kernel shape: {0}")]
    InvalidKernelShape(#[from] ShapeViolation),
}

/// Raw kernel configuration as found in kernel definition files.
///
/// ```json
/// { "K": [[1, 2, 1], [2, 4, 2], [1, 2, 1]], "MaxVal": 16 }
/// ```
///
/// Converting it into a [`Kernel`] validates the shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Weight matrix, `k[i][j]` weighs the pixel at horizontal offset `i`
    /// and vertical offset `j` of the footprint.
    #[serde(rename = "K", alias = "k")]
    pub k: Vec<Vec<i32>>,

    /// Optional normalization divisor. Ignored unless strictly positive.
    #[serde(
        rename = "MaxVal",
        alias = "max_val",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_val: Option<i64>,
}

/// A square matrix of integer weights with an odd side length.
///
/// The kernel is validated on construction and immutable afterwards.
///
/// # Examples
///
/// ```
/// use kernelate_imgproc::Kernel;
///
/// let kernel = Kernel::new(vec![vec![1, 2, 1], vec![2, 4, 2], vec![1, 2, 1]]).unwrap();
///
/// assert_eq!(kernel.side(), 3);
/// assert_eq!(kernel.radius(), 1);
/// assert_eq!(kernel.divisor(), 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KernelConfig", into = "KernelConfig")]
pub struct Kernel {
    side: usize,
    // row-major over the configuration matrix: weights[i * side + j] == K[i][j]
    weights: Vec<i32>,
    max_val: Option<i64>,
}

impl Kernel {
    /// Create a kernel from a weight matrix.
    ///
    /// # Errors
    ///
    /// [`KernelError::InvalidKernelShape`] if the matrix is empty, not square
    /// or has an even side length.
    pub fn new(weights: Vec<Vec<i32>>) -> Result<Self, KernelError> {
        Self::build(weights, None)
    }

    /// Create a kernel with an explicit normalization divisor.
    ///
    /// A `max_val` that is not strictly positive is kept but ignored by
    /// [`Kernel::divisor`], which then falls back to the coefficient sum.
    pub fn with_max_val(weights: Vec<Vec<i32>>, max_val: i64) -> Result<Self, KernelError> {
        Self::build(weights, Some(max_val))
    }

    fn build(weights: Vec<Vec<i32>>, max_val: Option<i64>) -> Result<Self, KernelError> {
        let side = weights.len();

        if side < 1 {
            return Err(ShapeViolation::Empty.into());
        }

        if side % 2 == 0 {
            return Err(ShapeViolation::EvenSide(side).into());
        }

        if let Some((row, len)) = weights
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != side)
        {
            return Err(ShapeViolation::NotSquare { row, len, side }.into());
        }

        Ok(Self {
            side,
            weights: weights.into_iter().flatten().collect(),
            max_val,
        })
    }

    /// Side length of the kernel, always odd.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Distance from the center cell to the kernel edge, `(side - 1) / 2`.
    pub fn radius(&self) -> usize {
        (self.side - 1) / 2
    }

    /// Weight of the cell at horizontal offset `i` and vertical offset `j`.
    ///
    /// # Panics
    ///
    /// If `i` or `j` is not smaller than [`Kernel::side`].
    pub fn weight(&self, i: usize, j: usize) -> i32 {
        assert!(i < self.side && j < self.side, "kernel index out of bounds");
        self.weights[i * self.side + j]
    }

    /// All weights, `side * side` values ordered like the configuration matrix.
    pub fn weights(&self) -> &[i32] {
        &self.weights
    }

    /// The explicit normalization override, if one was given.
    pub fn max_val(&self) -> Option<i64> {
        self.max_val
    }

    /// Sum of all coefficients.
    pub fn sum(&self) -> i64 {
        self.weights.iter().map(|&w| w as i64).sum()
    }

    /// Normalization divisor.
    ///
    /// The explicit override when it is strictly positive, otherwise the sum of
    /// all coefficients, which may be zero or negative.
    pub fn divisor(&self) -> i64 {
        match self.max_val {
            Some(max_val) if max_val > 0 => max_val,
            _ => self.sum(),
        }
    }

    /// Whether the divisor is zero or negative.
    ///
    /// Convolving with a degenerate kernel produces black interior pixels.
    pub fn is_degenerate(&self) -> bool {
        self.divisor() <= 0
    }
}

impl TryFrom<KernelConfig> for Kernel {
    type Error = KernelError;

    fn try_from(config: KernelConfig) -> Result<Self, Self::Error> {
        Self::build(config.k, config.max_val)
    }
}

impl From<Kernel> for KernelConfig {
    fn from(kernel: Kernel) -> Self {
        Self {
            k: kernel
                .weights
                .chunks_exact(kernel.side)
                .map(<[i32]>::to_vec)
                .collect(),
            max_val: kernel.max_val,
        }
    }
}
