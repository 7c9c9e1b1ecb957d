//! Error type shared by grid construction and gradient-field building.
//!
//! Two classes of failure exist:
//!
//! - **Precondition violations** (bad bit depth, wrong field length, NaN
//!   samples, building twice). These are reported before any state is touched.
//! - **Invariant violations** (a cell that was counted as ready to pair turns
//!   out not to be, or a cell left unpaired after the queue drains). These
//!   abort the build and carry the offending cell index.
//!
//! Neither class is retryable: the algorithm is deterministic, so the same
//! input fails the same way again.

/// Errors produced by `dmt-core`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MorseError {
    /// The grid bit depth is zero; a lattice needs at least two points per axis.
    #[error("grid bit depth must be at least 1, got {bits}")]
    InvalidBits {
        /// The rejected bit depth.
        bits: u32,
    },

    /// The packed index of the requested grid does not fit in a machine word.
    #[error("a {dimension}-dimensional grid with {bits} bits per axis needs {needed} index bits, only {available} are available")]
    IndexOverflow {
        /// Bits per axis of the grid that failed to fit.
        bits: u32,
        /// Number of axes.
        dimension: usize,
        /// `bits * dimension`.
        needed: u64,
        /// `usize::BITS - 1`; one bit is kept free so the grid size is representable.
        available: u64,
    },

    /// The scalar field does not have one sample per lattice point.
    #[error("scalar field has {actual} samples, expected {expected}")]
    FieldSize {
        /// `N^R` for the requested bit depth.
        expected: usize,
        /// Length of the slice that was passed in.
        actual: usize,
    },

    /// A sample of the scalar field is NaN.
    #[error("scalar field sample {index} is NaN")]
    NotANumber {
        /// Flat index of the offending sample.
        index: usize,
    },

    /// The physical box size is not a positive finite number.
    #[error("box size must be positive and finite, got {size}")]
    InvalidBoxSize {
        /// The rejected box size.
        size: f64,
    },

    /// The gradient field of this complex has already been built.
    #[error("gradient field construction has already run on this complex")]
    AlreadyBuilt,

    /// A cell popped as ready to pair does not have exactly one unpaired facet.
    #[error("cell {cell} was ready to pair but has {unpaired} unpaired facets")]
    PairingInvariant {
        /// Double-resolution index of the cell.
        cell: usize,
        /// Number of unpaired facets found while committing the pair.
        unpaired: u32,
    },

    /// A cell was still unpaired when the priority queue ran dry.
    #[error("cell {cell} is still unpaired after the queue drained")]
    Unresolved {
        /// Double-resolution index of the first unpaired cell.
        cell: usize,
    },

    /// The build observer asked to stop.
    #[error("gradient construction cancelled after resolving {resolved} cells")]
    Cancelled {
        /// Number of cells that had left the unpaired state.
        resolved: usize,
    },
}
