// =============================================================================
// Morse Module
// =============================================================================
//
// Discrete Morse gradient construction on the double-resolution cubical
// complex of a periodic scalar field.

/// Cell tags, queue entries and output records.
pub mod cell;

/// `MorseComplex` state and read-only queries.
pub mod complex;

/// The pairing algorithm.
mod gradient;

// =============================================================================
// Public Re-exports
// =============================================================================

pub use cell::{
    CellTag, CriticalCell, CriticalCounts, CriticalKind, GradientArrow, NO_PARTNER,
};
pub use complex::MorseComplex;
