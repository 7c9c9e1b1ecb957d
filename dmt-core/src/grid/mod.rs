// =============================================================================
// Grid Module
// =============================================================================
//
// Bit-packed addressing for periodic power-of-two lattices, plus the cubical
// reading of a double-resolution lattice (odd coordinates mark the extent of a
// cell along that axis).

/// Packed index arithmetic, offset tables and cubical incidence.
pub mod packed;

/// Kani formal verification proofs.
#[cfg(kani)]
mod kani_proofs;

// =============================================================================
// Public Re-exports
// =============================================================================

pub use packed::PackedGridIndex;
