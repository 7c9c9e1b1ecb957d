//! # dmt-core: Discrete Morse Gradient Fields on Periodic Lattices
//!
//! `dmt-core` finds and classifies the critical points (minima, saddles,
//! maxima) of a scalar field sampled on a periodic `R`-dimensional grid of
//! side `2^b`, by building a discrete gradient vector field over the field's
//! cubical complex.
//!
//! ## Overview
//!
//! 1. **Address the grid** - [`PackedGridIndex`] packs every lattice point into a
//!    single `usize`, one bit field per axis, with branch-free periodic arithmetic
//! 2. **Double the resolution** - every vertex, edge, face and cell of the grid
//!    becomes one point of the grid with `b + 1` bits per axis; odd coordinates
//!    mark the axes a cell extends along
//! 3. **Pair cells** - [`MorseComplex`] pairs each cell with a facet in order of
//!    increasing upper-star value, leaving the critical cells unpaired
//!
//! ## Architecture
//!
//! All entities are plain integers indexing flat arrays (scalar samples, cell
//! tags, gradient map). There is no cell object and no pointer graph:
//!
//! - **Per-axis masking** gives periodic add/sub/scale/negate in O(R) word ops
//! - **Promoted offset tables** enumerate hypercube corners and Moore neighbours
//! - **Min-priority queue** keyed by `(value, rank, index)` gives a total,
//!   deterministic processing order
//!
//! ## Quick Start
//!
//! ```
//! use dmt_core::{MorseComplex, MorseError};
//! use dmt_core::testing_fields::sine_field;
//!
//! // 8x8 periodic field with one minimum and one maximum
//! let field = sine_field::<2>(3, 1);
//!
//! let mut complex = MorseComplex::<2>::new(3, &field)?;
//! let counts = complex.build_gradient_field()?;
//!
//! assert_eq!(counts.euler_characteristic(), 0);
//! for cell in complex.critical_cells() {
//!     println!("{:?} rank {} ({})", cell.coords, cell.rank, cell.kind());
//! }
//! # Ok::<(), MorseError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`grid`] - Bit-packed periodic addressing and cubical incidence
//! - [`morse`] - Gradient construction and critical-cell queries
//! - [`progress`] - Build observers (no-op, logging, closures)
//! - [`box_config`] - Bit depth plus physical box size
//! - [`error`] - The crate error type
//! - [`testing_fields`] - Deterministic fields for tests and benchmarks

#![deny(missing_docs)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Physical box configuration.
pub mod box_config;

/// Error type.
pub mod error;

/// Bit-packed periodic grid addressing.
pub mod grid;

/// Discrete Morse gradient construction.
pub mod morse;

/// Build observers.
pub mod progress;

/// Deterministic scalar fields and preset sizes for testing.
pub mod testing_fields;

// =============================================================================
// Convenience Re-exports (Clean Public API)
// =============================================================================

pub use box_config::BoxConfig;
pub use error::MorseError;
pub use grid::PackedGridIndex;

// Gradient construction and output records
pub use morse::{
    CellTag, CriticalCell, CriticalCounts, CriticalKind, GradientArrow, MorseComplex,
    NO_PARTNER,
};

// Observers
pub use progress::{BuildObserver, LogProgress, NoProgress};

// Testing utilities
pub use testing_fields::{FieldConfig, TestFields};
