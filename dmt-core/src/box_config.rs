//! Physical box configuration.
//!
//! A scalar field on a periodic grid usually samples a physical volume of
//! side `L`. [`BoxConfig`] ties the grid bit depth to that size so that
//! double-resolution cell coordinates can be reported in physical units.

use crate::error::MorseError;
use crate::grid::PackedGridIndex;

/// Bit depth plus physical box size for an `R`-dimensional periodic grid.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxConfig<const R: usize> {
    grid: PackedGridIndex<R>,
    box_size: f64,
    scale: f64,
}

impl<const R: usize> BoxConfig<R> {
    /// Creates a configuration for a grid of side `2^bits` spanning `box_size`.
    ///
    /// # Errors
    ///
    /// - [`MorseError::InvalidBits`] / [`MorseError::IndexOverflow`] as for
    ///   [`PackedGridIndex::try_new`].
    /// - [`MorseError::InvalidBoxSize`] if `box_size` is not positive and finite.
    pub fn new(bits: u32, box_size: f64) -> Result<Self, MorseError> {
        if !(box_size.is_finite() && box_size > 0.0) {
            return Err(MorseError::InvalidBoxSize { size: box_size });
        }
        let grid = PackedGridIndex::try_new(bits)?;
        let scale = box_size / grid.extent() as f64;
        Ok(Self {
            grid,
            box_size,
            scale,
        })
    }

    /// Bits per axis.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.grid.bits()
    }

    /// Grid side `N`.
    #[inline]
    pub fn extent(&self) -> usize {
        self.grid.extent()
    }

    /// Number of samples `N^R`.
    #[inline]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Physical box side `L`.
    #[inline]
    pub fn box_size(&self) -> f64 {
        self.box_size
    }

    /// Grid spacing `L / N`.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Squared grid spacing.
    #[inline]
    pub fn scale2(&self) -> f64 {
        self.scale * self.scale
    }

    /// Sample addressing at this bit depth.
    #[inline]
    pub fn grid(&self) -> &PackedGridIndex<R> {
        &self.grid
    }

    /// Physical position of a double-resolution coordinate.
    ///
    /// Double-grid steps are half a grid spacing, so a vertex at `2x` maps to
    /// `x * scale` and an edge midpoint at `2x + 1` to `(x + 0.5) * scale`.
    #[inline]
    pub fn cell_position(&self, double_coords: [usize; R]) -> [f64; R] {
        let half = self.scale / 2.0;
        double_coords.map(|c| c as f64 * half)
    }
}
