// =============================================================================
// Morse Complex State
// =============================================================================
//
// Owns the per-cell state of the double-resolution cubical complex (tags and
// gradient map) and borrows the single-resolution scalar field. Construction
// validates everything up front; afterwards only gradient construction
// (gradient.rs) mutates the state, and every query here is read-only.

use crate::box_config::BoxConfig;
use crate::error::MorseError;
use crate::grid::packed::check_bits;
use crate::grid::PackedGridIndex;

use super::cell::{
    CellTag, CriticalCell, CriticalCounts, GradientArrow, NO_PARTNER,
};

/// Discrete gradient field over the cubical complex of a periodic scalar field.
///
/// The scalar field has `N^R` samples (`N = 2^bits`, row-major, axis 0
/// fastest). The complex addresses its cells on the double-resolution grid
/// (`bits + 1` per axis), where a cell's rank is its number of odd
/// coordinates.
///
/// # Lifecycle
///
/// 1. [`new`](Self::new): every cell starts [`CellTag::Unpaired`].
/// 2. [`build_gradient_field`](Self::build_gradient_field): runs once.
/// 3. Queries: [`for_each_critical`](Self::for_each_critical),
///    [`critical_cells`](Self::critical_cells), [`arrows`](Self::arrows), ...
///
/// # Example
///
/// ```
/// use dmt_core::{MorseComplex, MorseError};
/// use dmt_core::testing_fields::sine_field;
///
/// let field = sine_field::<2>(3, 1);
/// let mut complex = MorseComplex::<2>::new(3, &field)?;
/// let counts = complex.build_gradient_field()?;
///
/// assert_eq!(counts.euler_characteristic(), 0);
/// complex.for_each_critical(|coords, rank| {
///     assert!(coords.iter().all(|&c| c < 16));
///     assert!(rank <= 2);
/// });
/// # Ok::<(), MorseError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MorseComplex<'a, const R: usize> {
    pub(super) single: PackedGridIndex<R>,
    pub(super) double: PackedGridIndex<R>,
    pub(super) data: &'a [f64],
    pub(super) tags: Vec<CellTag>,
    pub(super) gradient: Vec<usize>,
    pub(super) built: bool,
}

impl<'a, const R: usize> MorseComplex<'a, R> {
    /// Validates the field and allocates per-cell state.
    ///
    /// # Errors
    ///
    /// - [`MorseError::InvalidBits`] if `bits == 0`.
    /// - [`MorseError::IndexOverflow`] if the double grid does not fit a `usize`.
    /// - [`MorseError::FieldSize`] if `data.len() != 2^(bits * R)`.
    /// - [`MorseError::NotANumber`] for the first NaN sample.
    pub fn new(bits: u32, data: &'a [f64]) -> Result<Self, MorseError> {
        check_bits(bits, R)?;
        check_bits(bits + 1, R)?;

        let expected = 1usize << (bits * R as u32);
        if data.len() != expected {
            return Err(MorseError::FieldSize {
                expected,
                actual: data.len(),
            });
        }
        if let Some(index) = data.iter().position(|v| v.is_nan()) {
            return Err(MorseError::NotANumber { index });
        }

        let single = PackedGridIndex::try_new(bits)?;
        let double = single.doubled()?;
        let cells = double.size();

        Ok(Self {
            single,
            double,
            data,
            tags: vec![CellTag::Unpaired; cells],
            gradient: vec![NO_PARTNER; cells],
            built: false,
        })
    }

    /// Same as [`new`](Self::new), taking the bit depth from a [`BoxConfig`].
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn from_config(config: &BoxConfig<R>, data: &'a [f64]) -> Result<Self, MorseError> {
        Self::new(config.bits(), data)
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Addressing of the scalar samples (`bits` per axis).
    #[inline]
    pub fn single_grid(&self) -> &PackedGridIndex<R> {
        &self.single
    }

    /// Addressing of the cells (`bits + 1` per axis).
    #[inline]
    pub fn double_grid(&self) -> &PackedGridIndex<R> {
        &self.double
    }

    /// The borrowed scalar field.
    #[inline]
    pub fn field(&self) -> &'a [f64] {
        self.data
    }

    /// Number of cells, `(2N)^R`.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Always `false`: a valid complex has at least `4^R` cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether gradient construction has been started.
    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    // =========================================================================
    // Cell Queries
    // =========================================================================

    /// Rank of `cell`: its number of odd double-grid coordinates.
    #[inline]
    pub fn rank(&self, cell: usize) -> u32 {
        self.double.count_odd(cell)
    }

    /// Upper-star value of `cell`: the largest sample among its corner vertices.
    #[inline]
    pub fn value(&self, cell: usize) -> f64 {
        self.double
            .hypercube_offsets()
            .iter()
            .map(|&d| self.data[self.double.half_vertex(self.double.add(cell, d))])
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Current tag of `cell`.
    #[inline]
    pub fn tag(&self, cell: usize) -> CellTag {
        self.tags[cell]
    }

    /// All tags, indexed by double-grid cell.
    #[inline]
    pub fn tags(&self) -> &[CellTag] {
        &self.tags
    }

    /// Gradient partner of `cell`, or `None` if it is critical or unresolved.
    #[inline]
    pub fn partner(&self, cell: usize) -> Option<usize> {
        match self.gradient[cell] {
            NO_PARTNER => None,
            p => Some(p),
        }
    }

    /// Raw gradient map; unpaired entries hold [`NO_PARTNER`].
    #[inline]
    pub fn gradient_map(&self) -> &[usize] {
        &self.gradient
    }

    // =========================================================================
    // Critical Cells
    // =========================================================================

    /// Calls `f(coords, rank)` for every critical cell, in ascending index order.
    ///
    /// Coordinates are on the double grid, each in `0..2N`.
    pub fn for_each_critical<F>(&self, mut f: F)
    where
        F: FnMut([usize; R], u32),
    {
        for (cell, _) in self.critical_indices() {
            f(self.double.to_vector(cell), self.rank(cell));
        }
    }

    /// Critical cells in ascending index order.
    pub fn critical_cells(&self) -> impl Iterator<Item = CriticalCell<R>> + '_ {
        self.critical_indices().map(move |(index, _)| CriticalCell {
            index,
            coords: self.double.to_vector(index),
            rank: self.rank(index),
            value: self.value(index),
        })
    }

    /// Critical cells per rank.
    pub fn critical_counts(&self) -> CriticalCounts {
        let mut counts = CriticalCounts::new(R);
        for (cell, _) in self.critical_indices() {
            counts.record(self.rank(cell));
        }
        counts
    }

    fn critical_indices(&self) -> impl Iterator<Item = (usize, CellTag)> + '_ {
        self.tags
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, tag)| tag == CellTag::Critical)
    }

    // =========================================================================
    // Gradient Arrows
    // =========================================================================

    /// Every gradient arrow, one per `Source` cell, in ascending source order.
    pub fn arrows(&self) -> impl Iterator<Item = GradientArrow<R>> + '_ {
        self.tags
            .iter()
            .enumerate()
            .filter(|&(_, &tag)| tag == CellTag::Source)
            .filter_map(move |(source, _)| {
                let target = self.partner(source)?;
                Some(GradientArrow {
                    source,
                    target,
                    direction: self.displacement(source, target),
                })
            })
    }

    /// Shortest periodic displacement `to - from`, per axis, in `(-N, N]`.
    fn displacement(&self, from: usize, to: usize) -> [isize; R] {
        let extent = self.double.extent() as isize;
        let half = extent / 2;
        let delta = self.double.sub(to, from);
        core::array::from_fn(|axis| {
            let d = self.double.axis_value(delta, axis) as isize;
            if d > half {
                d - extent
            } else {
                d
            }
        })
    }
}
