// =============================================================================
// Packed Periodic Grid Index
// =============================================================================
//
// An R-dimensional periodic lattice of side N = 2^b, addressed by a single
// usize in which axis k owns the bit field [b*k, b*(k+1)). Axis 0 occupies
// the lowest bits, so a packed index is also the row-major flat index with
// axis 0 varying fastest.
//
// Arithmetic is done field by field: each axis field is added, subtracted or
// multiplied in place and then masked, which discards the carry (or borrow)
// before it can reach the neighbouring axis. That mask is the periodic wrap.

use core::ops::Range;

use crate::error::MorseError;

/// Checks that a grid with `bits` bits on each of `dimension` axes can be
/// addressed by a `usize`, leaving room to compute its size.
pub(crate) fn check_bits(bits: u32, dimension: usize) -> Result<(), MorseError> {
    if bits == 0 {
        return Err(MorseError::InvalidBits { bits });
    }
    let needed = u64::from(bits) * dimension as u64;
    let available = u64::from(usize::BITS - 1);
    if needed > available {
        return Err(MorseError::IndexOverflow {
            bits,
            dimension,
            needed,
            available,
        });
    }
    Ok(())
}

/// Bit-packed addressing for a periodic grid of side `2^bits` in `R` dimensions.
///
/// Every lattice point is a plain `usize`. All arithmetic wraps modulo the
/// side length independently on each axis, so the grid is a torus with no
/// boundary.
///
/// ```text
/// R = 3, bits = 4:
///
///   bit  11 .. 8 | 7 .. 4 | 3 .. 0
///        axis 2  | axis 1 | axis 0
/// ```
///
/// The tables (`mask`, `unit`, `unit2`, and the two offset tables) are built
/// once at construction; the value is immutable afterwards and can be cloned
/// freely between consumers working at the same bit depth.
///
/// # Example
///
/// ```
/// use dmt_core::PackedGridIndex;
///
/// let grid = PackedGridIndex::<2>::new(3); // 8 x 8 torus
/// let i = grid.loc([7, 2]);
/// let j = grid.add(i, grid.unit(0)); // x wraps from 7 to 0
/// assert_eq!(grid.to_vector(j), [0, 2]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedGridIndex<const R: usize> {
    bits: u32,
    masks: [usize; R],
    unit: [usize; R],
    unit2: [usize; R],
    /// OR of all `unit` entries: the lowest bit of every axis field.
    parity_bits: usize,
    hypercube: Vec<usize>,
    moore: Vec<usize>,
}

impl<const R: usize> PackedGridIndex<R> {
    /// Creates the addressing tables for a grid of side `2^bits`.
    ///
    /// # Panics
    ///
    /// Panics if `bits == 0`, if `R == 0`, or if `bits * R` does not leave at
    /// least one spare bit in a `usize`. Use [`try_new`](Self::try_new) to get
    /// these as errors instead.
    pub fn new(bits: u32) -> Self {
        assert!(bits > 0, "grid bit depth must be at least 1");
        assert!(
            check_bits(bits, R).is_ok(),
            "{}-dimensional grid with {} bits per axis does not fit in a usize",
            R,
            bits
        );
        Self::build(bits)
    }

    /// Checked variant of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// [`MorseError::InvalidBits`] for `bits == 0`,
    /// [`MorseError::IndexOverflow`] when the packed index would not fit.
    pub fn try_new(bits: u32) -> Result<Self, MorseError> {
        check_bits(bits, R)?;
        Ok(Self::build(bits))
    }

    /// The grid with one extra bit per axis: twice the resolution, so that
    /// the vertices, edges, faces and cells of this grid all become points of
    /// the returned one.
    ///
    /// # Errors
    ///
    /// [`MorseError::IndexOverflow`] if the doubled grid does not fit.
    pub fn doubled(&self) -> Result<Self, MorseError> {
        Self::try_new(self.bits + 1)
    }

    fn build(bits: u32) -> Self {
        assert!(R > 0, "grid dimension must be at least 1");

        let mut masks = [0usize; R];
        let mut unit = [0usize; R];
        for axis in 0..R {
            let shift = bits * axis as u32;
            masks[axis] = ((1usize << bits) - 1) << shift;
            unit[axis] = 1usize << shift;
        }
        let parity_bits = unit.iter().fold(0, |acc, &u| acc | u);

        let mut grid = Self {
            bits,
            masks,
            unit,
            unit2: [0; R],
            parity_bits,
            hypercube: Vec::with_capacity(1 << R),
            moore: Vec::new(),
        };

        // +2 must be masked: on a 1-bit axis it is the identity, not a carry
        // into the next field.
        for axis in 0..R {
            grid.unit2[axis] = grid.scale(grid.unit[axis], 2);
        }

        grid.hypercube = if bits == 1 {
            (0..1usize << R).collect()
        } else {
            let unit_cell = Self::build(1);
            (0..1usize << R)
                .map(|i| unit_cell.promote(i, bits))
                .collect()
        };

        grid.moore = grid.build_moore_offsets();
        grid
    }

    /// Offsets of every -1/0/+1 combination except the centre, axis 0 fastest.
    fn build_moore_offsets(&self) -> Vec<usize> {
        let centre = self.loc([1; R]);
        let count = 3usize.pow(R as u32);
        let mut offsets = Vec::with_capacity(count - 1);
        for code in 0..count {
            let mut coords = [0usize; R];
            let mut rest = code;
            for c in coords.iter_mut() {
                *c = rest % 3;
                rest /= 3;
            }
            let offset = self.sub(self.loc(coords), centre);
            if coords != [1; R] {
                offsets.push(offset);
            }
        }
        offsets
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Bits per axis.
    #[inline(always)]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of axes.
    #[inline(always)]
    pub const fn dimension(&self) -> usize {
        R
    }

    /// Side length `N = 2^bits`.
    #[inline(always)]
    pub fn extent(&self) -> usize {
        1usize << self.bits
    }

    /// Number of lattice points, `N^R`.
    #[inline(always)]
    pub fn size(&self) -> usize {
        1usize << (self.bits * R as u32)
    }

    /// All packed indices in ascending order.
    #[inline]
    pub fn indices(&self) -> Range<usize> {
        0..self.size()
    }

    /// Bits of the packed index that belong to `axis`.
    #[inline(always)]
    pub fn mask(&self, axis: usize) -> usize {
        self.masks[axis]
    }

    /// Index delta for a +1 step along `axis`.
    #[inline(always)]
    pub fn unit(&self, axis: usize) -> usize {
        self.unit[axis]
    }

    /// Index delta for a +2 step along `axis` (already reduced mod N).
    #[inline(always)]
    pub fn unit2(&self, axis: usize) -> usize {
        self.unit2[axis]
    }

    /// The `2^R` corners of the unit hypercube, as index deltas.
    ///
    /// Entry `c` has coordinate `(c >> k) & 1` on axis `k`. Adding each entry
    /// to a reference point enumerates the lattice points of the cube that
    /// has the reference point as its lowest corner.
    #[inline]
    pub fn hypercube_offsets(&self) -> &[usize] {
        &self.hypercube
    }

    /// The `3^R - 1` deltas of the centred Moore neighbourhood.
    ///
    /// On a 1-bit axis -1 and +1 coincide, so small grids see repeated points.
    #[inline]
    pub fn moore_offsets(&self) -> &[usize] {
        &self.moore
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Raw bit field of `axis` in `i`, left in place (not shifted down).
    #[inline(always)]
    pub fn field(&self, i: usize, axis: usize) -> usize {
        i & self.masks[axis]
    }

    /// Coordinate of `i` along `axis`, in `0..N`.
    #[inline(always)]
    pub fn axis_value(&self, i: usize, axis: usize) -> usize {
        (i & self.masks[axis]) >> (self.bits * axis as u32)
    }

    /// All coordinates of `i`.
    #[inline]
    pub fn to_vector(&self, i: usize) -> [usize; R] {
        core::array::from_fn(|axis| self.axis_value(i, axis))
    }

    /// Packs coordinates into an index. Each coordinate is reduced mod N.
    #[inline]
    pub fn loc(&self, coords: [usize; R]) -> usize {
        let low = self.extent() - 1;
        coords
            .iter()
            .enumerate()
            .fold(0, |n, (axis, &c)| n | ((c & low) << (self.bits * axis as u32)))
    }

    /// `true` if the coordinate of `i` along `axis` is odd.
    #[inline(always)]
    pub fn is_odd(&self, i: usize, axis: usize) -> bool {
        i & self.unit[axis] != 0
    }

    /// Number of axes with an odd coordinate.
    ///
    /// On a double-resolution grid this is the rank of the cell: 0 for a
    /// vertex, 1 for an edge, up to `R` for a top cell.
    #[inline(always)]
    pub fn count_odd(&self, i: usize) -> u32 {
        (i & self.parity_bits).count_ones()
    }

    // =========================================================================
    // Periodic Arithmetic
    // =========================================================================

    /// Per-axis `(i + j) mod N`.
    #[inline]
    pub fn add(&self, i: usize, j: usize) -> usize {
        self.masks
            .iter()
            .fold(0, |n, &m| n | ((i & m).wrapping_add(j & m) & m))
    }

    /// Per-axis `(i - j) mod N`.
    #[inline]
    pub fn sub(&self, i: usize, j: usize) -> usize {
        self.masks
            .iter()
            .fold(0, |n, &m| n | ((i & m).wrapping_sub(j & m) & m))
    }

    /// Per-axis `(i * k) mod N`.
    #[inline]
    pub fn scale(&self, i: usize, k: usize) -> usize {
        self.masks
            .iter()
            .fold(0, |n, &m| n | ((i & m).wrapping_mul(k) & m))
    }

    /// Per-axis `(-i) mod N`.
    #[inline]
    pub fn negate(&self, i: usize) -> usize {
        self.masks
            .iter()
            .fold(0, |n, &m| n | (0usize.wrapping_sub(i & m) & m))
    }

    /// Increments the coordinate of `i` along a single axis, wrapping.
    #[inline(always)]
    pub fn inc(&self, i: usize, axis: usize) -> usize {
        let m = self.masks[axis];
        ((i & m).wrapping_add(self.unit[axis]) & m) | (i & !m)
    }

    /// Decrements the coordinate of `i` along a single axis, wrapping.
    #[inline(always)]
    pub fn dec(&self, i: usize, axis: usize) -> usize {
        let m = self.masks[axis];
        ((i & m).wrapping_sub(self.unit[axis]) & m) | (i & !m)
    }

    // =========================================================================
    // Resolution Changes
    // =========================================================================

    /// Re-expresses `i` in the layout of a grid with `target_bits` per axis,
    /// keeping every coordinate value.
    ///
    /// Used to lift small offset patterns (such as the unit hypercube of a
    /// 1-bit grid) into a finer grid.
    #[inline]
    pub fn promote(&self, i: usize, target_bits: u32) -> usize {
        debug_assert!(target_bits >= self.bits, "promote cannot drop bits");
        let extra = target_bits - self.bits;
        self.masks
            .iter()
            .enumerate()
            .fold(0, |n, (axis, &m)| n | ((i & m) << (extra * axis as u32)))
    }

    /// Maps a point of this grid to the vertex of the double-resolution grid
    /// (`bits + 1` per axis) that has every coordinate doubled.
    #[inline]
    pub fn double_vertex(&self, i: usize) -> usize {
        self.masks
            .iter()
            .enumerate()
            .fold(0, |n, (axis, &m)| n | ((i & m) << (axis + 1)))
    }

    /// Maps a point of this grid, read as a double-resolution grid, to the
    /// point of the `bits - 1` grid with every coordinate halved (rounded down).
    ///
    /// For a vertex this inverts [`double_vertex`](Self::double_vertex); for
    /// a higher cell it gives the lowest corner of the cell.
    #[inline]
    pub fn half_vertex(&self, i: usize) -> usize {
        self.masks
            .iter()
            .zip(self.unit.iter())
            .enumerate()
            .fold(0, |n, (axis, (&m, &u))| n | ((i & m & !u) >> (axis + 1)))
    }

    // =========================================================================
    // Cubical Incidence (double-resolution reading)
    // =========================================================================

    /// Calls `f` for each facet of cell `i`: one rank lower, reached by a
    /// ±1 step along an axis where `i` has an odd coordinate.
    ///
    /// Axes are visited in ascending order, the + side before the - side.
    #[inline]
    pub fn for_each_facet<F>(&self, i: usize, mut f: F)
    where
        F: FnMut(usize),
    {
        for axis in 0..R {
            if self.is_odd(i, axis) {
                f(self.inc(i, axis));
                f(self.dec(i, axis));
            }
        }
    }

    /// Calls `f` for each cofacet of cell `i`: one rank higher, reached by a
    /// ±1 step along an axis where `i` has an even coordinate.
    ///
    /// Axes are visited in ascending order, the + side before the - side.
    #[inline]
    pub fn for_each_cofacet<F>(&self, i: usize, mut f: F)
    where
        F: FnMut(usize),
    {
        for axis in 0..R {
            if !self.is_odd(i, axis) {
                f(self.inc(i, axis));
                f(self.dec(i, axis));
            }
        }
    }
}
