// =============================================================================
// Cell Types
// =============================================================================
//
// A cell is never materialised as an object: it is a double-resolution packed
// index. These are the small value types that travel alongside those indices
// (state tags, queue entries) and the records handed to callers once the
// gradient has been built.

use core::cmp::Ordering;
use core::fmt;

/// Gradient-map entry for a cell with no partner (critical or unresolved).
pub const NO_PARTNER: usize = usize::MAX;

/// Pairing state of one cell.
///
/// `Unpaired` is the only non-terminal state. Once a cell is tagged
/// `Source`, `Target` or `Critical` it keeps that tag.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellTag {
    /// Not yet decided.
    #[default]
    Unpaired = 0,
    /// Tail of a gradient arrow (the lower-rank end of a pair).
    Source = 1,
    /// Head of a gradient arrow (the higher-rank end of a pair).
    Target = 2,
    /// Fixed point of the gradient field.
    Critical = 3,
}

impl CellTag {
    /// `true` for every tag except [`CellTag::Unpaired`].
    #[inline(always)]
    pub fn is_resolved(self) -> bool {
        self != CellTag::Unpaired
    }

    /// `true` for [`CellTag::Source`] and [`CellTag::Target`].
    #[inline(always)]
    pub fn is_paired(self) -> bool {
        matches!(self, CellTag::Source | CellTag::Target)
    }
}

// =============================================================================
// Priority Queue Entry
// =============================================================================

/// Entry of the pairing queue, ordered by `(value, rank, index)`.
///
/// The index term makes the order total over distinct cells, so the pop
/// sequence never depends on heap internals.
#[derive(Clone, Copy, Debug)]
pub(crate) struct QueuedCell {
    pub value: f64,
    pub rank: u32,
    pub index: usize,
}

impl Ord for QueuedCell {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then(self.rank.cmp(&other.rank))
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for QueuedCell {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedCell {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedCell {}

// =============================================================================
// Output Records
// =============================================================================

/// Topological type of a critical cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CriticalKind {
    /// Rank 0.
    Minimum,
    /// Any rank strictly between 0 and the dimension.
    Saddle(u32),
    /// Rank equal to the dimension.
    Maximum,
}

impl CriticalKind {
    /// Classifies a critical cell of `rank` in a `dimension`-dimensional complex.
    #[inline]
    pub fn from_rank(rank: u32, dimension: usize) -> Self {
        if rank == 0 {
            CriticalKind::Minimum
        } else if rank as usize >= dimension {
            CriticalKind::Maximum
        } else {
            CriticalKind::Saddle(rank)
        }
    }
}

impl fmt::Display for CriticalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriticalKind::Minimum => f.write_str("minimum"),
            CriticalKind::Saddle(rank) => write!(f, "saddle-{rank}"),
            CriticalKind::Maximum => f.write_str("maximum"),
        }
    }
}

/// A critical cell, as reported after the gradient has been built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CriticalCell<const R: usize> {
    /// Double-resolution packed index.
    pub index: usize,
    /// Double-resolution coordinates, each in `0..2N`. Even on every axis for
    /// a vertex; odd where the cell spans a grid step.
    pub coords: [usize; R],
    /// Number of odd coordinates.
    pub rank: u32,
    /// Upper-star value of the cell.
    pub value: f64,
}

impl<const R: usize> CriticalCell<R> {
    /// Minimum, saddle or maximum, from the rank.
    #[inline]
    pub fn kind(&self) -> CriticalKind {
        CriticalKind::from_rank(self.rank, R)
    }
}

/// Number of critical cells of each rank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalCounts {
    by_rank: Vec<usize>,
}

impl CriticalCounts {
    /// All-zero counts for ranks `0..=dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            by_rank: vec![0; dimension + 1],
        }
    }

    /// Adds one critical cell of `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` exceeds the dimension passed to [`new`](Self::new).
    #[inline]
    pub fn record(&mut self, rank: u32) {
        self.by_rank[rank as usize] += 1;
    }

    /// Count for one rank; zero for ranks above the dimension.
    #[inline]
    pub fn rank(&self, rank: u32) -> usize {
        self.by_rank.get(rank as usize).copied().unwrap_or(0)
    }

    /// Counts indexed by rank.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.by_rank
    }

    /// Dimension of the complex the counts were taken from.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.by_rank.len().saturating_sub(1)
    }

    /// Rank-0 critical cells.
    pub fn minima(&self) -> usize {
        self.rank(0)
    }

    /// Top-rank critical cells.
    pub fn maxima(&self) -> usize {
        self.rank(self.dimension() as u32)
    }

    /// Critical cells of every rank strictly between 0 and the dimension.
    pub fn saddles(&self) -> usize {
        self.total() - self.minima() - self.maxima()
    }

    /// Total number of critical cells.
    pub fn total(&self) -> usize {
        self.by_rank.iter().sum()
    }

    /// Alternating sum `c0 - c1 + c2 - ...`.
    ///
    /// A valid gradient field on a periodic grid gives the Euler
    /// characteristic of the torus, which is 0 in every dimension.
    pub fn euler_characteristic(&self) -> i64 {
        self.by_rank
            .iter()
            .enumerate()
            .map(|(rank, &n)| if rank % 2 == 0 { n as i64 } else { -(n as i64) })
            .sum()
    }
}

impl fmt::Display for CriticalCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, n) in self.by_rank.iter().enumerate() {
            if rank > 0 {
                f.write_str(", ")?;
            }
            write!(f, "rank {rank}: {n}")?;
        }
        write!(f, " (euler characteristic {})", self.euler_characteristic())
    }
}

/// One arrow of the discrete gradient: a `Source` cell and its `Target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GradientArrow<const R: usize> {
    /// Lower-rank end.
    pub source: usize,
    /// Higher-rank end, one rank above `source`.
    pub target: usize,
    /// Periodic displacement from source to target in double-grid units.
    /// Exactly one axis is ±1, the rest are 0.
    pub direction: [isize; R],
}
