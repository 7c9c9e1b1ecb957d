//! Build observers.
//!
//! Gradient construction reports each cell that leaves the unpaired state to
//! a [`BuildObserver`]. The observer is passed explicitly to
//! [`MorseComplex::build_gradient_field_with`](crate::MorseComplex::build_gradient_field_with);
//! nothing is held in global state.
//!
//! Returning [`ControlFlow::Break`] from [`BuildObserver::cell_resolved`]
//! stops the build at the next point where the queue is in a consistent
//! state. Closures of type `FnMut(usize, CellTag) -> ControlFlow<()>` are
//! observers too:
//!
//! ```
//! use core::ops::ControlFlow;
//! use dmt_core::{CellTag, MorseComplex, MorseError};
//!
//! let field = [0.0, 1.0, 1.0, 2.0];
//! let mut complex = MorseComplex::<2>::new(1, &field)?;
//!
//! let mut critical = 0;
//! let mut observer = |_cell: usize, tag: CellTag| -> ControlFlow<()> {
//!     if tag == CellTag::Critical {
//!         critical += 1;
//!     }
//!     ControlFlow::Continue(())
//! };
//! let counts = complex.build_gradient_field_with(&mut observer)?;
//! assert_eq!(critical, counts.total());
//! # Ok::<(), MorseError>(())
//! ```

use core::ops::ControlFlow;

use crate::morse::{CellTag, CriticalCounts};

/// Receives progress events from gradient construction.
pub trait BuildObserver {
    /// Called once for every cell that leaves [`CellTag::Unpaired`], with the
    /// tag it was given. Seeded minima and critical cells report
    /// [`CellTag::Critical`]; each pair reports its source and then its target.
    #[inline]
    fn cell_resolved(&mut self, cell: usize, tag: CellTag) -> ControlFlow<()> {
        let _ = (cell, tag);
        ControlFlow::Continue(())
    }

    /// Called once after a complete, successful build.
    #[inline]
    fn finished(&mut self, counts: &CriticalCounts) {
        let _ = counts;
    }
}

impl<F> BuildObserver for F
where
    F: FnMut(usize, CellTag) -> ControlFlow<()>,
{
    #[inline]
    fn cell_resolved(&mut self, cell: usize, tag: CellTag) -> ControlFlow<()> {
        self(cell, tag)
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl BuildObserver for NoProgress {}

/// Observer that logs progress at `info` level in steps of 2% of all cells.
#[derive(Clone, Debug)]
pub struct LogProgress {
    label: String,
    total: usize,
    step: usize,
    next_report: usize,
    resolved: usize,
}

impl LogProgress {
    /// Number of progress lines logged over a complete build.
    pub const STEPS: usize = 50;

    /// Creates an observer for a complex of `total` cells (see
    /// [`MorseComplex::len`](crate::MorseComplex::len)).
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        let step = (total / Self::STEPS).max(1);
        Self {
            label: label.into(),
            total,
            step,
            next_report: step,
            resolved: 0,
        }
    }

    /// Cells reported so far.
    pub fn resolved(&self) -> usize {
        self.resolved
    }
}

impl BuildObserver for LogProgress {
    fn cell_resolved(&mut self, _cell: usize, _tag: CellTag) -> ControlFlow<()> {
        self.resolved += 1;
        if self.resolved >= self.next_report {
            let percent = self.resolved * 100 / self.total.max(1);
            log::info!(
                "{}: {}/{} cells resolved ({}%)",
                self.label,
                self.resolved,
                self.total,
                percent
            );
            self.next_report += self.step;
        }
        ControlFlow::Continue(())
    }

    fn finished(&mut self, counts: &CriticalCounts) {
        log::info!("{}: done, {}", self.label, counts);
    }
}
