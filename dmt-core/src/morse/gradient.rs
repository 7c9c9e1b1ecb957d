// =============================================================================
// Gradient Construction
// =============================================================================
//
// Priority-driven pairing over the double-resolution complex.
//
// 1. Seed: every vertex with no strictly smaller Moore neighbour is critical;
//    its cofacets are queued.
// 2. Pop the lowest (value, rank, index) entry. Stale entries (already
//    resolved) are skipped. Otherwise count the cell's unpaired facets:
//      one  -> pair facet -> cell, queue the cofacets of both
//      zero -> critical, queue the cofacets
//      more -> not ready; a later resolution of a facet re-queues it
// 3. When the queue drains every cell must be resolved.
//
// The queue only ever holds cofacets of resolved cells, so a cell is popped
// at the earliest once one of its facets is decided.

use core::cmp::Reverse;
use core::ops::ControlFlow;
use std::collections::BinaryHeap;

use crate::error::MorseError;
use crate::progress::{BuildObserver, NoProgress};

use super::cell::{CellTag, CriticalCounts, QueuedCell};
use super::complex::MorseComplex;

/// Mutable state of one build, kept apart from the complex so the complex
/// can be borrowed immutably while the queue is fed.
struct PairingState<'o, O: ?Sized> {
    queue: BinaryHeap<Reverse<QueuedCell>>,
    observer: &'o mut O,
    resolved: usize,
    cancelled: bool,
    pushed: usize,
    stale: usize,
}

impl<'o, O: BuildObserver + ?Sized> PairingState<'o, O> {
    fn new(observer: &'o mut O) -> Self {
        Self {
            queue: BinaryHeap::new(),
            observer,
            resolved: 0,
            cancelled: false,
            pushed: 0,
            stale: 0,
        }
    }
}

impl<'a, const R: usize> MorseComplex<'a, R> {
    /// Builds the discrete gradient field without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`build_gradient_field_with`](Self::build_gradient_field_with).
    pub fn build_gradient_field(&mut self) -> Result<CriticalCounts, MorseError> {
        self.build_gradient_field_with(&mut NoProgress)
    }

    /// Builds the discrete gradient field, reporting every resolved cell to
    /// `observer`.
    ///
    /// On success every cell is `Source`, `Target` or `Critical`, and the
    /// per-rank critical counts are returned.
    ///
    /// # Errors
    ///
    /// - [`MorseError::AlreadyBuilt`] on a second call. Nothing is changed.
    /// - [`MorseError::Cancelled`] if the observer returned `Break`. The
    ///   complex keeps the partial state and counts as built.
    /// - [`MorseError::PairingInvariant`] / [`MorseError::Unresolved`] if the
    ///   pairing breaks its own invariants.
    pub fn build_gradient_field_with<O>(
        &mut self,
        observer: &mut O,
    ) -> Result<CriticalCounts, MorseError>
    where
        O: BuildObserver + ?Sized,
    {
        if self.built {
            return Err(MorseError::AlreadyBuilt);
        }
        self.built = true;

        let mut state = PairingState::new(observer);

        let minima = self.seed_minima(&mut state);
        log::debug!(
            "seeded {} minima on a {}^{} grid, {} cells queued",
            minima,
            self.single.extent(),
            R,
            state.queue.len()
        );

        loop {
            if state.cancelled {
                return Err(MorseError::Cancelled {
                    resolved: state.resolved,
                });
            }
            let Some(Reverse(entry)) = state.queue.pop() else {
                break;
            };
            let cell = entry.index;
            if self.tags[cell] != CellTag::Unpaired {
                state.stale += 1;
                continue;
            }

            match self.unpaired_facets(cell) {
                (1, Some(facet)) => self.make_pair(facet, cell, &mut state)?,
                (0, _) => {
                    self.resolve(cell, CellTag::Critical, &mut state);
                    self.push_cofacets(cell, &mut state);
                }
                _ => {}
            }
        }

        self.check_totality()?;

        let counts = self.critical_counts();
        log::debug!(
            "gradient built: {} pushes, {} stale pops, {}",
            state.pushed,
            state.stale,
            counts
        );
        state.observer.finished(&counts);
        Ok(counts)
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Marks every vertex without a strictly smaller Moore neighbour as a
    /// critical minimum. Returns the number of minima seeded.
    fn seed_minima<O>(&mut self, state: &mut PairingState<'_, O>) -> usize
    where
        O: BuildObserver + ?Sized,
    {
        let mut minima = 0;
        for vertex in self.single.indices() {
            if !self.is_local_minimum(vertex) {
                continue;
            }
            let cell = self.single.double_vertex(vertex);
            self.resolve(cell, CellTag::Critical, state);
            self.push_cofacets(cell, state);
            minima += 1;
            if state.cancelled {
                break;
            }
        }
        minima
    }

    /// `true` if no Moore neighbour of single-grid `vertex` is strictly
    /// smaller. These are exactly the vertices seeded as rank-0 critical cells.
    pub fn is_local_minimum(&self, vertex: usize) -> bool {
        let value = self.data[vertex];
        self.single
            .moore_offsets()
            .iter()
            .all(|&d| self.data[self.single.add(vertex, d)] >= value)
    }

    /// Fails with the first cell still [`CellTag::Unpaired`].
    fn check_totality(&self) -> Result<(), MorseError> {
        match self.tags.iter().position(|t| !t.is_resolved()) {
            Some(cell) => {
                log::error!("cell {cell} left unpaired after the queue drained");
                Err(MorseError::Unresolved { cell })
            }
            None => Ok(()),
        }
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    /// Counts facets of `cell` that are still unpaired, returning the count and
    /// the last such facet.
    fn unpaired_facets(&self, cell: usize) -> (u32, Option<usize>) {
        let mut count = 0;
        let mut last = None;
        self.double.for_each_facet(cell, |facet| {
            if self.tags[facet] == CellTag::Unpaired {
                count += 1;
                last = Some(facet);
            }
        });
        (count, last)
    }

    /// Commits the arrow `source -> target` and queues the cofacets of both.
    fn make_pair<O>(
        &mut self,
        source: usize,
        target: usize,
        state: &mut PairingState<'_, O>,
    ) -> Result<(), MorseError>
    where
        O: BuildObserver + ?Sized,
    {
        let (unpaired, facet) = self.unpaired_facets(target);
        if unpaired != 1 || facet != Some(source) {
            log::error!(
                "pairing invariant violated at cell {target}: {unpaired} unpaired facets"
            );
            return Err(MorseError::PairingInvariant {
                cell: target,
                unpaired,
            });
        }

        self.gradient[source] = target;
        self.gradient[target] = source;
        self.resolve(source, CellTag::Source, state);
        self.resolve(target, CellTag::Target, state);
        self.push_cofacets(source, state);
        self.push_cofacets(target, state);
        Ok(())
    }

    /// Queues every unpaired cofacet of `cell`.
    fn push_cofacets<O>(&self, cell: usize, state: &mut PairingState<'_, O>)
    where
        O: BuildObserver + ?Sized,
    {
        self.double.for_each_cofacet(cell, |cofacet| {
            if self.tags[cofacet] == CellTag::Unpaired {
                state.queue.push(Reverse(QueuedCell {
                    value: self.value(cofacet),
                    rank: self.rank(cofacet),
                    index: cofacet,
                }));
                state.pushed += 1;
            }
        });
    }

    /// Applies a terminal tag and notifies the observer.
    fn resolve<O>(&mut self, cell: usize, tag: CellTag, state: &mut PairingState<'_, O>)
    where
        O: BuildObserver + ?Sized,
    {
        debug_assert_eq!(self.tags[cell], CellTag::Unpaired);
        self.tags[cell] = tag;
        state.resolved += 1;
        if let ControlFlow::Break(()) = state.observer.cell_resolved(cell, tag) {
            state.cancelled = true;
        }
    }
}
