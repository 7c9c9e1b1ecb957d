//! Kani formal verification proofs for packed grid arithmetic.
//!
//! Run with: `cargo kani --package dmt-core`

use super::PackedGridIndex;

// ============================================================================
// Proof 1: add stays inside the grid
// ============================================================================
// What: Prove add(i, j) < size() for any in-range i, j
// Why: Results index the scalar field and the tag arrays directly

/// Verify that per-axis addition never carries out of the top axis field.
#[kani::proof]
#[kani::unwind(10)]
fn verify_add_in_range() {
    let grid = PackedGridIndex::<2>::new(3);
    let i: usize = kani::any();
    let j: usize = kani::any();
    kani::assume(i < grid.size() && j < grid.size());

    kani::assert(grid.add(i, j) < grid.size(), "sum must be a valid index");
}

// ============================================================================
// Proof 2: sub inverts add
// ============================================================================
// What: Prove sub(add(i, j), j) == i
// Why: Moore offsets are built with sub and applied with add

/// Verify subtraction undoes addition on every axis at once.
#[kani::proof]
#[kani::unwind(10)]
fn verify_sub_inverts_add() {
    let grid = PackedGridIndex::<2>::new(3);
    let i: usize = kani::any();
    let j: usize = kani::any();
    kani::assume(i < grid.size() && j < grid.size());

    kani::assert(grid.sub(grid.add(i, j), j) == i, "sub must undo add");
}

// ============================================================================
// Proof 3: half_vertex inverts double_vertex
// ============================================================================
// What: Prove half(double(i)) == i
// Why: Cell values are read through half_vertex from double-grid corners

/// Verify the vertex embedding into the double grid round-trips.
#[kani::proof]
#[kani::unwind(10)]
fn verify_half_inverts_double() {
    let single = PackedGridIndex::<2>::new(3);
    let double = PackedGridIndex::<2>::new(4);
    let i: usize = kani::any();
    kani::assume(i < single.size());

    let d = single.double_vertex(i);
    kani::assert(d < double.size(), "doubled vertex must be in range");
    kani::assert(double.count_odd(d) == 0, "doubled vertex must have rank 0");
    kani::assert(double.half_vertex(d) == i, "half must undo double");
}
