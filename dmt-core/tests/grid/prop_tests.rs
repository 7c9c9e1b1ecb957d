//! Property-based tests for packed grid arithmetic.
//!
//! Every operation is compared against the same computation done on plain
//! coordinate arrays with explicit `% N`.

use dmt_core::PackedGridIndex;
use proptest::prelude::*;

const BITS: u32 = 5;
const N: usize = 1 << BITS;

fn grid3() -> PackedGridIndex<3> {
    PackedGridIndex::<3>::new(BITS)
}

fn coords() -> impl Strategy<Value = [usize; 3]> {
    [0..N, 0..N, 0..N]
}

proptest! {
    #[test]
    fn prop_add_is_per_axis_modular(a in coords(), b in coords()) {
        let grid = grid3();
        let sum = grid.to_vector(grid.add(grid.loc(a), grid.loc(b)));
        for k in 0..3 {
            prop_assert_eq!(sum[k], (a[k] + b[k]) % N, "axis {} must wrap on its own", k);
        }
    }

    #[test]
    fn prop_sub_is_per_axis_modular(a in coords(), b in coords()) {
        let grid = grid3();
        let diff = grid.to_vector(grid.sub(grid.loc(a), grid.loc(b)));
        for k in 0..3 {
            prop_assert_eq!(diff[k], (a[k] + N - b[k]) % N);
        }
    }

    #[test]
    fn prop_sub_inverts_add(a in coords(), b in coords()) {
        let grid = grid3();
        let (i, j) = (grid.loc(a), grid.loc(b));
        prop_assert_eq!(grid.sub(grid.add(i, j), j), i);
        prop_assert_eq!(grid.add(grid.sub(i, j), j), i);
    }

    #[test]
    fn prop_negate_is_additive_inverse(a in coords()) {
        let grid = grid3();
        let i = grid.loc(a);
        prop_assert_eq!(grid.add(i, grid.negate(i)), 0);
        prop_assert_eq!(grid.negate(grid.negate(i)), i);
        prop_assert_eq!(grid.negate(i), grid.sub(0, i));
    }

    #[test]
    fn prop_scale_is_per_axis_modular(a in coords(), k in 0usize..1000) {
        let grid = grid3();
        let scaled = grid.to_vector(grid.scale(grid.loc(a), k));
        for axis in 0..3 {
            prop_assert_eq!(scaled[axis], a[axis] * k % N);
        }
    }

    #[test]
    fn prop_results_stay_in_range(a in coords(), b in coords(), k in any::<usize>()) {
        let grid = grid3();
        let (i, j) = (grid.loc(a), grid.loc(b));
        prop_assert!(grid.add(i, j) < grid.size());
        prop_assert!(grid.sub(i, j) < grid.size());
        prop_assert!(grid.scale(i, k) < grid.size());
        prop_assert!(grid.negate(i) < grid.size());
    }

    #[test]
    fn prop_loc_inverts_to_vector(i in 0usize..N * N * N) {
        let grid = grid3();
        prop_assert_eq!(grid.loc(grid.to_vector(i)), i);
    }

    #[test]
    fn prop_promote_preserves_coordinates(a in coords(), extra in 1u32..6) {
        let grid = grid3();
        let target = PackedGridIndex::<3>::new(BITS + extra);
        let promoted = grid.promote(grid.loc(a), BITS + extra);
        prop_assert_eq!(target.to_vector(promoted), a);
    }

    #[test]
    fn prop_double_then_half_is_identity(a in coords()) {
        let grid = grid3();
        let double = grid.doubled().unwrap();
        let d = grid.double_vertex(grid.loc(a));
        prop_assert_eq!(double.to_vector(d), a.map(|c| 2 * c));
        prop_assert_eq!(double.half_vertex(d), grid.loc(a));
    }

    #[test]
    fn prop_facets_one_rank_down(a in coords()) {
        let double = grid3();
        let cell = double.loc(a);
        let rank = double.count_odd(cell);
        let mut count = 0u32;
        double.for_each_facet(cell, |f| {
            count += 1;
            assert_eq!(double.count_odd(f), rank - 1);
        });
        prop_assert_eq!(count, 2 * rank, "a rank-k cell has 2k facets");
    }

    #[test]
    fn prop_cofacets_one_rank_up(a in coords()) {
        let double = grid3();
        let cell = double.loc(a);
        let rank = double.count_odd(cell);
        let mut count = 0u32;
        double.for_each_cofacet(cell, |c| {
            count += 1;
            assert_eq!(double.count_odd(c), rank + 1);
        });
        prop_assert_eq!(count, 2 * (3 - rank), "a rank-k cell has 2(R-k) cofacets");
    }

    #[test]
    fn prop_facet_cofacet_duality(a in coords()) {
        let double = grid3();
        let cell = double.loc(a);
        let mut facets = Vec::new();
        double.for_each_facet(cell, |f| facets.push(f));
        for f in facets {
            let mut found = false;
            double.for_each_cofacet(f, |c| found |= c == cell);
            prop_assert!(found, "cell must be a cofacet of each of its facets");
        }
    }
}
