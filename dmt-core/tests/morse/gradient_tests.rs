//! Construction checks and read-only queries of `MorseComplex`.

use dmt_core::testing_fields::{lcg_noise_field, sine_field};
use dmt_core::{
    BoxConfig, CellTag, CriticalKind, MorseComplex, MorseError, TestFields, NO_PARTNER,
};

use crate::common;

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_new_allocates_double_grid() {
    let field = vec![0.0; 64];
    let complex = MorseComplex::<2>::new(3, &field).unwrap();
    assert_eq!(complex.len(), 256);
    assert!(!complex.is_empty());
    assert!(!complex.is_built());
    assert_eq!(complex.single_grid().bits(), 3);
    assert_eq!(complex.double_grid().bits(), 4);
    assert!(complex.tags().iter().all(|&t| t == CellTag::Unpaired));
    assert!(complex.gradient_map().iter().all(|&p| p == NO_PARTNER));
    assert!(std::ptr::eq(complex.field(), field.as_slice()));
}

#[test]
fn test_zero_bits_rejected() {
    let field = [1.0];
    let err = MorseComplex::<2>::new(0, &field).unwrap_err();
    assert_eq!(err, MorseError::InvalidBits { bits: 0 });
}

#[test]
fn test_wrong_field_size_rejected() {
    let field = vec![0.0; 63];
    let err = MorseComplex::<2>::new(3, &field).unwrap_err();
    assert_eq!(
        err,
        MorseError::FieldSize {
            expected: 64,
            actual: 63
        }
    );
}

#[test]
fn test_nan_sample_rejected() {
    let mut field = vec![0.5; 16];
    field[11] = f64::NAN;
    let err = MorseComplex::<2>::new(2, &field).unwrap_err();
    assert_eq!(err, MorseError::NotANumber { index: 11 });
}

#[test]
fn test_double_grid_overflow_checked_before_field() {
    let bits = (usize::BITS - 1) / 3;
    let err = MorseComplex::<3>::new(bits, &[]).unwrap_err();
    assert!(
        matches!(err, MorseError::IndexOverflow { bits: b, .. } if b == bits + 1),
        "got {err:?}"
    );
}

#[test]
fn test_from_config_uses_bit_depth() {
    let config = BoxConfig::<2>::new(3, 100.0).unwrap();
    let field = sine_field::<2>(3, 1);
    let complex = MorseComplex::from_config(&config, &field).unwrap();
    assert_eq!(complex.single_grid(), config.grid());
}

#[test]
fn test_second_build_rejected_without_changes() {
    let field = sine_field::<2>(3, 1);
    let mut complex = MorseComplex::<2>::new(3, &field).unwrap();
    complex.build_gradient_field().unwrap();
    assert!(complex.is_built());

    let tags = complex.tags().to_vec();
    let gradient = complex.gradient_map().to_vec();
    assert_eq!(complex.build_gradient_field(), Err(MorseError::AlreadyBuilt));
    assert_eq!(complex.tags(), tags.as_slice());
    assert_eq!(complex.gradient_map(), gradient.as_slice());
}

// =========================================================================
// Cell queries
// =========================================================================

#[test]
fn test_rank_counts_odd_coordinates() {
    let field = vec![0.0; 64];
    let complex = MorseComplex::<2>::new(3, &field).unwrap();
    let double = complex.double_grid();
    assert_eq!(complex.rank(double.loc([4, 6])), 0);
    assert_eq!(complex.rank(double.loc([5, 6])), 1);
    assert_eq!(complex.rank(double.loc([4, 15])), 1);
    assert_eq!(complex.rank(double.loc([5, 15])), 2);
}

#[test]
fn test_value_is_upper_star() {
    let config = TestFields::SMALL_2D;
    let field = lcg_noise_field(config.samples(), 3);
    let complex = MorseComplex::<2>::new(config.bits, &field).unwrap();
    let double = complex.double_grid();
    for cell in 0..complex.len() {
        let expected = common::upper_star::<2>(&field, config.extent(), double.to_vector(cell));
        assert_eq!(complex.value(cell), expected, "cell {cell}");
    }
}

#[test]
fn test_vertex_value_is_sample() {
    let field: Vec<f64> = (0..64).map(|i| i as f64).collect();
    let complex = MorseComplex::<2>::new(3, &field).unwrap();
    let single = complex.single_grid();
    for v in single.indices() {
        assert_eq!(complex.value(single.double_vertex(v)), field[v]);
    }
}

#[test]
fn test_value_wraps_across_boundary() {
    // Edge from x = 3 to x = 0 on a 4-point ring sees both ends
    let mut field = vec![0.0; 16];
    field[0] = 5.0;
    let complex = MorseComplex::<2>::new(2, &field).unwrap();
    let edge = complex.double_grid().loc([7, 0]);
    assert_eq!(complex.value(edge), 5.0);
}

// =========================================================================
// Critical-cell output
// =========================================================================

#[test]
fn test_critical_queries_agree() {
    let config = TestFields::SMALL_3D;
    let field = lcg_noise_field(config.samples(), 11);
    let mut complex = MorseComplex::<3>::new(config.bits, &field).unwrap();
    let counts = complex.build_gradient_field().unwrap();

    let mut visited = Vec::new();
    complex.for_each_critical(|coords, rank| visited.push((coords, rank)));

    let cells: Vec<_> = complex.critical_cells().collect();
    assert_eq!(cells.len(), counts.total());
    assert_eq!(visited.len(), cells.len());
    for (cell, (coords, rank)) in cells.iter().zip(&visited) {
        assert_eq!(cell.coords, *coords);
        assert_eq!(cell.rank, *rank);
        assert_eq!(complex.double_grid().loc(cell.coords), cell.index);
        assert_eq!(complex.tag(cell.index), CellTag::Critical);
        assert_eq!(cell.value, complex.value(cell.index));
        assert!(cell.coords.iter().all(|&c| c < 2 * config.extent()));
    }
    assert!(
        cells.windows(2).all(|w| w[0].index < w[1].index),
        "critical cells must come in ascending index order"
    );
}

#[test]
fn test_tag_predicates() {
    assert!(!CellTag::Unpaired.is_resolved());
    assert!(!CellTag::Unpaired.is_paired());
    assert!(CellTag::Source.is_resolved() && CellTag::Source.is_paired());
    assert!(CellTag::Target.is_resolved() && CellTag::Target.is_paired());
    assert!(CellTag::Critical.is_resolved());
    assert!(!CellTag::Critical.is_paired());
    assert_eq!(CellTag::default(), CellTag::Unpaired);

    let field = lcg_noise_field(64, 11);
    let mut complex = MorseComplex::<2>::new(3, &field).unwrap();
    complex.build_gradient_field().unwrap();
    let paired = complex.tags().iter().filter(|t| t.is_paired()).count();
    assert_eq!(paired, 2 * complex.arrows().count());
    assert!(complex.tags().iter().all(|t| t.is_resolved()));
}

#[test]
fn test_critical_kind_by_rank() {
    let field = sine_field::<3>(3, 1);
    let mut complex = MorseComplex::<3>::new(3, &field).unwrap();
    complex.build_gradient_field().unwrap();
    for cell in complex.critical_cells() {
        let expected = match cell.rank {
            0 => CriticalKind::Minimum,
            3 => CriticalKind::Maximum,
            r => CriticalKind::Saddle(r),
        };
        assert_eq!(cell.kind(), expected);
    }
}

#[test]
fn test_counts_helpers() {
    let field = lcg_noise_field(256, 5);
    let mut complex = MorseComplex::<2>::new(4, &field).unwrap();
    let counts = complex.build_gradient_field().unwrap();
    assert_eq!(counts.dimension(), 2);
    assert_eq!(counts.as_slice().len(), 3);
    assert_eq!(counts.minima(), counts.rank(0));
    assert_eq!(counts.maxima(), counts.rank(2));
    assert_eq!(counts.saddles(), counts.rank(1));
    assert_eq!(counts.rank(7), 0);
    assert_eq!(
        counts.euler_characteristic(),
        counts.rank(0) as i64 - counts.rank(1) as i64 + counts.rank(2) as i64
    );
}

// =========================================================================
// Gradient arrows
// =========================================================================

#[test]
fn test_arrows_are_unit_steps() {
    let config = TestFields::SMALL_2D;
    let field = lcg_noise_field(config.samples(), 21);
    let mut complex = MorseComplex::<2>::new(config.bits, &field).unwrap();
    complex.build_gradient_field().unwrap();

    let double = complex.double_grid();
    let sources = complex.tags().iter().filter(|&&t| t == CellTag::Source).count();
    let mut arrows = 0;
    for arrow in complex.arrows() {
        arrows += 1;
        assert_eq!(complex.tag(arrow.source), CellTag::Source);
        assert_eq!(complex.partner(arrow.source), Some(arrow.target));
        assert_eq!(arrow.direction.iter().map(|d| d.abs()).sum::<isize>(), 1);

        let axis = arrow.direction.iter().position(|&d| d != 0).unwrap();
        let step = if arrow.direction[axis] > 0 {
            double.inc(arrow.source, axis)
        } else {
            double.dec(arrow.source, axis)
        };
        assert_eq!(step, arrow.target);
    }
    assert_eq!(arrows, sources);
}

#[test]
fn test_arrow_across_boundary_is_short() {
    // Minimum at x = 0, rising toward x = 7: vertex 7 pairs with the
    // wrapped edge at double x = 15, displacement +1 rather than -15.
    let profile = [0.0, 4.0, 5.0, 6.0, 7.0, 6.5, 5.5, 1.0];
    let field: Vec<f64> = (0..8)
        .flat_map(|y| profile.iter().map(move |&g| g + y as f64 * 0.01))
        .collect();
    let mut complex = MorseComplex::<2>::new(3, &field).unwrap();
    complex.build_gradient_field().unwrap();

    let double = complex.double_grid();
    let vertex = double.loc([14, 0]);
    let arrow = complex
        .arrows()
        .find(|a| a.source == vertex)
        .expect("vertex (7, 0) must be a source");
    assert_eq!(arrow.target, double.loc([15, 0]));
    assert_eq!(arrow.direction, [1, 0]);
}
