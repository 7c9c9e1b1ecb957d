//! # Tutorial: Critical Cells of a Field on a Torus
//!
//! This example walks through gradient construction on a small **8×8
//! periodic grid**, from packed addressing to the final list of critical
//! cells.
//!
//! ## The Double-Resolution Grid
//!
//! Every vertex, edge and square of the 8×8 grid becomes one point of a
//! 16×16 grid:
//! - **even, even** coordinates: a vertex (rank 0)
//! - **one odd** coordinate: an edge along that axis (rank 1)
//! - **odd, odd** coordinates: a square (rank 2)
//!
//! ## Running This Example
//!
//! ```bash
//! cargo run --example tutorial_torus
//! ```

use dmt_core::testing_fields::sine_field;
use dmt_core::{BoxConfig, CellTag, MorseComplex, MorseError, PackedGridIndex};

// =============================================================================
// CONFIGURATION
// =============================================================================

const BITS: u32 = 3;
const N: usize = 1 << BITS;
const BOX_SIZE: f64 = 100.0;

// =============================================================================
// VISUALIZATION
// =============================================================================

/// Prints the scalar field, one row per y.
fn print_field(field: &[f64]) {
    println!("    Scalar field sin(2πx/8) + sin(2πy/8):");
    println!();
    for y in (0..N).rev() {
        print!("    y={} ", y);
        for x in 0..N {
            print!("{:6.2}", field[y * N + x]);
        }
        println!();
    }
    println!();
}

/// Prints the cell tags of the double grid: `o` critical, `>` source,
/// `<` target, `?` unresolved.
fn print_tags(complex: &MorseComplex<'_, 2>) {
    let double = complex.double_grid();
    println!("    Cell tags on the 16x16 double grid (o = critical, > source, < target):");
    println!();
    for y in (0..2 * N).rev() {
        print!("    ");
        for x in 0..2 * N {
            let symbol = match complex.tag(double.loc([x, y])) {
                CellTag::Critical => 'o',
                CellTag::Source => '>',
                CellTag::Target => '<',
                CellTag::Unpaired => '?',
            };
            print!("{} ", symbol);
        }
        println!();
    }
    println!();
}

// =============================================================================
// MAIN DEMONSTRATION
// =============================================================================

fn main() -> Result<(), MorseError> {
    println!("
╔═══════════════════════════════════════════════════════════════════════════╗
║            DISCRETE MORSE TUTORIAL: Critical Cells on a Torus             ║
╚═══════════════════════════════════════════════════════════════════════════╝
");

    // =========================================================================
    // STEP 1: Packed Addressing
    // =========================================================================
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!("  STEP 1: PACKED PERIODIC ADDRESSING");
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!();

    let grid = PackedGridIndex::<2>::new(BITS);
    let corner = grid.loc([7, 7]);
    let wrapped = grid.add(corner, grid.loc([1, 1]));
    println!("    (7,7) is index {}; adding (1,1) wraps to {:?}", corner, grid.to_vector(wrapped));
    println!("    Axis masks: x = {:#08b}, y = {:#08b}", grid.mask(0), grid.mask(1));
    println!();

    // =========================================================================
    // STEP 2: Build the Gradient
    // =========================================================================
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!("  STEP 2: GRADIENT CONSTRUCTION");
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!();

    let field = sine_field::<2>(BITS, 1);
    print_field(&field);

    let mut complex = MorseComplex::<2>::new(BITS, &field)?;
    let counts = complex.build_gradient_field()?;
    print_tags(&complex);

    println!("    Critical cells: {}", counts);
    println!("    Euler characteristic of the torus: {}", counts.euler_characteristic());
    println!();

    // =========================================================================
    // STEP 3: Critical Cells in Physical Units
    // =========================================================================
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!("  STEP 3: CRITICAL CELLS");
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!();

    let config = BoxConfig::<2>::new(BITS, BOX_SIZE)?;
    for cell in complex.critical_cells() {
        let [px, py] = config.cell_position(cell.coords);
        println!(
            "    {:>10} at ({:2},{:2})  value {:6.3}  position ({:6.2}, {:6.2})",
            cell.kind().to_string(),
            cell.coords[0],
            cell.coords[1],
            cell.value,
            px,
            py
        );
    }
    println!();

    Ok(())
}
