//! Critical-cell and gradient-arrow writers.
//!
//! All writers take the built complex and an `io::Write`; data goes to
//! stdout, logs go to stderr.

use std::io::{self, Write};

use dmt_core::{BoxConfig, CriticalCounts, CriticalKind, MorseComplex};

const AXES: [&str; 3] = ["x", "y", "z"];

fn axis_name(axis: usize) -> String {
    match AXES.get(axis) {
        Some(name) => (*name).to_string(),
        None => format!("x{axis}"),
    }
}

fn join<T: ToString>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// One line per critical cell: double-grid coordinates, then rank.
pub fn write_text<W: Write, const R: usize>(
    out: &mut W,
    complex: &MorseComplex<'_, R>,
) -> io::Result<()> {
    for cell in complex.critical_cells() {
        writeln!(out, "{} {}", join(&cell.coords, " "), cell.rank)?;
    }
    Ok(())
}

/// CSV header: `index,x,y[,z],rank,kind,value[,px,py[,pz]]`.
pub fn csv_header(dimension: usize, physical: bool) -> String {
    let mut columns = vec!["index".to_string()];
    columns.extend((0..dimension).map(axis_name));
    columns.extend(["rank", "kind", "value"].map(String::from));
    if physical {
        columns.extend((0..dimension).map(|k| format!("p{}", axis_name(k))));
    }
    columns.join(",")
}

/// CSV rows for every critical cell, with physical positions if a box
/// configuration is given.
pub fn write_csv<W: Write, const R: usize>(
    out: &mut W,
    complex: &MorseComplex<'_, R>,
    config: Option<&BoxConfig<R>>,
) -> io::Result<()> {
    writeln!(out, "{}", csv_header(R, config.is_some()))?;
    for cell in complex.critical_cells() {
        write!(
            out,
            "{},{},{},{},{}",
            cell.index,
            join(&cell.coords, ","),
            cell.rank,
            cell.kind(),
            cell.value
        )?;
        if let Some(config) = config {
            write!(out, ",{}", join(&config.cell_position(cell.coords), ","))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One line per gradient arrow: source coordinates, then the unit step.
pub fn write_arrows<W: Write, const R: usize>(
    out: &mut W,
    complex: &MorseComplex<'_, R>,
) -> io::Result<()> {
    let double = complex.double_grid();
    for arrow in complex.arrows() {
        writeln!(
            out,
            "{} {}",
            join(&double.to_vector(arrow.source), " "),
            join(&arrow.direction, " ")
        )?;
    }
    Ok(())
}

/// Per-rank critical counts as a small CSV table.
pub fn write_summary<W: Write>(out: &mut W, counts: &CriticalCounts) -> io::Result<()> {
    writeln!(out, "rank,kind,count")?;
    for (rank, n) in counts.as_slice().iter().enumerate() {
        let kind = CriticalKind::from_rank(rank as u32, counts.dimension());
        writeln!(out, "{},{},{}", rank, kind, n)?;
    }
    Ok(())
}
