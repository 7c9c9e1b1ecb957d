//! Critical cells of a periodic scalar field via discrete Morse theory.
//!
//! Loads (or synthesises) a scalar field on a `2^bits` periodic grid, builds
//! the discrete gradient over its cubical complex and prints the critical
//! cells in double-resolution coordinates.
//!
//! # Usage
//!
//! ```bash
//! # Sine test field on a 32x32 torus
//! cargo run --release -p dmt-cli
//!
//! # 3D white noise, CSV with physical positions in a 500 Mpc/h box
//! cargo run --release -p dmt-cli -- --dim 3 --bits 6 --pattern noise --csv --box-size 500
//!
//! # Field from a file of 128^3 little-endian doubles
//! cargo run --release -p dmt-cli -- --dim 3 --bits 7 --input phi.bin --format binary
//! ```

mod fields;
mod output;
mod stats;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use dmt_core::{
    BoxConfig, BuildObserver, CriticalCounts, LogProgress, MorseComplex, NoProgress,
    PackedGridIndex,
};

use crate::fields::{InputFormat, Pattern};
use crate::stats::RunSummary;

#[derive(Parser, Debug)]
#[command(name = "dmt")]
#[command(about = "Discrete Morse critical cells of a periodic scalar field")]
struct Args {
    /// Scalar field file: N^R samples, row-major with x varying fastest
    #[arg(long)]
    input: Option<PathBuf>,

    /// Encoding of the input file
    #[arg(long, value_enum, default_value_t = InputFormat::Text)]
    format: InputFormat,

    /// Synthetic field used when no input file is given
    #[arg(long, value_enum, default_value_t = Pattern::Sine)]
    pattern: Pattern,

    /// Periods per axis of the sine and product patterns
    #[arg(long, default_value_t = 1)]
    periods: usize,

    /// Random seed for the noise pattern
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Grid bit depth (side 2^bits)
    #[arg(long, default_value_t = 5)]
    bits: u32,

    /// Spatial dimension
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    dim: u8,

    /// Physical box size; adds physical positions to CSV output
    #[arg(long)]
    box_size: Option<f64>,

    /// Output critical cells as CSV
    #[arg(long)]
    csv: bool,

    /// Also output gradient arrows after a blank line
    #[arg(long)]
    arrows: bool,

    /// Output only per-rank critical counts
    #[arg(long)]
    summary: bool,

    /// Log progress during gradient construction
    #[arg(long)]
    progress: bool,

    /// Build the gradient this many times and report timing statistics
    #[arg(long, default_value_t = 1)]
    repeat: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.dim {
        2 => run::<2>(&args),
        _ => run::<3>(&args),
    }
}

fn run<const R: usize>(args: &Args) -> Result<()> {
    let samples = PackedGridIndex::<R>::try_new(args.bits)?.size();
    let field = match &args.input {
        Some(path) => fields::load(path, args.format, samples)?,
        None => fields::synthesize::<R>(args.pattern, args.bits, args.periods, args.seed)?,
    };
    let config = args
        .box_size
        .map(|size| BoxConfig::<R>::new(args.bits, size))
        .transpose()
        .context("invalid box size")?;

    let mut times = Vec::with_capacity(args.repeat.max(1));
    for _ in 1..args.repeat {
        let (_, _, elapsed) = build::<R>(args.bits, &field, false)?;
        times.push(elapsed);
    }
    let (complex, counts, elapsed) = build::<R>(args.bits, &field, args.progress)?;
    times.push(elapsed);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.summary {
        output::write_summary(&mut out, &counts)?;
    } else if args.csv {
        output::write_csv(&mut out, &complex, config.as_ref())?;
    } else {
        output::write_text(&mut out, &complex)?;
    }
    if args.arrows {
        writeln!(out)?;
        output::write_arrows(&mut out, &complex)?;
    }
    out.flush()?;

    RunSummary::new(R, args.bits, complex.len(), counts, &times).log();
    Ok(())
}

/// One timed gradient construction on a fresh complex.
fn build<const R: usize>(
    bits: u32,
    field: &[f64],
    progress: bool,
) -> Result<(MorseComplex<'_, R>, CriticalCounts, Duration)> {
    let mut complex = MorseComplex::<R>::new(bits, field).context("invalid scalar field")?;
    let mut observer: Box<dyn BuildObserver> = if progress {
        Box::new(LogProgress::new("gradient", complex.len()))
    } else {
        Box::new(NoProgress)
    };

    let start = Instant::now();
    let counts = complex
        .build_gradient_field_with(observer.as_mut())
        .context("gradient construction failed")?;
    Ok((complex, counts, start.elapsed()))
}
