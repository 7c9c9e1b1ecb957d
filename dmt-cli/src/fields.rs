//! Scalar field sources: files on disk or synthetic patterns.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use dmt_core::testing_fields::{cosine_product_field, sine_field};
use dmt_core::PackedGridIndex;

/// Encoding of a field file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Whitespace-separated decimal numbers; lines starting with '#' are skipped
    Text,
    /// Raw little-endian f64
    Binary,
}

/// Synthetic field used when no input file is given.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    /// Sum of sines along each axis
    Sine,
    /// Product of cosines along each axis
    Product,
    /// Uniform white noise
    Noise,
}

/// Reads a field file and checks it holds exactly `expected` samples.
pub fn load(path: &Path, format: InputFormat, expected: usize) -> Result<Vec<f64>> {
    let field = match format {
        InputFormat::Text => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_text(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        InputFormat::Binary => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            parse_binary(&bytes).with_context(|| format!("parsing {}", path.display()))?
        }
    };
    if field.len() != expected {
        bail!(
            "{} holds {} samples, the grid needs {}",
            path.display(),
            field.len(),
            expected
        );
    }
    log::debug!("loaded {} samples from {}", field.len(), path.display());
    Ok(field)
}

/// Parses whitespace-separated samples.
pub fn parse_text(text: &str) -> Result<Vec<f64>> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<f64>()
                .with_context(|| format!("sample {i}: {token:?} is not a number"))
        })
        .collect()
}

/// Parses little-endian f64 samples.
pub fn parse_binary(bytes: &[u8]) -> Result<Vec<f64>> {
    if bytes.len() % 8 != 0 {
        bail!("{} bytes is not a whole number of f64 samples", bytes.len());
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect())
}

/// Builds a synthetic field on a `2^bits` grid in `R` dimensions.
pub fn synthesize<const R: usize>(
    pattern: Pattern,
    bits: u32,
    periods: usize,
    seed: u64,
) -> Result<Vec<f64>> {
    let grid = PackedGridIndex::<R>::try_new(bits)?;
    let field = match pattern {
        Pattern::Sine => sine_field::<R>(bits, periods),
        Pattern::Product => cosine_product_field::<R>(bits, periods),
        Pattern::Noise => noise_field(grid.size(), seed),
    };
    log::debug!("synthesised {:?} field with {} samples", pattern, field.len());
    Ok(field)
}

/// Uniform `[0, 1)` noise from a seeded xoshiro generator.
pub fn noise_field(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..len).map(|_| rng.gen::<f64>()).collect()
}
