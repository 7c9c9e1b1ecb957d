use core::f64::consts::TAU;

use crate::grid::PackedGridIndex;

/// Size of a test field: bits per axis and number of axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    /// Bits per axis (side `2^bits`)
    pub bits: u32,
    /// Number of axes
    pub dimension: usize,
}

impl FieldConfig {
    /// Grid side length `N`.
    pub const fn extent(&self) -> usize {
        1 << self.bits
    }

    /// Number of scalar samples, `N^R`.
    pub const fn samples(&self) -> usize {
        1 << (self.bits as usize * self.dimension)
    }

    /// Number of cells in the double-resolution complex, `(2N)^R`.
    pub const fn cells(&self) -> usize {
        1 << ((self.bits as usize + 1) * self.dimension)
    }
}

/// Predefined field sizes for tests and benchmarks
pub struct TestFields;

impl TestFields {
    /// 2x2 torus: the smallest valid grid
    pub const TINY_2D: FieldConfig = FieldConfig {
        bits: 1,
        dimension: 2,
    };

    /// 8x8 torus
    pub const SMALL_2D: FieldConfig = FieldConfig {
        bits: 3,
        dimension: 2,
    };

    /// 64x64 torus
    pub const MEDIUM_2D: FieldConfig = FieldConfig {
        bits: 6,
        dimension: 2,
    };

    /// 8x8x8 torus
    pub const SMALL_3D: FieldConfig = FieldConfig {
        bits: 3,
        dimension: 3,
    };

    /// Returns all predefined configurations.
    pub const fn all() -> [FieldConfig; 4] {
        [Self::TINY_2D, Self::SMALL_2D, Self::MEDIUM_2D, Self::SMALL_3D]
    }
}

/// `sum_k sin(2π · periods · x_k / N)` on a `2^bits` torus.
///
/// Each period along each axis holds one minimum and one maximum of the
/// one-dimensional sine, so the field has `periods^R` minima and maxima.
#[must_use]
pub fn sine_field<const R: usize>(bits: u32, periods: usize) -> Vec<f64> {
    periodic_field::<R>(bits, periods, |phases| phases.iter().map(|p| p.sin()).sum())
}

/// `prod_k cos(2π · periods · x_k / N)` on a `2^bits` torus.
#[must_use]
pub fn cosine_product_field<const R: usize>(bits: u32, periods: usize) -> Vec<f64> {
    periodic_field::<R>(bits, periods, |phases| {
        phases.iter().map(|p| p.cos()).product()
    })
}

fn periodic_field<const R: usize>(
    bits: u32,
    periods: usize,
    f: impl Fn(&[f64; R]) -> f64,
) -> Vec<f64> {
    let grid = PackedGridIndex::<R>::new(bits);
    let n = grid.extent() as f64;
    let k = TAU * periods as f64 / n;
    grid.indices()
        .map(|i| f(&grid.to_vector(i).map(|x| k * x as f64)))
        .collect()
}

/// Uniform `[0, 1)` white noise from a 64-bit LCG.
///
/// Reproducible across platforms for a given seed; adjacent samples are
/// distinct with overwhelming probability, so the field is generic.
#[must_use]
pub fn lcg_noise_field(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}
