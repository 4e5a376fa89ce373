//! Per-block matmul kernels.
//!
//! Each function executes every thread of one block of the launch grid.
//! A block writes only into `band`, the slice of C holding the block's
//! grid row (`block.y` rows starting at `block_idx.y * block.y`, fewer at
//! the bottom edge). Both kernels reduce `k` in ascending order into a
//! single running sum with plain multiply and add, so they produce
//! identical bits.

use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::TensorError;
use crate::launch::{Dim2, LaunchConfig, BLOCK_SIZE};

/// Which block kernel a backend runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelVariant {
    /// Every thread reads its full row of A and column of B.
    #[default]
    Naive,
    /// Threads of a block share staged tiles of A and B.
    Tiled,
}

impl KernelVariant {
    pub fn run_block<T: Element>(
        &self,
        a: &[T],
        b: &[T],
        band: &mut [T],
        config: &LaunchConfig,
        block_idx: Dim2,
    ) {
        match self {
            KernelVariant::Naive => naive_block(a, b, band, config, block_idx),
            KernelVariant::Tiled => tiled_block(a, b, band, config, block_idx),
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelVariant::Naive => write!(f, "naive"),
            KernelVariant::Tiled => write!(f, "tiled"),
        }
    }
}

impl FromStr for KernelVariant {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(KernelVariant::Naive),
            "tiled" => Ok(KernelVariant::Tiled),
            other => Err(TensorError::Config(format!(
                "unknown kernel variant '{other}', expected 'naive' or 'tiled'"
            ))),
        }
    }
}

/// One thread per output element, dot product straight from A and B.
pub fn naive_block<T: Element>(
    a: &[T],
    b: &[T],
    band: &mut [T],
    config: &LaunchConfig,
    block_idx: Dim2,
) {
    let n = config.n();
    let row0 = block_idx.y * config.block().y;

    for ty in 0..config.block().y {
        for tx in 0..config.block().x {
            let (row, col) = config.unit_coords(block_idx, Dim2::new(tx, ty));
            if !config.in_bounds(row, col) {
                continue;
            }
            let mut sum = T::zero();
            for k in 0..n {
                sum = sum + a[row * n + k] * b[k * n + col];
            }
            band[(row - row0) * n + col] = sum;
        }
    }
}

/// Shared-tile variant: the reduction walks `k` one tile at a time, with
/// the current tiles of A and B staged in block-local buffers.
///
/// Only the valid part of the last tile is reduced; padding is never
/// multiplied in, which keeps `-0.0`, infinities and NaN identical to the
/// naive kernel.
pub fn tiled_block<T: Element>(
    a: &[T],
    b: &[T],
    band: &mut [T],
    config: &LaunchConfig,
    block_idx: Dim2,
) {
    let n = config.n();
    let row0 = block_idx.y * BLOCK_SIZE;

    let mut tile_a = [T::zero(); BLOCK_SIZE * BLOCK_SIZE];
    let mut tile_b = [T::zero(); BLOCK_SIZE * BLOCK_SIZE];
    let mut acc = [T::zero(); BLOCK_SIZE * BLOCK_SIZE];

    let num_tiles = n.div_ceil(BLOCK_SIZE);
    for t in 0..num_tiles {
        let k0 = t * BLOCK_SIZE;
        let width = BLOCK_SIZE.min(n - k0);

        // Each thread stages one element of each tile.
        for ty in 0..BLOCK_SIZE {
            for tx in 0..BLOCK_SIZE {
                let (row, col) = config.unit_coords(block_idx, Dim2::new(tx, ty));
                let slot = ty * BLOCK_SIZE + tx;
                tile_a[slot] = if row < n && k0 + tx < n {
                    a[row * n + k0 + tx]
                } else {
                    T::zero()
                };
                tile_b[slot] = if k0 + ty < n && col < n {
                    b[(k0 + ty) * n + col]
                } else {
                    T::zero()
                };
            }
        }

        for ty in 0..BLOCK_SIZE {
            for tx in 0..BLOCK_SIZE {
                let slot = ty * BLOCK_SIZE + tx;
                let mut sum = acc[slot];
                for kk in 0..width {
                    sum = sum + tile_a[ty * BLOCK_SIZE + kk] * tile_b[kk * BLOCK_SIZE + tx];
                }
                acc[slot] = sum;
            }
        }
    }

    for ty in 0..BLOCK_SIZE {
        for tx in 0..BLOCK_SIZE {
            let (row, col) = config.unit_coords(block_idx, Dim2::new(tx, ty));
            if config.in_bounds(row, col) {
                band[(row - row0) * n + col] = acc[ty * BLOCK_SIZE + tx];
            }
        }
    }
}
