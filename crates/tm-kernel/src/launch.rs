//! Launch geometry for the square matmul kernel.
//!
//! The output is covered by a grid of fixed-size blocks. Every thread of a
//! block maps to one output coordinate; threads past the matrix edge are
//! idle.

use crate::error::{Result, TensorError};

/// Side length of a thread block.
pub const BLOCK_SIZE: usize = 16;

/// A two-dimensional extent or index. `x` runs along columns, `y` along rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim2 {
    pub x: usize,
    pub y: usize,
}

impl Dim2 {
    pub const fn new(x: usize, y: usize) -> Self {
        Dim2 { x, y }
    }

    pub fn count(&self) -> usize {
        self.x * self.y
    }
}

/// Block and grid shape for one square launch.
///
/// Only `for_square` builds one, so a config always covers every output
/// element of its `n x n` matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    n: usize,
    block: Dim2,
    grid: Dim2,
}

impl LaunchConfig {
    /// Geometry for an `n x n` output: 16x16 blocks, `ceil(n / 16)` blocks
    /// per side.
    pub fn for_square(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(TensorError::ShapeMismatch {
                a: vec![0, 0],
                b: vec![0, 0],
            });
        }
        if n.checked_mul(n).is_none() {
            return Err(TensorError::KernelLaunchError(format!(
                "output of {n}x{n} elements exceeds the addressable range"
            )));
        }
        let blocks = n.div_ceil(BLOCK_SIZE);
        Ok(LaunchConfig {
            n,
            block: Dim2::new(BLOCK_SIZE, BLOCK_SIZE),
            grid: Dim2::new(blocks, blocks),
        })
    }

    /// Matrix side length.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn block(&self) -> Dim2 {
        self.block
    }

    pub fn grid(&self) -> Dim2 {
        self.grid
    }

    pub fn num_blocks(&self) -> usize {
        self.grid.count()
    }

    /// Total threads launched, including idle ones past the edge.
    pub fn num_units(&self) -> usize {
        self.grid.count() * self.block.count()
    }

    /// Output coordinate `(row, col)` of a thread. May lie outside the
    /// matrix; callers must apply the `row < n && col < n` guard.
    pub fn unit_coords(&self, block_idx: Dim2, thread_idx: Dim2) -> (usize, usize) {
        let row = block_idx.y * self.block.y + thread_idx.y;
        let col = block_idx.x * self.block.x + thread_idx.x;
        (row, col)
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.n && col < self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_sizes() {
        let cases = [(1, 1), (15, 1), (16, 1), (17, 2), (33, 3), (256, 16)];
        for (n, blocks) in cases {
            let cfg = LaunchConfig::for_square(n).unwrap();
            assert_eq!(cfg.grid(), Dim2::new(blocks, blocks), "n={n}");
            assert_eq!(cfg.block(), Dim2::new(16, 16));
        }
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            LaunchConfig::for_square(0),
            Err(TensorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            LaunchConfig::for_square(usize::MAX),
            Err(TensorError::KernelLaunchError(_))
        ));
    }

    #[test]
    fn test_units_cover_output() {
        let cfg = LaunchConfig::for_square(17).unwrap();
        assert_eq!(cfg.num_blocks(), 4);
        assert_eq!(cfg.num_units(), 4 * 256);
        assert!(cfg.num_units() >= 17 * 17);
    }

    #[test]
    fn test_grid_covers_every_element() {
        for n in [1, 15, 16, 17, 32, 33, 100] {
            let cfg = LaunchConfig::for_square(n).unwrap();
            assert!(cfg.grid().y * cfg.block().y >= n, "rows uncovered for n={n}");
            assert!(cfg.grid().x * cfg.block().x >= n, "cols uncovered for n={n}");
            assert!(cfg.grid().y * cfg.block().y < n + BLOCK_SIZE, "extra grid row for n={n}");
        }
    }

    #[test]
    fn test_unit_coords_and_guard() {
        let cfg = LaunchConfig::for_square(17).unwrap();
        let (row, col) = cfg.unit_coords(Dim2::new(1, 0), Dim2::new(0, 3));
        assert_eq!((row, col), (3, 16));
        assert!(cfg.in_bounds(row, col));

        let (row, col) = cfg.unit_coords(Dim2::new(1, 1), Dim2::new(1, 0));
        assert_eq!((row, col), (16, 17));
        assert!(!cfg.in_bounds(row, col));
    }
}
