//! Grid execution on the current rayon pool.
//!
//! The output is split into disjoint row bands, one per grid row. A band
//! task runs every block of its grid row, so no two tasks ever write the
//! same element and no synchronization is needed beyond the final join.

use rayon::prelude::*;

use crate::element::Element;
use crate::kernel::KernelVariant;
use crate::launch::{Dim2, LaunchConfig};

/// Runs the whole launch grid and returns after all blocks have finished.
pub fn execute_grid<T: Element>(
    variant: KernelVariant,
    a: &[T],
    b: &[T],
    c: &mut [T],
    config: &LaunchConfig,
) {
    let band_len = config.block().y * config.n();
    c.par_chunks_mut(band_len)
        .enumerate()
        .for_each(|(block_y, band)| {
            for block_x in 0..config.grid().x {
                variant.run_block(a, b, band, config, Dim2::new(block_x, block_y));
            }
        });
}
