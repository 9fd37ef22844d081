//! Parallel orchestration: scheduling block work across a worker pool.
//!
//! The destination buffer is split into horizontal bands of
//! `block_size` pixel rows, one band per row of blocks. Each worker owns
//! its bands exclusively (`par_chunks_mut` hands out disjoint `&mut`
//! slices), performs reduce-then-expand for every block in the band, and
//! the pool's join barrier ends the run. Ownership of destination
//! regions is statically partitioned, so there are no locks anywhere.
//!
//! Scheduling order across workers is unordered, but the output is
//! deterministic: each block writes a statically assigned region from a
//! pure function of the source, so the final buffer depends only on
//! `(source, blocks, config)`.

use rayon::prelude::*;

use crate::config::ResolvedConfig;
use crate::expand::{self, BYTES_PER_PIXEL};
use crate::grid::{self, Block};
use crate::reduce;
use crate::types::{Dimensions, PipelineError, RgbaImage};

/// Run reduce-then-expand for every block, returning the completed
/// destination buffer.
///
/// `blocks` must be the grid planner's output for this source and block
/// size; the band partition relies on its row-major ordering.
///
/// Callers either get the fully completed buffer or an error — a failed
/// run never exposes a partially written destination.
///
/// # Errors
///
/// Returns [`PipelineError::Processing`] if the worker pool cannot be
/// constructed (resource exhaustion) or if `blocks` does not match the
/// grid implied by the source dimensions and block size.
pub fn mosaic(
    source: &RgbaImage,
    blocks: &[Block],
    config: &ResolvedConfig,
) -> Result<RgbaImage, PipelineError> {
    let dimensions = Dimensions::of(source);
    let (blocks_x, blocks_y) = grid::grid_size(dimensions, config.block_size());
    let blocks_x = blocks_x as usize;

    if blocks.len() != blocks_x * blocks_y as usize {
        return Err(PipelineError::Processing(format!(
            "block list length {} does not match the {}x{} grid",
            blocks.len(),
            blocks_x,
            blocks_y,
        )));
    }

    let stride = dimensions.width as usize * BYTES_PER_PIXEL;
    let band_stride = stride * config.block_size() as usize;
    let mut data = vec![0u8; stride * dimensions.height as usize];

    let pool = rayon::ThreadPoolBuilder::new().build().map_err(|error| {
        PipelineError::Processing(format!("worker pool construction failed: {error}"))
    })?;

    log::debug!(
        "dispatching {} blocks of {}px across {} workers",
        blocks.len(),
        config.block_size(),
        pool.current_num_threads(),
    );

    // One band per block row; the final band is shorter when the image
    // height is not a block-size multiple, matching the clipped blocks.
    pool.install(|| {
        data.par_chunks_mut(band_stride)
            .enumerate()
            .for_each(|(band, rows)| {
                let start = band * blocks_x;
                for block in &blocks[start..start + blocks_x] {
                    let color = reduce::reduce(source, block, config.down_filter());
                    expand::expand(rows, stride, block, color, config.up_filter());
                }
            });
    });

    RgbaImage::from_raw(dimensions.width, dimensions.height, data).ok_or_else(|| {
        PipelineError::Processing("destination buffer does not match image dimensions".to_string())
    })
}
