//! tessera-pipeline: Pure block-mosaic pixelation pipeline (sans-IO).
//!
//! Partitions a raster image into a grid of rectangular blocks, reduces
//! each block to a single representative color, and expands that color
//! back across the block footprint — producing a mosaic of the same
//! pixel dimensions that compresses far better under lossless encoding,
//! because large runs of pixels become identical.
//!
//! This crate has **no I/O dependencies** — it operates on in-memory
//! byte slices and pixel buffers and returns structured data. File and
//! terminal interaction live in the `tessera` CLI; PNG serialization
//! lives in `tessera-export`.
//!
//! # Pipeline steps
//!
//! 1. Decode image bytes and apply EXIF orientation ([`decode`])
//! 2. Resolve the configuration into a concrete plan ([`config`])
//! 3. Tile the image into blocks ([`grid`])
//! 4. Reduce-then-expand every block in parallel ([`parallel`],
//!    [`reduce`], [`expand`])
//!
//! The result is deterministic: identical `(source, config)` inputs
//! produce byte-identical output buffers regardless of worker count.

pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod expand;
pub mod grid;
pub mod parallel;
pub mod reduce;
pub mod types;

pub use config::{
    AUTO_TARGET_BLOCKS, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE, ResolvedConfig, SizingMode, resolve,
};
pub use decode::decode;
pub use diagnostics::{MosaicDiagnostics, RunSummary};
pub use expand::UpFilter;
pub use grid::Block;
pub use reduce::DownFilter;
pub use types::{Dimensions, MosaicConfig, PipelineError, ProcessResult, Rgba, RgbaImage};

/// Run the full mosaic pipeline on a decoded image.
///
/// Resolves `config` against the source dimensions, plans the block
/// grid, and dispatches reduce-then-expand across the worker pool.
/// The output buffer always has the source's dimensions.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the configuration cannot
/// be resolved (block size out of range, `Manual` mode without a size,
/// zero dpi, zero-dimension image).
/// Returns [`PipelineError::Processing`] if the worker pool fails.
pub fn process(source: &RgbaImage, config: &MosaicConfig) -> Result<ProcessResult, PipelineError> {
    let dimensions = Dimensions::of(source);
    let resolved = config::resolve(config, dimensions)?;
    let blocks = grid::plan(dimensions, resolved.block_size());

    log::debug!(
        "mosaic {}x{} with {}px blocks ({} total)",
        dimensions.width,
        dimensions.height,
        resolved.block_size(),
        blocks.len(),
    );

    let image = parallel::mosaic(source, &blocks, &resolved)?;
    Ok(ProcessResult { image, dimensions })
}

/// Decode raw image bytes and run the full mosaic pipeline.
///
/// Convenience entry point for shells that hold undecoded file contents.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty,
/// [`PipelineError::ImageDecode`] if the image cannot be decoded, plus
/// everything [`process`] can return.
pub fn process_bytes(bytes: &[u8], config: &MosaicConfig) -> Result<ProcessResult, PipelineError> {
    let source = decode::decode(bytes)?;
    process(&source, config)
}

/// Run the pipeline and collect per-stage timing diagnostics.
///
/// Behaves exactly like [`process`]; the second element of the returned
/// pair carries wall-clock durations and grid metrics for the run.
///
/// # Errors
///
/// Same as [`process`].
pub fn process_with_diagnostics(
    source: &RgbaImage,
    config: &MosaicConfig,
) -> Result<(ProcessResult, MosaicDiagnostics), PipelineError> {
    use std::time::Instant;

    let dimensions = Dimensions::of(source);
    let start = Instant::now();

    let resolved = config::resolve(config, dimensions)?;
    let resolve_duration = start.elapsed();

    let plan_start = Instant::now();
    let blocks = grid::plan(dimensions, resolved.block_size());
    let plan_duration = plan_start.elapsed();

    let mosaic_start = Instant::now();
    let image = parallel::mosaic(source, &blocks, &resolved)?;
    let mosaic_duration = mosaic_start.elapsed();

    let (blocks_x, blocks_y) = grid::grid_size(dimensions, resolved.block_size());
    let diagnostics = MosaicDiagnostics {
        resolve: resolve_duration,
        plan: plan_duration,
        mosaic: mosaic_duration,
        total: start.elapsed(),
        summary: RunSummary {
            dimensions,
            block_size: resolved.block_size(),
            blocks_x,
            blocks_y,
            block_count: blocks.len(),
            workers: std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
        },
    };

    Ok((ProcessResult { image, dimensions }, diagnostics))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    fn manual_config(block: u32) -> MosaicConfig {
        MosaicConfig {
            block: Some(block),
            mode: SizingMode::Manual,
            down_filter: DownFilter::Box,
            up_filter: UpFilter::Nearest,
            ..MosaicConfig::default()
        }
    }

    #[test]
    fn solid_red_is_invariant_under_averaging() {
        // 100x100 solid red, block 25: 16 blocks, every pixel still red.
        let red = Rgba([255, 0, 0, 255]);
        let source = solid_image(100, 100, red);
        let result = process(&source, &manual_config(25)).unwrap();

        assert_eq!(
            result.dimensions,
            Dimensions {
                width: 100,
                height: 100
            },
        );
        assert_eq!(
            grid::plan(result.dimensions, 25).len(),
            16,
        );
        assert!(result.image.pixels().all(|pixel| *pixel == red));
    }

    #[test]
    fn block_size_one_is_a_no_op() {
        let source = RgbaImage::from_fn(9, 7, |x, y| {
            Rgba([(x * 11 % 256) as u8, (y * 29 % 256) as u8, 77, 255])
        });
        let result = process(&source, &manual_config(1)).unwrap();
        assert_eq!(result.image.as_raw(), source.as_raw());
    }

    #[test]
    fn output_dimensions_equal_input_dimensions() {
        let source = solid_image(123, 45, Rgba([9, 9, 9, 255]));
        let result = process(&source, &manual_config(7)).unwrap();
        assert_eq!(result.image.dimensions(), (123, 45));
    }

    #[test]
    fn process_is_deterministic() {
        let source = RgbaImage::from_fn(50, 40, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
        });
        let config = manual_config(6);
        let first = process(&source, &config).unwrap();
        let second = process(&source, &config).unwrap();
        assert_eq!(first.image.as_raw(), second.image.as_raw());
    }

    #[test]
    fn invalid_config_propagates() {
        let source = solid_image(10, 10, Rgba([0, 0, 0, 255]));
        let config = MosaicConfig {
            block: None,
            mode: SizingMode::Manual,
            ..MosaicConfig::default()
        };
        assert!(matches!(
            process(&source, &config),
            Err(PipelineError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn process_bytes_decodes_then_processes() {
        let source = solid_image(20, 20, Rgba([0, 128, 255, 255]));
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
        image::ImageEncoder::write_image(
            encoder,
            source.as_raw(),
            source.width(),
            source.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();

        let from_bytes = process_bytes(&bytes, &manual_config(5)).unwrap();
        let from_buffer = process(&source, &manual_config(5)).unwrap();
        assert_eq!(from_bytes.image.as_raw(), from_buffer.image.as_raw());
    }

    #[test]
    fn process_bytes_empty_input() {
        let result = process_bytes(&[], &MosaicConfig::default());
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn diagnostics_report_the_grid() {
        let source = solid_image(100, 60, Rgba([1, 2, 3, 255]));
        let (result, diagnostics) =
            process_with_diagnostics(&source, &manual_config(25)).unwrap();

        assert_eq!(result.image.dimensions(), (100, 60));
        assert_eq!(diagnostics.summary.block_size, 25);
        assert_eq!(diagnostics.summary.blocks_x, 4);
        assert_eq!(diagnostics.summary.blocks_y, 3);
        assert_eq!(diagnostics.summary.block_count, 12);
        assert!(diagnostics.summary.workers >= 1);
        assert!(diagnostics.total >= diagnostics.mosaic);
    }

    #[test]
    fn auto_mode_processes_without_explicit_block() {
        let source = solid_image(256, 128, Rgba([40, 50, 60, 255]));
        let result = process(&source, &MosaicConfig::default()).unwrap();
        assert_eq!(result.image.dimensions(), (256, 128));
        // ceil(256 / 64) = 4px blocks; uniform input stays uniform.
        assert!(
            result
                .image
                .pixels()
                .all(|pixel| *pixel == Rgba([40, 50, 60, 255])),
        );
    }
}
