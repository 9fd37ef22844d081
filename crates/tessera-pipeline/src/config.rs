//! Configuration resolution: raw caller values into a concrete plan.
//!
//! [`resolve`] validates a [`MosaicConfig`] against the source image
//! dimensions and produces an immutable [`ResolvedConfig`] that the rest
//! of the pipeline consumes. All configuration errors are reported here,
//! before any pixel work begins; nothing downstream re-validates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expand::UpFilter;
use crate::reduce::DownFilter;
use crate::types::{Dimensions, MosaicConfig, PipelineError};

/// Smallest accepted block side length in pixels.
pub const MIN_BLOCK_SIZE: u32 = 1;

/// Largest accepted block side length in pixels.
///
/// Bounds the per-block footprint so a single block never dominates the
/// image and the grid planner always produces a non-trivial tiling.
pub const MAX_BLOCK_SIZE: u32 = 500;

/// Approximate number of blocks along the longer image axis in
/// [`SizingMode::Auto`].
///
/// Automatic sizing targets a fixed block *count*, not a fixed pixel
/// density: a 6000px photo and a 600px thumbnail both come out roughly
/// 64 blocks across, so mosaic density looks the same at any source
/// resolution.
pub const AUTO_TARGET_BLOCKS: u32 = 64;

/// How the block size is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizingMode {
    /// Derive the block size from the image dimensions, targeting
    /// [`AUTO_TARGET_BLOCKS`] blocks along the longer axis.
    #[default]
    Auto,
    /// Use the caller's explicit block size; it is an error not to
    /// provide one.
    Manual,
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Manual => f.write_str("Manual"),
        }
    }
}

/// A validated, immutable processing plan.
///
/// Constructed only by [`resolve`]; the invariant `block_size` ∈
/// [`MIN_BLOCK_SIZE`, [`MAX_BLOCK_SIZE`]] holds for every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    block_size: u32,
    down_filter: DownFilter,
    up_filter: UpFilter,
    dpi: u32,
}

impl ResolvedConfig {
    /// Side length of a full (non-edge) block in pixels.
    #[must_use]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Reduction kernel for collapsing a block into one color.
    #[must_use]
    pub const fn down_filter(&self) -> DownFilter {
        self.down_filter
    }

    /// Expansion kernel for writing that color back out.
    #[must_use]
    pub const fn up_filter(&self) -> UpFilter {
        self.up_filter
    }

    /// Output print density in dots per inch.
    #[must_use]
    pub const fn dpi(&self) -> u32 {
        self.dpi
    }
}

/// Resolve a raw configuration against the source image dimensions.
///
/// Pure function of its inputs: no side effects, no defaults invented
/// beyond what [`MosaicConfig`] itself carries.
///
/// # Block size resolution
///
/// - An explicit `block` value is honored in either mode, after range
///   validation.
/// - [`SizingMode::Auto`] without an explicit value computes
///   `ceil(longer_side / AUTO_TARGET_BLOCKS)` and clamps it into range.
/// - [`SizingMode::Manual`] without an explicit value is an error.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the image has a zero
/// dimension, `dpi` is zero, an explicit block size falls outside
/// [`MIN_BLOCK_SIZE`]..=[`MAX_BLOCK_SIZE`], or `Manual` mode is missing
/// an explicit size.
pub fn resolve(
    config: &MosaicConfig,
    dimensions: Dimensions,
) -> Result<ResolvedConfig, PipelineError> {
    if dimensions.width == 0 || dimensions.height == 0 {
        return Err(PipelineError::InvalidConfig(format!(
            "image has a zero dimension ({}x{})",
            dimensions.width, dimensions.height,
        )));
    }

    if config.dpi == 0 {
        return Err(PipelineError::InvalidConfig(
            "dpi must be a positive integer".to_string(),
        ));
    }

    let block_size = match (config.block, config.mode) {
        (Some(block), _) => {
            if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block) {
                return Err(PipelineError::InvalidConfig(format!(
                    "block size {block} is outside [{MIN_BLOCK_SIZE}, {MAX_BLOCK_SIZE}]",
                )));
            }
            block
        }
        (None, SizingMode::Manual) => {
            return Err(PipelineError::InvalidConfig(
                "manual sizing requires an explicit block size".to_string(),
            ));
        }
        (None, SizingMode::Auto) => dimensions
            .longer_side()
            .div_ceil(AUTO_TARGET_BLOCKS)
            .clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE),
    };

    Ok(ResolvedConfig {
        block_size,
        down_filter: config.down_filter,
        up_filter: config.up_filter,
        dpi: config.dpi,
    })
}
