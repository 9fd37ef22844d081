//! Shared types for the tessera mosaic pipeline.

use serde::{Deserialize, Serialize};

use crate::config::SizingMode;
use crate::expand::UpFilter;
use crate::reduce::DownFilter;

/// Re-export `RgbaImage` so downstream crates can reference the pixel
/// buffer type without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export the RGBA pixel type used for block colors.
pub use image::Rgba;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of a decoded image buffer.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Length of the longer axis in pixels.
    ///
    /// Automatic block sizing is derived from this value so mosaic
    /// density stays consistent across portrait and landscape inputs.
    #[must_use]
    pub const fn longer_side(self) -> u32 {
        if self.width >= self.height {
            self.width
        } else {
            self.height
        }
    }
}

/// Caller-facing configuration for a mosaic run.
///
/// This is the raw record accepted at the engine boundary; it is
/// validated into a [`ResolvedConfig`](crate::config::ResolvedConfig) by
/// [`config::resolve`](crate::config::resolve) before any pixel work
/// begins, and is immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Explicit block side length in pixels.
    ///
    /// Required in [`SizingMode::Manual`]; in [`SizingMode::Auto`] an
    /// explicit value overrides the computed size.
    pub block: Option<u32>,

    /// How the block size is chosen when not given explicitly.
    pub mode: SizingMode,

    /// Kernel used to collapse a block's pixels into one color.
    pub down_filter: DownFilter,

    /// Kernel used to expand that color back across the block footprint.
    pub up_filter: UpFilter,

    /// Physical print density recorded in the output container.
    ///
    /// Affects only the PNG pHYs metadata, never pixel values.
    pub dpi: u32,
}

impl MosaicConfig {
    /// Default output print density in dots per inch.
    pub const DEFAULT_DPI: u32 = 300;
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            block: None,
            mode: SizingMode::default(),
            down_filter: DownFilter::default(),
            up_filter: UpFilter::default(),
            dpi: Self::DEFAULT_DPI,
        }
    }
}

/// Result of a completed mosaic run.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The pixelated output buffer.
    ///
    /// Always the same dimensions as the source: the engine mosaics in
    /// place, it never resizes the canvas.
    pub image: RgbaImage,

    /// Dimensions of the source (and therefore output) image.
    pub dimensions: Dimensions,
}

/// Errors that can occur during mosaic processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The configuration could not be resolved into a valid plan.
    #[error("invalid mosaic configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool failed during block dispatch.
    ///
    /// Fatal for the run; no partial buffer is ever returned.
    #[error("mosaic processing failed: {0}")]
    Processing(String),
}
