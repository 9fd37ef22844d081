//! Block reduction: collapsing a block's pixels into one representative
//! color.
//!
//! Reduction is purely functional — it only reads the source buffer, so
//! it is safe to invoke concurrently for any set of blocks. A 1×1 block
//! is the identity under every filter: the representative color is that
//! single pixel, with no averaging error introduced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Block;
use crate::types::{Rgba, RgbaImage};

/// Down-sampling kernel used to collapse a block into one color.
///
/// A closed set resolved once at configuration time; the per-block loop
/// dispatches on the enum, never on filter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownFilter {
    /// Arithmetic mean with equal weight per pixel.
    Box,
    /// Weighted mean with weight falling off linearly from the block
    /// center. Approximates anti-aliased downsampling and reduces
    /// banding on high-frequency content.
    Triangle,
}

impl Default for DownFilter {
    fn default() -> Self {
        Self::Triangle
    }
}

impl fmt::Display for DownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => f.write_str("Box"),
            Self::Triangle => f.write_str("Triangle"),
        }
    }
}

/// Compute the representative color of `block` from the source pixels.
///
/// The block must lie entirely within `source`; the grid planner
/// guarantees this for every block it produces.
#[must_use]
pub fn reduce(source: &RgbaImage, block: &Block, filter: DownFilter) -> Rgba<u8> {
    match filter {
        DownFilter::Box => box_average(source, block),
        DownFilter::Triangle => triangle_average(source, block),
    }
}

/// Equal-weight per-channel mean over the block footprint.
///
/// Integer accumulation with truncating division, so results are exact
/// for uniform input.
#[allow(clippy::cast_possible_truncation)]
fn box_average(source: &RgbaImage, block: &Block) -> Rgba<u8> {
    let mut sums = [0u64; 4];
    for y in block.y..block.y + block.height {
        for x in block.x..block.x + block.width {
            let pixel = source.get_pixel(x, y);
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(channel);
            }
        }
    }

    let count = u64::from(block.width) * u64::from(block.height);
    // Channel sums are bounded by 255 * count, so the quotient fits u8.
    Rgba(sums.map(|sum| (sum / count) as u8))
}

/// Tent-kernel weighted mean: weight decreases linearly with distance
/// from the block center along each axis.
///
/// The half-extent `(side + 1) / 2` keeps every weight strictly
/// positive, so edge pixels still contribute and a 1×1 block reduces to
/// exactly its own pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn triangle_average(source: &RgbaImage, block: &Block) -> Rgba<u8> {
    let center_x = (f64::from(block.width) - 1.0) / 2.0;
    let center_y = (f64::from(block.height) - 1.0) / 2.0;
    let half_x = f64::from(block.width + 1) / 2.0;
    let half_y = f64::from(block.height + 1) / 2.0;

    let mut sums = [0.0f64; 4];
    let mut total_weight = 0.0f64;
    for y in 0..block.height {
        let weight_y = 1.0 - (f64::from(y) - center_y).abs() / half_y;
        for x in 0..block.width {
            let weight_x = 1.0 - (f64::from(x) - center_x).abs() / half_x;
            let weight = weight_x * weight_y;

            let pixel = source.get_pixel(block.x + x, block.y + y);
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += weight * f64::from(channel);
            }
            total_weight += weight;
        }
    }

    // Weighted means stay within [0, 255] by construction.
    Rgba(sums.map(|sum| (sum / total_weight).round() as u8))
}
