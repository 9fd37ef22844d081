//! Block expansion: writing a representative color back across a
//! block's pixel footprint.
//!
//! The expander writes exactly the destination pixels inside its block's
//! rectangle and never outside it. That containment is what makes the
//! parallel dispatch safe: workers holding disjoint row bands can expand
//! their blocks without any synchronization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Block;
use crate::types::Rgba;

/// Bytes per RGBA8 pixel in the flat destination buffer.
pub const BYTES_PER_PIXEL: usize = 4;

/// Up-sampling kernel used to expand a block color across its footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpFilter {
    /// Every destination pixel in the footprint is set to the block
    /// color — the hard-edged mosaic look.
    Nearest,
    /// Accepted for configuration compatibility, but boundary blending
    /// between adjacent blocks is not implemented: expansion behaves
    /// identically to [`UpFilter::Nearest`].
    Triangle,
}

impl Default for UpFilter {
    fn default() -> Self {
        Self::Nearest
    }
}

impl fmt::Display for UpFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
        }
    }
}

/// Write `color` across the block footprint inside `rows`.
///
/// `rows` must hold exactly the block's rows of the destination buffer:
/// the slice starts at image row `block.y` and spans
/// `block.height * stride` bytes, where `stride` is the full image row
/// length in bytes. Columns outside `[block.x, block.x + block.width)`
/// are left untouched.
pub fn expand(rows: &mut [u8], stride: usize, block: &Block, color: Rgba<u8>, filter: UpFilter) {
    match filter {
        UpFilter::Nearest | UpFilter::Triangle => fill_footprint(rows, stride, block, color),
    }
}

fn fill_footprint(rows: &mut [u8], stride: usize, block: &Block, color: Rgba<u8>) {
    let left = block.x as usize * BYTES_PER_PIXEL;
    let right = left + block.width as usize * BYTES_PER_PIXEL;

    for row in rows.chunks_exact_mut(stride).take(block.height as usize) {
        for pixel in row[left..right].chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&color.0);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SENTINEL: u8 = 0xAB;

    fn block(x: u32, y: u32, width: u32, height: u32) -> Block {
        Block {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn default_filter_is_nearest() {
        assert_eq!(UpFilter::default(), UpFilter::Nearest);
    }

    #[test]
    fn filter_display() {
        assert_eq!(UpFilter::Nearest.to_string(), "Nearest");
        assert_eq!(UpFilter::Triangle.to_string(), "Triangle");
    }

    #[test]
    fn filter_serde_round_trip() {
        for filter in [UpFilter::Nearest, UpFilter::Triangle] {
            let json = serde_json::to_string(&filter).unwrap();
            let deserialized: UpFilter = serde_json::from_str(&json).unwrap();
            assert_eq!(filter, deserialized);
        }
    }

    #[test]
    fn fills_exactly_the_footprint() {
        // 4-pixel-wide image, band of 2 rows, block covering columns 1-2.
        let stride = 4 * BYTES_PER_PIXEL;
        let mut rows = vec![SENTINEL; 2 * stride];
        let b = block(1, 0, 2, 2);

        expand(
            &mut rows,
            stride,
            &b,
            Rgba([1, 2, 3, 4]),
            UpFilter::Nearest,
        );

        for y in 0..2 {
            for x in 0..4 {
                let offset = y * stride + x * BYTES_PER_PIXEL;
                let pixel = &rows[offset..offset + BYTES_PER_PIXEL];
                if (1..3).contains(&x) {
                    assert_eq!(pixel, &[1, 2, 3, 4], "pixel ({x}, {y}) not filled");
                } else {
                    assert_eq!(
                        pixel,
                        &[SENTINEL; BYTES_PER_PIXEL],
                        "pixel ({x}, {y}) outside the block was written",
                    );
                }
            }
        }
    }

    #[test]
    fn leaves_rows_beyond_block_height_untouched() {
        // Slice holds 3 rows but the block is only 1 row tall.
        let stride = 2 * BYTES_PER_PIXEL;
        let mut rows = vec![SENTINEL; 3 * stride];
        let b = block(0, 0, 2, 1);

        expand(
            &mut rows,
            stride,
            &b,
            Rgba([9, 9, 9, 9]),
            UpFilter::Nearest,
        );

        assert!(rows[..stride].iter().all(|&byte| byte == 9));
        assert!(rows[stride..].iter().all(|&byte| byte == SENTINEL));
    }

    #[test]
    fn triangle_falls_back_to_nearest() {
        let stride = 3 * BYTES_PER_PIXEL;
        let mut nearest_rows = vec![SENTINEL; 2 * stride];
        let mut triangle_rows = vec![SENTINEL; 2 * stride];
        let b = block(0, 0, 3, 2);
        let color = Rgba([10, 20, 30, 255]);

        expand(&mut nearest_rows, stride, &b, color, UpFilter::Nearest);
        expand(&mut triangle_rows, stride, &b, color, UpFilter::Triangle);

        assert_eq!(nearest_rows, triangle_rows);
    }
}
