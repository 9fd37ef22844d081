//! Integration test: run a synthetic gradient through the full mosaic
//! pipeline and export it to a DPI-tagged PNG.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use tessera_pipeline::{DownFilter, MosaicConfig, Rgba, RgbaImage, SizingMode, UpFilter};

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            255,
        ])
    })
}

#[test]
fn gradient_pipeline_to_png_round_trip() {
    let source = gradient(96, 64);
    let config = MosaicConfig {
        block: Some(16),
        mode: SizingMode::Manual,
        down_filter: DownFilter::Box,
        up_filter: UpFilter::Nearest,
        dpi: 150,
    };

    let result = tessera_pipeline::process(&source, &config).expect("pipeline should succeed");
    assert_eq!(result.image.dimensions(), (96, 64));

    let bytes = tessera_export::to_png(&result.image, config.dpi).expect("encode should succeed");

    // The stream must decode back to the exact mosaic buffer.
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (96, 64));
    assert_eq!(decoded.as_raw(), result.image.as_raw());

    // Every 16x16 block footprint is a single flat color.
    for block_y in 0..4 {
        for block_x in 0..6 {
            let anchor = *decoded.get_pixel(block_x * 16, block_y * 16);
            for y in 0..16 {
                for x in 0..16 {
                    assert_eq!(
                        *decoded.get_pixel(block_x * 16 + x, block_y * 16 + y),
                        anchor,
                        "block ({block_x}, {block_y}) is not uniform",
                    );
                }
            }
        }
    }

    // The pHYs chunk must round-trip the requested density.
    let decoder = png::Decoder::new(bytes.as_slice());
    let reader = decoder.read_info().unwrap();
    let dims = reader.info().pixel_dims.expect("pHYs chunk must be present");
    assert_eq!(dims.unit, png::Unit::Meter);
    assert_eq!(tessera_export::dots_per_inch(dims.xppu), 150);
}

#[test]
fn mosaic_compresses_better_than_the_source() {
    // Pixelation exists to shrink lossless encodes: long identical runs
    // must beat the raw gradient at the same compression settings.
    let source = gradient(256, 256);
    let config = MosaicConfig {
        block: Some(32),
        mode: SizingMode::Manual,
        ..MosaicConfig::default()
    };

    let result = tessera_pipeline::process(&source, &config).unwrap();
    let original_png = tessera_export::to_png(&source, 300).unwrap();
    let mosaic_png = tessera_export::to_png(&result.image, 300).unwrap();

    assert!(
        mosaic_png.len() < original_png.len(),
        "mosaic PNG ({}) should be smaller than source PNG ({})",
        mosaic_png.len(),
        original_png.len(),
    );
}
