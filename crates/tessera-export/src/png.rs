//! PNG serializer with physical-resolution metadata.
//!
//! Converts a finished mosaic buffer into PNG bytes using the [`png`]
//! crate, embedding the requested print density as a pHYs chunk
//! (pixels per meter). Pixel data is written verbatim — the density
//! affects metadata only.
//!
//! This is a pure function with no I/O — it returns a `Vec<u8>`. Either
//! the full stream is produced or an error is returned; no partial
//! output escapes.

use png::{BitDepth, ColorType, Encoder, PixelDimensions, Unit};

use tessera_pipeline::RgbaImage;

/// Meters per inch, for the pHYs pixels-per-meter conversion.
const METERS_PER_INCH: f64 = 0.0254;

/// Errors that can occur while serializing a buffer to PNG.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The buffer has a zero dimension and cannot be encoded.
    #[error("cannot encode an empty image (zero width or height)")]
    EmptyImage,

    /// The PNG writer reported a failure.
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Convert dots per inch to the pHYs chunk's pixels per meter.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pixels_per_meter(dpi: u32) -> u32 {
    (f64::from(dpi) / METERS_PER_INCH).round() as u32
}

/// Recover dots per inch from a pHYs pixels-per-meter value.
///
/// Inverse of [`pixels_per_meter`] up to rounding; useful for verifying
/// encoded output and for shells displaying an existing file's density.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn dots_per_inch(pixels_per_meter: u32) -> u32 {
    (f64::from(pixels_per_meter) * METERS_PER_INCH).round() as u32
}

/// Serialize an RGBA buffer to PNG bytes with embedded density metadata.
///
/// Output is RGBA8 with fast compression — mosaic buffers are dominated
/// by identical pixel runs, so even the fast profile compresses them
/// well.
///
/// # Errors
///
/// Returns [`EncodeError::EmptyImage`] if either dimension is zero, or
/// [`EncodeError::Png`] if the underlying writer fails.
pub fn to_png(image: &RgbaImage, dpi: u32) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyImage);
    }

    let mut bytes = Vec::new();

    let mut encoder = Encoder::new(&mut bytes, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);

    let ppm = pixels_per_meter(dpi);
    encoder.set_pixel_dims(Some(PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;

    Ok(bytes)
}
