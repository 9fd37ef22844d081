//! Image decoding and orientation normalization.
//!
//! Accepts raw image bytes (PNG, JPEG, GIF, WebP) and produces the RGBA
//! buffer the mosaic stages operate on. Camera files frequently store
//! pixels unrotated with an EXIF orientation tag; the tag is applied
//! here so block coordinates always refer to the upright image.
//!
//! This is the first step of the pipeline: raw bytes in, `RgbaImage`
//! out.

use std::io::Cursor;

use exif::{In, Tag};
use image::DynamicImage;

use crate::types::{PipelineError, RgbaImage};

/// Decode raw image bytes into an upright RGBA buffer.
///
/// Supports whatever formats the enabled `image` features can decode.
/// An EXIF orientation tag (values 2-8), when present, is applied before
/// returning; images without one pass through untouched.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let image = image::load_from_memory(bytes)?;
    let image = apply_orientation(image, read_orientation(bytes));
    Ok(image.to_rgba8())
}

/// Read the EXIF orientation tag, if the container carries one.
///
/// EXIF errors are deliberately swallowed: a missing or unreadable tag
/// just means no rotation is needed.
fn read_orientation(bytes: &[u8]) -> Option<u32> {
    exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| exif.get_field(Tag::Orientation, In::PRIMARY).cloned())
        .and_then(|field| field.value.get_uint(0))
}

/// Map the eight EXIF orientation values onto flips and rotations.
fn apply_orientation(image: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    match orientation {
        Some(2) => image.fliph(),
        Some(3) => image.rotate180(),
        Some(4) => image.flipv(),
        Some(5) => image.rotate90().fliph(),
        Some(6) => image.rotate90(),
        Some(7) => image.rotate270().fliph(),
        Some(8) => image.rotate270(),
        _ => image,
    }
}
