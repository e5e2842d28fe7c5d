//! Real image payloads encoded at test time.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

/// Encodes a small blank image in `format`.
///
/// # Panics
///
/// Panics if the encoder for `format` is not compiled in.
#[must_use]
pub fn encode(format: ImageFormat) -> Vec<u8> {
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(RgbImage::new(8, 8)),
        _ => DynamicImage::ImageRgba8(RgbaImage::new(8, 8)),
    };
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .expect("fixture encoding should succeed");
    cursor.into_inner()
}

#[must_use]
pub fn png() -> Vec<u8> {
    encode(ImageFormat::Png)
}

#[must_use]
pub fn jpeg() -> Vec<u8> {
    encode(ImageFormat::Jpeg)
}

#[must_use]
pub fn gif() -> Vec<u8> {
    encode(ImageFormat::Gif)
}
