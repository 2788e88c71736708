//! Shared test utilities for the cropscale test suite.
//!
//! Synthetic images are generated in memory so tests need no fixture files:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = jpeg_bytes(400, 200);
//! let img = gradient_image(64, 48);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// RGB image with horizontal/vertical gradients plus some fine detail, so
/// resampling and JPEG quantization both have something to chew on.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * 7 + y * 13) % 256) as u8])
    })
}

/// A valid JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient_image(width, height);
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer.into_inner()
}

/// A valid PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    gradient_image(width, height)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}
