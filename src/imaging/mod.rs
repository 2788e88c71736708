//! Image processing in pure Rust, no system codecs.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resolve crop** | [`resolve_dimensions`] (pure arithmetic) |
//! | **Crop + scale** | `DynamicImage::crop_imm` + `imageops::resize` (Catmull-Rom default) |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and output dimensions (unit testable)
//! - **Parameters**: Data structures describing a resize request
//! - **Resample**: Crop-and-scale of a decoded buffer
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + resample + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
mod resample;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, OutputFormat};
pub use calculations::{
    ClipRect, ResolveError, ResolvedDimensions, calculate_clip, derive_height, derive_width,
    resolve_dimensions,
};
pub use operations::{
    EncodedImage, ResizeError, plan_resize, plan_resize_bytes, resize_bytes, resize_image,
};
pub use params::{Quality, ResampleFilter, ResizeRequest};
pub use resample::resample;
pub use rust_backend::RustBackend;
