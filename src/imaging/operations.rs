//! High-level resize operations.
//!
//! These functions combine calculations, resampling, and backend execution.
//! Each call is independent: resolve → resample → encode, or stop at the
//! first failure with the failing stage named in the error.

use super::backend::{BackendError, Dimensions, ImageBackend, OutputFormat};
use super::calculations::{ResolveError, ResolvedDimensions, resolve_dimensions};
use super::params::{ResampleFilter, ResizeRequest};
use super::resample::resample;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("decode stage: {0}")]
    Decode(#[source] BackendError),
    #[error("encode stage: {0}")]
    Encode(#[source] BackendError),
}

impl ResizeError {
    /// True when the request asked for more pixels than the source has.
    pub fn is_size_exceeded(&self) -> bool {
        matches!(self, ResizeError::Resolve(ResolveError::SizeExceeded { .. }))
    }
}

/// Result type for resize operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// A fully encoded output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub dimensions: Dimensions,
    pub format: OutputFormat,
}

/// Plan a resize without touching pixels.
///
/// Useful for previewing the crop and for testing parameter generation.
pub fn plan_resize(
    source: Dimensions,
    request: &ResizeRequest,
) -> std::result::Result<ResolvedDimensions, ResolveError> {
    resolve_dimensions(source, request.width, request.height)
}

/// Plan a resize from encoded bytes, reading only the image header.
pub fn plan_resize_bytes(
    backend: &impl ImageBackend,
    bytes: &[u8],
    request: &ResizeRequest,
) -> Result<(Dimensions, ResolvedDimensions)> {
    let source = backend.identify(bytes).map_err(ResizeError::Decode)?;
    let resolved = plan_resize(source, request)?;
    Ok((source, resolved))
}

/// Center-crop and scale a decoded image, then encode it as JPEG.
///
/// Nothing is allocated for the output when the request is rejected by the
/// resolver.
pub fn resize_image(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    request: &ResizeRequest,
    filter: ResampleFilter,
) -> Result<EncodedImage> {
    let source_dims = Dimensions::of(source);
    let resolved = plan_resize(source_dims, request)?;
    tracing::debug!(
        source = %source_dims,
        target = %resolved.target,
        clip = ?resolved.clip,
        "resolved resize"
    );

    let pixels = resample(source, resolved.clip, resolved.target, filter);
    let format = OutputFormat::Jpeg;
    let bytes = backend
        .encode(&pixels, format, request.quality)
        .map_err(ResizeError::Encode)?;

    Ok(EncodedImage {
        bytes,
        dimensions: resolved.target,
        format,
    })
}

/// Decode `bytes`, then [`resize_image`].
///
/// The size check runs against the header first, so an oversized request
/// never decodes the full image.
pub fn resize_bytes(
    backend: &impl ImageBackend,
    bytes: &[u8],
    request: &ResizeRequest,
    filter: ResampleFilter,
) -> Result<EncodedImage> {
    plan_resize_bytes(backend, bytes, request)?;
    let source = backend.decode(bytes).map_err(ResizeError::Decode)?;
    resize_image(backend, &source, request, filter)
}

/// Output format for a target path, chosen by its extension.
///
/// Paths without an extension get the default format.
pub fn output_format_for(path: &Path) -> std::result::Result<OutputFormat, BackendError> {
    match path.extension().and_then(|e| e.to_str()) {
        None => Ok(OutputFormat::default()),
        Some(ext) => OutputFormat::lookup(ext)
            .ok_or_else(|| BackendError::UnsupportedFormat(ext.to_string())),
    }
}
