//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the crop and output size) and the [`backend`](super::backend)
//! (which does the codec work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (0-100, default 90). Clamped on construction.
//! - [`ResampleFilter`]: interpolation filter used when scaling the clip region.
//! - [`ResizeRequest`]: optional target width/height plus quality.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Interpolation filter for the scaling step.
///
/// Only smoothing filters are offered; nearest-neighbor aliases badly on
/// downscale and has no variant here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Catmull-Rom cubic.
    #[default]
    Bicubic,
    Lanczos3,
    Gaussian,
}

impl ResampleFilter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
            ResampleFilter::Gaussian => FilterType::Gaussian,
        }
    }
}

/// What the caller asked for: zero, one, or two target dimensions.
///
/// A missing dimension is derived from the source aspect ratio; when both
/// are missing the image is re-encoded at its original size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Quality,
}

impl ResizeRequest {
    pub fn new(width: Option<u32>, height: Option<u32>, quality: Quality) -> Self {
        Self {
            width,
            height,
            quality,
        }
    }
}
