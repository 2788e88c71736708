//! Pure calculation functions for crop and output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! The resolver answers two questions for a source of `w × h` and an
//! optional requested size:
//!
//! 1. What is the final output size? A missing width or height is derived
//!    from the source aspect ratio.
//! 2. Which region of the source is scaled into it? The region is centered
//!    and matches the output aspect ratio, cropping either top/bottom or
//!    left/right:
//!
//! ```text
//!   target 2:1, source 1:1        target 1:2, source 1:1
//!    _______________               _______________
//!   |_ _ _ _ _ _ _ _|             |    !     !    |
//!   |               |             |    !     !    |
//!   |               |             |    !     !    |
//!   |_ _ _ _ _ _ _ _|             |    !     !    |
//!   |_______________|             |____!_____!____|
//!    crop height                   crop width
//! ```

use super::backend::Dimensions;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "requested {} exceeds source {source_dims}",
        describe_request(*.requested_width, *.requested_height)
    )]
    SizeExceeded {
        requested_width: Option<u32>,
        requested_height: Option<u32>,
        source_dims: Dimensions,
    },
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
}

fn describe_request(width: Option<u32>, height: Option<u32>) -> String {
    let side = |v: Option<u32>| v.map_or_else(|| "auto".to_string(), |v| v.to_string());
    format!("{}x{}", side(width), side(height))
}

/// Region of the source image that gets scaled into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    pub fn full(dims: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dims.width,
            height: dims.height,
        }
    }

    pub fn fits_within(&self, dims: Dimensions) -> bool {
        self.x as u64 + self.width as u64 <= dims.width as u64
            && self.y as u64 + self.height as u64 <= dims.height as u64
    }
}

/// Output of [`resolve_dimensions`]: final size plus the source region to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDimensions {
    pub target: Dimensions,
    pub clip: ClipRect,
}

impl ResolvedDimensions {
    /// True when nothing is cropped and nothing is scaled.
    pub fn is_identity(&self, source: Dimensions) -> bool {
        self.target == source && self.clip == ClipRect::full(source)
    }
}

/// Derive the output size and centered clip rectangle.
///
/// # Errors
/// * [`ResolveError::InvalidDimensions`] for a zero-sized source or target,
///   including a derived dimension that rounds down to zero.
/// * [`ResolveError::SizeExceeded`] when a requested dimension is larger
///   than the source. No upscaling is ever performed.
///
/// # Examples
/// ```
/// # use cropscale::imaging::{resolve_dimensions, ClipRect, Dimensions};
/// let source = Dimensions { width: 400, height: 200 };
/// let resolved = resolve_dimensions(source, Some(203), Some(185)).unwrap();
/// assert_eq!(resolved.clip, ClipRect { x: 90, y: 0, width: 220, height: 200 });
/// ```
pub fn resolve_dimensions(
    source: Dimensions,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<ResolvedDimensions, ResolveError> {
    if source.width == 0 || source.height == 0 {
        return Err(ResolveError::InvalidDimensions(format!(
            "source is {}x{}",
            source.width, source.height
        )));
    }
    if target_width == Some(0) || target_height == Some(0) {
        return Err(ResolveError::InvalidDimensions(
            "target width and height must be non-zero".into(),
        ));
    }

    let exceeds_width = target_width.is_some_and(|w| w > source.width);
    let exceeds_height = target_height.is_some_and(|h| h > source.height);
    if exceeds_width || exceeds_height {
        return Err(ResolveError::SizeExceeded {
            requested_width: target_width,
            requested_height: target_height,
            source_dims: source,
        });
    }

    let target = match (target_width, target_height) {
        (None, None) => {
            return Ok(ResolvedDimensions {
                target: source,
                clip: ClipRect::full(source),
            });
        }
        (Some(width), Some(height)) => Dimensions { width, height },
        (Some(width), None) => Dimensions {
            width,
            height: derive_height(source, width)?,
        },
        (None, Some(height)) => Dimensions {
            width: derive_width(source, height)?,
            height,
        },
    };

    Ok(ResolvedDimensions {
        target,
        clip: calculate_clip(source, target),
    })
}

/// Missing width for a given height: `round(source_ratio * height)`.
pub fn derive_width(source: Dimensions, height: u32) -> Result<u32, ResolveError> {
    let source_ratio = source.width as f64 / source.height as f64;
    let width = (source_ratio * height as f64).round() as u32;
    non_zero(width.min(source.width), "derived width")
}

/// Missing height for a given width: `round(width / source_ratio)`.
pub fn derive_height(source: Dimensions, width: u32) -> Result<u32, ResolveError> {
    let source_ratio = source.width as f64 / source.height as f64;
    let height = (width as f64 / source_ratio).round() as u32;
    non_zero(height.min(source.height), "derived height")
}

fn non_zero(value: u32, what: &str) -> Result<u32, ResolveError> {
    if value == 0 {
        Err(ResolveError::InvalidDimensions(format!(
            "{what} rounds to zero"
        )))
    } else {
        Ok(value)
    }
}

/// Center-crop region of `source` whose aspect ratio matches `target`.
///
/// Both dimensions of `source` and `target` must be non-zero (checked in
/// debug builds; [`resolve_dimensions`] rejects zero first). Ratios are
/// compared by cross-multiplication in `u64`, so the ceil of the cropped
/// side is exact and never exceeds the source bounds.
pub fn calculate_clip(source: Dimensions, target: Dimensions) -> ClipRect {
    debug_assert!(
        source.width > 0 && source.height > 0 && target.width > 0 && target.height > 0,
        "calculate_clip needs non-zero sizes, got {source} -> {target}"
    );
    let (sw, sh) = (source.width as u64, source.height as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    // target_ratio >= source_ratio  <=>  tw * sh >= sw * th
    if tw * sh >= sw * th {
        // Target is wider (or equal): keep full width, crop height
        let clip_height = (sw * th).div_ceil(tw).min(sh) as u32;
        ClipRect {
            x: 0,
            y: (source.height - clip_height) / 2,
            width: source.width,
            height: clip_height,
        }
    } else {
        // Target is taller: keep full height, crop width
        let clip_width = (sh * tw).div_ceil(th).min(sw) as u32;
        ClipRect {
            x: (source.width - clip_width) / 2,
            y: 0,
            width: clip_width,
            height: source.height,
        }
    }
}
