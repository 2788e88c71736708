//! Crop-and-scale of a decoded image.
//!
//! Takes the clip rectangle from [`resolve_dimensions`](super::resolve_dimensions)
//! and produces an RGB buffer of exactly the target size. The intermediate
//! crop is an owned buffer that is dropped before this function returns.

use super::backend::Dimensions;
use super::calculations::{ClipRect, ResolvedDimensions};
use super::params::ResampleFilter;
use image::{DynamicImage, RgbImage};

/// Crop `clip` out of `source` and scale it to exactly `target`.
///
/// The clip must lie within the source bounds; [`resolve_dimensions`]
/// guarantees that. When the clip is the full frame and `target` equals the
/// source size, the pixels are converted without resampling.
///
/// [`resolve_dimensions`]: super::resolve_dimensions
pub fn resample(
    source: &DynamicImage,
    clip: ClipRect,
    target: Dimensions,
    filter: ResampleFilter,
) -> RgbImage {
    let source_dims = Dimensions::of(source);
    debug_assert!(clip.fits_within(source_dims));

    if (ResolvedDimensions { target, clip }).is_identity(source_dims) {
        return source.to_rgb8();
    }

    let region = if clip == ClipRect::full(source_dims) {
        source.to_rgb8()
    } else {
        source
            .crop_imm(clip.x, clip.y, clip.width, clip.height)
            .into_rgb8()
    };

    image::imageops::resize(
        &region,
        target.width,
        target.height,
        filter.to_filter_type(),
    )
}
