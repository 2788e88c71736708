//! # cropscale
//!
//! Center-crop and rescale images to an exact size, re-encoded as JPEG.
//!
//! # Pipeline
//!
//! Every resize is a single stateless call through two stages:
//!
//! ```text
//! 1. Resolve    source size + optional target  →  target size + clip rectangle
//! 2. Resample   clip rectangle of the pixels   →  target-sized buffer → JPEG bytes
//! ```
//!
//! The resolver is pure arithmetic: it fills in a missing width or height
//! from the source aspect ratio, refuses to upscale, and picks a centered
//! clip with the target's aspect ratio. The resampler crops that region and
//! scales it with a smoothing filter. Codecs sit behind the
//! [`imaging::ImageBackend`] trait, so the core never touches files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Dimension resolver, resampler, codec backend, resize operations |
//! | [`batch`] | Parallel resize of a directory tree |
//! | [`config`] | `cropscale.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! A request larger than the source in either dimension is rejected with
//! [`imaging::ResolveError::SizeExceeded`] before any pixels are decoded or
//! allocated. Callers choose a smaller target or give up; there is no
//! partially valid output.
//!
//! ## Round, Don't Truncate
//!
//! A missing dimension is derived with round-to-nearest, so a 3:2 source
//! asked for width 100 yields height 67, not 66.
//!
//! ## Exact Clip Arithmetic
//!
//! Aspect ratios are compared by integer cross-multiplication. The cropped
//! side is an exact ceiling and can never run past the source edge.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and JPEG encoding use the `image` crate only. The binary has no
//! system library dependencies.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
