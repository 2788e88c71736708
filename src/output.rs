//! CLI output formatting for all commands.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Source: 400x200
//! Target: 203x185
//!     Clip: 220x200 at (90, 0)
//!     Crop: width
//! ```
//!
//! ## Resize
//!
//! ```text
//! File generated: out.jpg (203x185, 14.2 KiB)
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001-wide.jpg → 001-wide.jpg (100x100, 3.1 KiB)
//! 002-small.jpg: skipped, smaller than requested size
//! broken.jpg: failed: decode stage: ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchSummary};
use crate::imaging::{ClipRect, Dimensions, EncodedImage, ResolveError, ResolvedDimensions};
use std::path::Path;

/// Human-readable byte count (`812 B`, `14.2 KiB`, `3.0 MiB`).
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

fn crop_axis(source: Dimensions, clip: ClipRect) -> &'static str {
    match (clip.width == source.width, clip.height == source.height) {
        (true, true) => "none",
        (true, false) => "height",
        _ => "width",
    }
}

/// Lines describing a resolved plan.
pub fn format_plan(source: Dimensions, resolved: &ResolvedDimensions) -> Vec<String> {
    let clip = resolved.clip;
    vec![
        format!("Source: {source}"),
        format!("Target: {}", resolved.target),
        format!(
            "    Clip: {}x{} at ({}, {})",
            clip.width, clip.height, clip.x, clip.y
        ),
        format!("    Crop: {}", crop_axis(source, clip)),
    ]
}

pub fn print_plan(source: Dimensions, resolved: &ResolvedDimensions) {
    for line in format_plan(source, resolved) {
        println!("{line}");
    }
}

/// Message for a request the resolver refused; nothing is written in that case.
pub fn format_rejected_request(err: &ResolveError) -> String {
    match err {
        ResolveError::SizeExceeded { .. } => format!("Target bytes were not generated: {err}"),
        ResolveError::InvalidDimensions(_) => format!("Invalid size request: {err}"),
    }
}

/// Confirmation line for a single resize.
pub fn format_resize_result(target: &Path, encoded: &EncodedImage) -> String {
    format!(
        "File generated: {} ({}, {})",
        target.display(),
        encoded.dimensions,
        format_size(encoded.bytes.len())
    )
}

pub fn print_resize_result(target: &Path, encoded: &EncodedImage) {
    println!("{}", format_resize_result(target, encoded));
}

fn display_name<'a>(path: &'a Path, root: &Path) -> std::borrow::Cow<'a, str> {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy()
}

/// One line per batch event, paths shown relative to their roots.
pub fn format_batch_event(event: &BatchEvent, source_root: &Path, output_root: &Path) -> String {
    match event {
        BatchEvent::Encoded {
            source,
            output,
            dimensions,
            bytes,
        } => format!(
            "{} → {} ({}, {})",
            display_name(source, source_root),
            display_name(output, output_root),
            dimensions,
            format_size(*bytes)
        ),
        BatchEvent::SizeExceeded { source } => format!(
            "{}: skipped, smaller than requested size",
            display_name(source, source_root)
        ),
        BatchEvent::Failed { source, error } => {
            format!("{}: failed: {}", display_name(source, source_root), error)
        }
    }
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!("Processed {} images: {}", summary.total(), summary)
}
