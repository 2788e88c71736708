//! Batch resizing of a directory tree.
//!
//! Every decodable image under the source directory is resized with the same
//! request and written as `<stem>.jpg` into the output directory, mirroring
//! the relative directory layout:
//!
//! ```text
//! photos/                      out/
//! ├── 001-dawn.jpg       →     ├── 001-dawn.jpg
//! ├── notes.txt                │
//! └── travel/                  └── travel/
//!     └── rome.png       →         └── rome.jpg
//! ```
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon).
//! Each resize is independent, so the only shared state is the backend
//! (which is `Sync`) and the event channel.
//!
//! Images smaller than the requested size are skipped and reported, not
//! treated as a failure of the whole batch.
//!
//! Two sources that share a stem (`a.jpg`, `a.png`) would land on the same
//! output. The first in sorted order is written; the others are reported as
//! failed before any worker starts.

use crate::imaging::rust_backend::is_supported_input;
use crate::imaging::{
    Dimensions, ImageBackend, OutputFormat, ResampleFilter, ResizeError, ResizeRequest,
    resize_bytes,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Settings shared by every image in a batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub request: ResizeRequest,
    pub filter: ResampleFilter,
}

/// Outcome of one image, sent as soon as that image is done.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Encoded {
        source: PathBuf,
        output: PathBuf,
        dimensions: Dimensions,
        bytes: usize,
    },
    SizeExceeded {
        source: PathBuf,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub encoded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Encoded { .. } => self.encoded += 1,
            BatchEvent::SizeExceeded { .. } => self.skipped += 1,
            BatchEvent::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.encoded + self.skipped + self.failed
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} encoded, {} skipped (too small), {} failed",
            self.encoded, self.skipped, self.failed
        )
    }
}

/// Collect decodable images under `source_dir`, sorted for stable output.
pub fn discover_images(source_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !source_dir.is_dir() {
        return Err(BatchError::SourceNotFound(source_dir.to_path_buf()));
    }
    let mut images = Vec::new();
    for entry in WalkDir::new(source_dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}

/// Output path for `source`: same relative location, JPEG extension.
pub fn output_path_for(source: &Path, source_dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = source.strip_prefix(source_dir).unwrap_or(source);
    output_dir
        .join(relative)
        .with_extension(OutputFormat::Jpeg.extension())
}

/// Pair every source with its output path.
///
/// Sources are sorted, so when two of them map to the same output (`a.jpg`
/// and `a.png`) the first keeps the name and the later ones carry the path
/// that already claimed it.
fn assign_outputs(
    images: Vec<PathBuf>,
    source_dir: &Path,
    output_dir: &Path,
) -> Vec<(PathBuf, PathBuf, Option<PathBuf>)> {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    images
        .into_iter()
        .map(|source| {
            let output = output_path_for(&source, source_dir, output_dir);
            let taken_by = match claimed.entry(output.clone()) {
                Entry::Occupied(first) => Some(first.get().clone()),
                Entry::Vacant(slot) => {
                    slot.insert(source.clone());
                    None
                }
            };
            (source, output, taken_by)
        })
        .collect()
}

/// Resize every image under `source_dir` into `output_dir`.
///
/// Per-image failures are reported through `events` and counted; only
/// problems with the directories themselves abort the batch. A source whose
/// output name is already taken by an earlier source is reported as failed
/// and never written.
pub fn run(
    backend: &impl ImageBackend,
    source_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchSummary, BatchError> {
    let images = discover_images(source_dir)?;
    std::fs::create_dir_all(output_dir)?;
    tracing::info!(count = images.len(), source = %source_dir.display(), "starting batch");
    let jobs = assign_outputs(images, source_dir, output_dir);

    let results: Vec<BatchEvent> = jobs
        .par_iter()
        .map_with(events, |events, (source, output, taken_by)| {
            let event = match taken_by {
                Some(first) => duplicate_output(source, output, first),
                None => process_one(backend, source, output, options),
            };
            if let Some(tx) = events {
                // Receiver gone only means nobody is listening anymore
                let _ = tx.send(event.clone());
            }
            event
        })
        .collect();

    let mut summary = BatchSummary::default();
    for event in &results {
        summary.record(event);
    }
    tracing::info!(%summary, "batch finished");
    Ok(summary)
}

fn duplicate_output(source: &Path, output: &Path, first: &Path) -> BatchEvent {
    tracing::warn!(
        source = %source.display(),
        output = %output.display(),
        "failed: output already claimed by {}",
        first.display()
    );
    BatchEvent::Failed {
        source: source.to_path_buf(),
        error: format!(
            "duplicate output {} (already written from {})",
            output.display(),
            first.display()
        ),
    }
}

/// Write `bytes` to `path` through a temporary sibling and a rename, so the
/// target is either the complete new file or untouched.
pub fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(path.file_name().unwrap_or_default());
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    let written = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn process_one(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    options: &BatchOptions,
) -> BatchEvent {
    match resize_file(backend, source, output, options) {
        Ok((dimensions, bytes)) => BatchEvent::Encoded {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            dimensions,
            bytes,
        },
        Err(FileError::Resize(e)) if e.is_size_exceeded() => {
            tracing::warn!(source = %source.display(), "skipped: {e}");
            BatchEvent::SizeExceeded {
                source: source.to_path_buf(),
            }
        }
        Err(e) => {
            tracing::warn!(source = %source.display(), "failed: {e}");
            BatchEvent::Failed {
                source: source.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

#[derive(Error, Debug)]
enum FileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Resize(#[from] ResizeError),
}

fn resize_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<(Dimensions, usize), FileError> {
    let bytes = std::fs::read(source)?;
    let encoded = resize_bytes(backend, &bytes, &options.request, options.filter)?;
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_output(output, &encoded.bytes)?;
    Ok((encoded.dimensions, encoded.bytes.len()))
}
