//! Codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three capabilities the resize core
//! needs from the outside world: identify, decode, and encode. The core never
//! touches codec internals or files; it only hands bytes and pixel buffers
//! across this boundary.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure Rust codecs.

use super::params::Quality;
use image::{DynamicImage, RgbImage};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Encoded output format. Resized images are always written as JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
}

/// Lookup table from MIME type or format name to output format.
///
/// Built once on first use, read-only afterwards.
static ENCODERS: LazyLock<Vec<(&'static str, OutputFormat)>> = LazyLock::new(|| {
    vec![
        ("image/jpeg", OutputFormat::Jpeg),
        ("image/jpg", OutputFormat::Jpeg),
        ("image/pjpeg", OutputFormat::Jpeg),
        ("jpeg", OutputFormat::Jpeg),
        ("jpg", OutputFormat::Jpeg),
    ]
});

impl OutputFormat {
    /// Case-insensitive lookup by MIME type (`image/jpeg`) or short name (`jpg`).
    pub fn lookup(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        ENCODERS
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, format)| *format)
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Trait for codec backends.
///
/// Implementations must be `Sync`: independent resizes share one backend
/// across the batch thread pool.
pub trait ImageBackend: Sync {
    /// Read image dimensions from the header without decoding pixels.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode an encoded image into a pixel buffer.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Encode a pixel buffer at the given quality.
    fn encode(
        &self,
        image: &RgbImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Bytes returned by [`MockBackend::encode`].
    pub const MOCK_ENCODED: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

    /// Mock backend that records operations without running real codecs.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub decode_results: Mutex<Vec<DynamicImage>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Decode(usize),
        Encode {
            width: u32,
            height: u32,
            format: OutputFormat,
            quality: u8,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        pub fn with_images(images: Vec<DynamicImage>) -> Self {
            Self {
                decode_results: Mutex::new(images),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn encode_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Encode { .. }))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(bytes.len()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))
        }

        fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(bytes.len()));

            self.decode_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock image".to_string()))
        }

        fn encode(
            &self,
            image: &RgbImage,
            format: OutputFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: image.width(),
                height: image.height(),
                format,
                quality: quality.value(),
            });
            Ok(MOCK_ENCODED.to_vec())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(&[1, 2, 3]).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Identify(3)]);
    }

    #[test]
    fn mock_decode_without_images_errors() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(&[0u8; 8]),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn mock_records_encode() {
        let backend = MockBackend::new();
        let img = RgbImage::new(32, 24);

        let bytes = backend
            .encode(&img, OutputFormat::Jpeg, Quality::new(75))
            .unwrap();
        assert_eq!(bytes, MOCK_ENCODED);

        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Encode {
                width: 32,
                height: 24,
                format: OutputFormat::Jpeg,
                quality: 75,
            }]
        );
    }

    #[test]
    fn output_format_lookup_is_case_insensitive() {
        assert_eq!(OutputFormat::lookup("image/jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::lookup("IMAGE/JPEG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::lookup("JPG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::lookup("image/png"), None);
    }

    #[test]
    fn output_format_jpeg_metadata() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
    }

    #[test]
    fn dimensions_display() {
        let d = Dimensions {
            width: 203,
            height: 185,
        };
        assert_eq!(d.to_string(), "203x185");
    }
}
