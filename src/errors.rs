// ABOUTME: Error types for the openxml-pptx crate
// ABOUTME: Provides structured error handling for element building, media and packaging

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PptxError {
    #[error("Unknown namespace prefix: {0}")]
    UnknownNamespacePrefix(String),

    #[error("Unsupported image type (expected .jpg, .jpeg or .png): {0:?}")]
    UnsupportedImageType(PathBuf),

    #[error("Failed to read image dimensions from {path:?}: {source}")]
    ImageDecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Template directory not found: {0:?}")]
    MissingTemplate(PathBuf),

    #[error("Cannot write output file {path:?}: {source}")]
    InvalidOutputPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0:?}")]
    PathNotFound(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Slide {0} does not exist")]
    SlideNotFound(usize),

    #[error("Presentation has no slides")]
    EmptyPresentation,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Package error: {0}")]
    PackageError(String),
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for PptxError {
    fn from(err: zip::result::ZipError) -> Self {
        PptxError::PackageError(format!("ZIP operation failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PptxError>;
