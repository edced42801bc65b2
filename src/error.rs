//! Export error types
//!
//! Per-image problems are collected and the run continues; everything
//! else aborts the export.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while assembling and writing sprite sheets
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export root does not exist or is not a directory
    #[error("Invalid export root: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// A cataloged name produced no bitmap
    #[error("No pixel data for '{0}'")]
    MissingPixelData(String),

    /// Source bitmap does not fit the canvas it is blitted into
    #[error(
        "Size mismatch: {width}x{height} tile at row {y_offset} does not fit \
         {dest_width}x{dest_height} canvas"
    )]
    SizeMismatch {
        width: u32,
        height: u32,
        dest_width: u32,
        dest_height: u32,
        y_offset: u32,
    },

    /// File system failure
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed buffer reached the encoder
    #[error("Failed to encode {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },

    /// Unparseable configuration or catalog manifest
    #[error("Invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl ExportError {
    /// Build an IO error bound to a path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build an encode error bound to a path
    pub fn encode(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        ExportError::Encode {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Build a configuration error bound to a path
    pub fn config(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        ExportError::Config {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ExportError::MissingPixelData(_) | ExportError::SizeMismatch { .. }
        )
    }
}

/// An aborted export: the first fatal error and the work done before it
#[derive(Debug, Error)]
#[error("Export aborted after {files_written} files: {error}")]
pub struct ExportFailure {
    #[source]
    pub error: ExportError,
    pub files_written: usize,
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
