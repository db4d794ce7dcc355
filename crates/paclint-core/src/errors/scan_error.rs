//! Source unit errors.

use super::error_code::{self, PaclintErrorCode};

/// Errors that can occur while discovering or reading a source unit.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error reading {file}: {source}")]
    IoError {
        file: String,
        source: std::io::Error,
    },

    #[error("File too large: {file} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { file: String, size: u64, max: u64 },

    #[error("Unsupported encoding in {file}: {message}")]
    UnsupportedEncoding { file: String, message: String },

    #[error("Directory walk failed under {root}: {message}")]
    WalkFailed { root: String, message: String },

    #[error("Scan cancelled")]
    Cancelled,
}

impl PaclintErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => error_code::CANCELLED,
            Self::MaxFileSizeExceeded { .. } => error_code::FILE_TOO_LARGE,
            _ => error_code::SCAN_ERROR,
        }
    }
}
