//! Detection errors.

use super::error_code::{self, PaclintErrorCode};

/// Errors that can occur while running detectors over a file.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Detector {id} panicked on {file}: {message}")]
    DetectorPanic {
        id: String,
        file: String,
        message: String,
    },
}

impl PaclintErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DetectorPanic { .. } => error_code::DETECTOR_PANIC,
            _ => error_code::DETECTION_ERROR,
        }
    }
}
