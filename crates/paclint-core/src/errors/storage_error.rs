//! Finding sink errors.

use super::error_code::{self, PaclintErrorCode};

/// Errors raised by the finding sink and the committers behind it.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Commit failed for {file}:{line}: {message}")]
    CommitFailed {
        file: String,
        line: u32,
        message: String,
    },

    #[error("Finding channel closed")]
    ChannelClosed,

    #[error("Finding queue stayed full for {waited_ms}ms")]
    QueueStalled { waited_ms: u64 },

    #[error("Writer thread failed: {message}")]
    WriterThread { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaclintErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ChannelClosed => error_code::SINK_CLOSED,
            Self::QueueStalled { .. } => error_code::SINK_STALLED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
