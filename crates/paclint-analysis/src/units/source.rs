//! The `SourceUnit` trait and its stock implementations.

use std::path::{Path, PathBuf};

use paclint_core::errors::ScanError;

/// One analyzable file as the host presents it.
///
/// `text` may be called more than once (once per pipeline stage) and from a
/// worker thread, hence `Send + Sync`.
pub trait SourceUnit: Send + Sync {
    /// Stable identifier, usually a root-relative path.
    fn id(&self) -> &str;

    fn text(&self) -> Result<String, ScanError>;

    fn size_bytes(&self) -> u64;

    fn line_count(&self) -> Result<usize, ScanError> {
        Ok(self.text()?.lines().count())
    }
}

/// A unit held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryUnit {
    id: String,
    text: String,
}

impl MemoryUnit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl SourceUnit for MemoryUnit {
    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> Result<String, ScanError> {
        Ok(self.text.clone())
    }

    fn size_bytes(&self) -> u64 {
        self.text.len() as u64
    }
}

/// A unit backed by a file; text is read on each access.
#[derive(Debug, Clone)]
pub struct FsUnit {
    id: String,
    path: PathBuf,
    size: u64,
}

impl FsUnit {
    /// `id` is what findings report; `path` is where the text lives.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let id = id.into();
        let path = path.into();
        let size = std::fs::metadata(&path)
            .map_err(|source| ScanError::IoError {
                file: id.clone(),
                source,
            })?
            .len();
        Ok(Self { id, path, size })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceUnit for FsUnit {
    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> Result<String, ScanError> {
        let bytes = std::fs::read(&self.path).map_err(|source| ScanError::IoError {
            file: self.id.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|e| ScanError::UnsupportedEncoding {
            file: self.id.clone(),
            message: e.to_string(),
        })
    }

    fn size_bytes(&self) -> u64 {
        self.size
    }
}
