//! Directory discovery with the `ignore` crate (respects .gitignore).

use std::path::Path;

use ignore::WalkBuilder;
use paclint_core::config::ScanConfig;
use paclint_core::errors::ScanError;

use super::source::{FsUnit, SourceUnit};

/// Discover analyzable files under `root`, sorted by identifier.
///
/// Identifiers are root-relative paths with `/` separators. Entries the
/// walker cannot read are logged and skipped.
pub fn discover_units(root: &Path, config: &ScanConfig) -> Result<Vec<FsUnit>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::WalkFailed {
            root: root.display().to_string(),
            message: "not a directory".to_string(),
        });
    }
    let extensions = config.effective_extensions();

    let walker = WalkBuilder::new(root)
        .follow_links(config.effective_follow_symlinks())
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build();

    let mut units = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if !matches_ext {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        let id = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        match FsUnit::new(id, path) {
            Ok(unit) => units.push(unit),
            Err(e) => tracing::warn!(error = %e, "skipping file"),
        }
    }

    units.sort_by(|a, b| a.id().cmp(b.id()));
    tracing::debug!(root = %root.display(), count = units.len(), "discovered units");
    Ok(units)
}
