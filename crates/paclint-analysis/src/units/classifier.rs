//! Test vs implementation classification by file name.

use std::sync::LazyLock;

use regex::Regex;

static TEST_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)test.*?\.(?:m|wl|wlt)$").unwrap_or_else(|e| panic!("invalid test-file pattern: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UnitKind {
    Test,
    Implementation,
}

/// Classify a unit by the file-name part of its identifier.
pub fn classify(file_id: &str) -> UnitKind {
    if TEST_FILE.is_match(file_name(file_id)) {
        UnitKind::Test
    } else {
        UnitKind::Implementation
    }
}

/// Last path component of a unit identifier.
pub fn file_name(file_id: &str) -> &str {
    file_id.rsplit(['/', '\\']).next().unwrap_or(file_id)
}
