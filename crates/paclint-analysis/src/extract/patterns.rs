//! Compiled patterns for package-level constructs.
//!
//! Patterns marked "code view" run over text with comments blanked; patterns
//! marked "bare view" also need string contents blanked. See `mask`.

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern:?}: {e}"),
    }
}

/// `BeginPackage["Ctx`", {"Dep`", ...}]` or with a single string context. Code view.
pub static BEGIN_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"\bBeginPackage\s*\[\s*"([^"]+)"\s*(?:,\s*(\{[^}]*\}|"[^"]*"))?"#)
});

/// `EndPackage[]`. Code view.
pub static END_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\bEndPackage\s*\[\s*\]"));

/// `Begin["`Private`"]`. Code view.
pub static BEGIN_SECTION: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"\bBegin\s*\[\s*"([^"]*)"\s*\]"#));

/// `End[]`. Code view.
pub static END_SECTION: LazyLock<Regex> = LazyLock::new(|| compile(r"\bEnd\s*\[\s*\]"));

/// `Needs["Ctx`"]` with an optional second string argument. Code view.
pub static NEEDS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"\bNeeds\s*\[\s*"([^"]+)"\s*(?:,\s*"([^"]*)"\s*)?\]"#)
});

/// `Get["Ctx`"]`. Code view.
pub static GET: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"\bGet\s*\[\s*"([^"]+)"\s*\]"#));

/// `<< Ctx`Sub`` (context form only). Code view.
pub static GET_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"<<\s*([A-Za-z$][A-Za-z0-9$]*`(?:[A-Za-z$][A-Za-z0-9$]*`)*)")
});

/// `Version -> "1.2"` or `"Version" -> "1.2"`. Code view.
pub static VERSION: LazyLock<Regex> =
    LazyLock::new(|| compile(r#""?\bVersion"?\s*->\s*"([0-9][0-9.]*)""#));

/// String literal, used to split `BeginPackage` context lists.
pub static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| compile(r#""([^"]*)""#));

/// `Name[args] :=` at the start of a line. Bare view. The argument list may
/// hold brackets one level deep, as in `f[x_ /; Length[x] > 2]`.
pub static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)^[ \t]*([A-Z][A-Za-z0-9$]*)\s*\[((?:[^\[\]\n]|\[[^\[\]\n]*\])*)\]\s*:=")
});

/// `Name[` call head. Bare view.
pub static CALL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b([A-Z][A-Za-z0-9$]*)\s*\["));

/// `Name::usage =`. Bare view.
pub static USAGE_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b([A-Z][A-Za-z0-9$]*)::usage\s*="));

/// Parameter pattern name, the `x` in `x_` or `x_List`.
pub static PARAMETER_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b([a-z][A-Za-z0-9]*)_"));

/// `Other`Private`sym` reference. Bare view.
pub static PRIVATE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"((?:[A-Za-z$][A-Za-z0-9$]*`)+)Private`([A-Za-z$][A-Za-z0-9$]*)")
});

/// Deprecation marker, usually in a comment. Raw text.
pub static DEPRECATED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Deprecated|DEPRECATED|@deprecated"));

/// A package load inside a comment. Raw text.
pub static COMMENTED_LOAD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\(\*[^*]*(?:Needs|Get|<<)[^*]*\*\)"));

/// A package load inside a conditional. Bare view.
pub static CONDITIONAL_LOAD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?:If|Which|Switch)\s*\[[^\]]*(?:Needs|Get|<<)"));

/// Test framework calls that belong in test files. Bare view.
pub static TEST_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\b(VerificationTest|TestReport|TestCreate|TestID|TestMatch|TestSuite|VerifyTest|VerifyAssert|AssertTrue|AssertFalse|AssertEqual)\b",
    )
});

/// Whole-segment PascalCase check for package context segments.
pub static PASCAL_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Z][A-Za-z0-9]*$"));

fn name_matcher(words: &[&str]) -> AhoCorasick {
    match AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostFirst)
        .build(words)
    {
        Ok(ac) => ac,
        Err(e) => panic!("invalid built-in word list: {e}"),
    }
}

/// Names that reveal internals when exported.
pub static INTERNAL_NAME: LazyLock<AhoCorasick> = LazyLock::new(|| {
    name_matcher(&["Internal", "Impl", "Helper", "Aux", "Private", "Temp"])
});

/// Names that leak implementation strategy when exported.
pub static IMPLEMENTATION_DETAIL_NAME: LazyLock<AhoCorasick> = LazyLock::new(|| {
    name_matcher(&[
        "Loop", "Iterate", "Recursive", "Cache", "Memo", "Index", "Counter", "Temp", "Aux",
    ])
});

/// Layer keywords in package names.
pub static UI_LAYER: LazyLock<AhoCorasick> =
    LazyLock::new(|| name_matcher(&["UI", "GUI", "View", "Frontend", "Display"]));

pub static DATA_LAYER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    name_matcher(&["Data", "Persistence", "Repository", "DAO", "Database"])
});

/// Normalize a context string: trims, and gives bare context names their
/// trailing backtick so `"Foo"` and `"Foo`"` name the same package. File
/// paths are returned unchanged.
pub fn normalize_context(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() {
        return None;
    }
    if name.contains(['/', '\\', '.']) || name.ends_with('`') {
        return Some(name.to_string());
    }
    Some(format!("{name}`"))
}
