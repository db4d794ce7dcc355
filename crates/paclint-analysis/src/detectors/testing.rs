//! Test coverage pairing by file name, and test calls in production code.

use paclint_core::types::{Finding, RuleId};

use super::traits::{DetectionContext, Detector, DetectorCategory};
use crate::units::file_name;

pub struct TestingDetector;

impl Detector for TestingDetector {
    fn id(&self) -> &str {
        "test-coverage"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Testing
    }

    fn rules(&self) -> &'static [RuleId] {
        &[
            RuleId::OrphanedTestFile,
            RuleId::ImplementationWithoutTests,
            RuleId::TestFunctionInProductionCode,
        ]
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let graph = ctx.graph;

        if graph.is_test_file(ctx.file_id) {
            let subject = tested_subject(ctx.file_id);
            let has_impl = subject.is_empty()
                || graph
                    .implementation_files()
                    .iter()
                    .any(|f| stem(f).to_ascii_lowercase().contains(&subject));
            if !has_impl {
                findings.push(ctx.finding(
                    1,
                    RuleId::OrphanedTestFile,
                    "Test file has no corresponding implementation",
                ));
            }
            return findings;
        }

        if let Some((name, line)) = &ctx.scan.test_function {
            findings.push(ctx.finding(
                *line,
                RuleId::TestFunctionInProductionCode,
                format!("Test function found in production code: {name}"),
            ));
        }

        if ctx.package().is_some() {
            let base = stem(ctx.file_id).to_ascii_lowercase();
            let has_test = graph
                .test_files()
                .iter()
                .any(|f| file_name(f).to_ascii_lowercase().contains(&base));
            if !has_test {
                findings.push(ctx.finding(
                    ctx.package_line(),
                    RuleId::ImplementationWithoutTests,
                    "Package has no test coverage",
                ));
            }
        }

        findings
    }
}

/// File name without its extension.
fn stem(file_id: &str) -> &str {
    let name = file_name(file_id);
    name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name)
}

/// Lowercased stem of a test file with the word "test" and separators removed,
/// e.g. `GeometryTest.wlt` and `test_geometry.wl` both give `geometry`.
fn tested_subject(file_id: &str) -> String {
    stem(file_id)
        .to_ascii_lowercase()
        .replace("test", "")
        .trim_matches(|c: char| c == '_' || c == '-' || c == '.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::run_on;

    const PKG: &str = "BeginPackage[\"Geometry`\"]\nArea[r_] := r\nEndPackage[]\n";

    #[test]
    fn subject_extraction() {
        assert_eq!(tested_subject("tests/GeometryTest.wlt"), "geometry");
        assert_eq!(tested_subject("test_geometry.wl"), "geometry");
        assert_eq!(stem("src/Geometry.m"), "Geometry");
    }

    #[test]
    fn paired_files_are_clean() {
        let files = [("src/Geometry.m", PKG), ("tests/GeometryTest.wlt", "VerificationTest[1, 1]\n")];
        assert!(run_on(&TestingDetector, &files, "src/Geometry.m").is_empty());
        assert!(run_on(&TestingDetector, &files, "tests/GeometryTest.wlt").is_empty());
    }

    #[test]
    fn unpaired_files_are_flagged() {
        let files = [("src/Geometry.m", PKG), ("tests/AlgebraTest.wlt", "VerificationTest[1, 1]\n")];
        let impl_findings = run_on(&TestingDetector, &files, "src/Geometry.m");
        assert_eq!(impl_findings[0].rule, RuleId::ImplementationWithoutTests);
        let test_findings = run_on(&TestingDetector, &files, "tests/AlgebraTest.wlt");
        assert_eq!(test_findings[0].rule, RuleId::OrphanedTestFile);
    }

    #[test]
    fn test_calls_in_implementation() {
        let text = "Run[x_] := x\nVerificationTest[Run[1], 1]\n";
        let findings = run_on(&TestingDetector, &[("run.m", text)], "run.m");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::TestFunctionInProductionCode);
        assert_eq!(findings[0].line, 2);
    }
}
