//! Finding records and the cross-file rule identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cross-file rules. Serialized as their kebab-case key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    // ---- Dependency graph ----
    CircularPackageDependency,
    UnusedPackageImport,
    MissingPackageImport,
    TransitiveDependencyCouldBeDirect,
    DiamondDependency,
    GodPackageTooManyDependencies,
    PackageDependsOnApplicationCode,
    LayerViolation,
    UnstableDependency,

    // ---- Public API ----
    PackageExportsTooMuch,
    PackageExportsTooLittle,
    IncompletePublicApi,
    InternalImplementationExposed,
    PublicFunctionWithImplementationDetailsInName,
    PublicExportMissingUsageMessage,
    MissingPackageVersion,
    MissingPackageDocumentation,

    // ---- Dead code ----
    UnusedPublicFunction,
    UnusedExport,
    DeadPackage,
    FunctionOnlyCalledOnce,
    OverAbstractedApi,
    InternalApiUsedLikePublic,
    DeprecatedApiStillUsed,

    // ---- Consistency ----
    DuplicateSymbolDefinition,
    SymbolRedefinitionAfterImport,
    PackageVersionMismatch,
    PackageLoadedButNotListed,
    InconsistentParameterNamesAcrossOverloads,

    // ---- Tests ----
    OrphanedTestFile,
    ImplementationWithoutTests,
    TestFunctionInProductionCode,

    // ---- Hygiene ----
    InconsistentPackageNaming,
    PackageTooLarge,
    PackageTooSmall,
    CommentedOutPackageLoad,
    ConditionalPackageLoad,
    PublicApiOutsidePackageContext,
    PrivateSymbolUsedExternally,
}

impl RuleId {
    pub fn all() -> &'static [RuleId] {
        use RuleId::*;
        &[
            CircularPackageDependency,
            UnusedPackageImport,
            MissingPackageImport,
            TransitiveDependencyCouldBeDirect,
            DiamondDependency,
            GodPackageTooManyDependencies,
            PackageDependsOnApplicationCode,
            LayerViolation,
            UnstableDependency,
            PackageExportsTooMuch,
            PackageExportsTooLittle,
            IncompletePublicApi,
            InternalImplementationExposed,
            PublicFunctionWithImplementationDetailsInName,
            PublicExportMissingUsageMessage,
            MissingPackageVersion,
            MissingPackageDocumentation,
            UnusedPublicFunction,
            UnusedExport,
            DeadPackage,
            FunctionOnlyCalledOnce,
            OverAbstractedApi,
            InternalApiUsedLikePublic,
            DeprecatedApiStillUsed,
            DuplicateSymbolDefinition,
            SymbolRedefinitionAfterImport,
            PackageVersionMismatch,
            PackageLoadedButNotListed,
            InconsistentParameterNamesAcrossOverloads,
            OrphanedTestFile,
            ImplementationWithoutTests,
            TestFunctionInProductionCode,
            InconsistentPackageNaming,
            PackageTooLarge,
            PackageTooSmall,
            CommentedOutPackageLoad,
            ConditionalPackageLoad,
            PublicApiOutsidePackageContext,
            PrivateSymbolUsedExternally,
        ]
    }

    /// Stable rule key, e.g. `circular-package-dependency`.
    pub fn key(&self) -> &'static str {
        use RuleId::*;
        match self {
            CircularPackageDependency => "circular-package-dependency",
            UnusedPackageImport => "unused-package-import",
            MissingPackageImport => "missing-package-import",
            TransitiveDependencyCouldBeDirect => "transitive-dependency-could-be-direct",
            DiamondDependency => "diamond-dependency",
            GodPackageTooManyDependencies => "god-package-too-many-dependencies",
            PackageDependsOnApplicationCode => "package-depends-on-application-code",
            LayerViolation => "layer-violation",
            UnstableDependency => "unstable-dependency",
            PackageExportsTooMuch => "package-exports-too-much",
            PackageExportsTooLittle => "package-exports-too-little",
            IncompletePublicApi => "incomplete-public-api",
            InternalImplementationExposed => "internal-implementation-exposed",
            PublicFunctionWithImplementationDetailsInName => {
                "public-function-with-implementation-details-in-name"
            }
            PublicExportMissingUsageMessage => "public-export-missing-usage-message",
            MissingPackageVersion => "missing-package-version",
            MissingPackageDocumentation => "missing-package-documentation",
            UnusedPublicFunction => "unused-public-function",
            UnusedExport => "unused-export",
            DeadPackage => "dead-package",
            FunctionOnlyCalledOnce => "function-only-called-once",
            OverAbstractedApi => "over-abstracted-api",
            InternalApiUsedLikePublic => "internal-api-used-like-public",
            DeprecatedApiStillUsed => "deprecated-api-still-used",
            DuplicateSymbolDefinition => "duplicate-symbol-definition",
            SymbolRedefinitionAfterImport => "symbol-redefinition-after-import",
            PackageVersionMismatch => "package-version-mismatch",
            PackageLoadedButNotListed => "package-loaded-but-not-listed",
            InconsistentParameterNamesAcrossOverloads => {
                "inconsistent-parameter-names-across-overloads"
            }
            OrphanedTestFile => "orphaned-test-file",
            ImplementationWithoutTests => "implementation-without-tests",
            TestFunctionInProductionCode => "test-function-in-production-code",
            InconsistentPackageNaming => "inconsistent-package-naming",
            PackageTooLarge => "package-too-large",
            PackageTooSmall => "package-too-small",
            CommentedOutPackageLoad => "commented-out-package-load",
            ConditionalPackageLoad => "conditional-package-load",
            PublicApiOutsidePackageContext => "public-api-outside-package-context",
            PrivateSymbolUsedExternally => "private-symbol-used-externally",
        }
    }

    pub fn from_key(key: &str) -> Option<RuleId> {
        Self::all().iter().copied().find(|r| r.key() == key)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One reported issue. Immutable once built; consumed exactly once by the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Source unit identifier.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    pub rule: RuleId,
    pub message: String,
}

impl Finding {
    pub fn new(file: impl Into<String>, line: u32, rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: line.max(1),
            rule,
            message: message.into(),
        }
    }
}
