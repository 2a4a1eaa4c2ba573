use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for pathguard reports.
pub const SCHEMA_REPORT_V1: &str = "pathguard.report.v1";

/// One flagged item and the ordered list of labels that fired for it.
///
/// Labels are either [`crate::labels::LABEL_NO_WIN`] or a rule name, in
/// evaluation order (allow-list check first, then rules in declaration
/// order). Items with no matches are never emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchResult {
    pub item: String,
    pub matches: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Pathguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ScanData {
    pub items_scanned: u64,
    pub rules_loaded: u32,

    /// Number of directories covered by the allow-list (0 when the
    /// allow-list check is disabled).
    pub allowlist_directories: u32,

    pub flagged: u64,

    /// Items that could not be fully evaluated. A non-zero count means the
    /// result list may be incomplete.
    pub error_count: u64,
    pub had_errors: bool,
}

/// The report envelope.
///
/// A stable outer shape so downstream tooling can trend scans without
/// caring which checks produced the labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub results: Vec<MatchResult>,
    pub data: ScanData,
}
