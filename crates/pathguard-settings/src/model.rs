use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `pathguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so
/// forward-compat is easy. Validation happens during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathguardConfigV1 {
    /// Optional schema string for tooling (`pathguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Worker-pool size for the scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Items per chunk task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    #[serde(default)]
    pub allowlist: AllowlistConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AllowlistConfig {
    /// Run the allow-list check (rules run either way).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Extra alias-table entries merged over the built-in tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolverConfig {
    /// `%token%` -> substitution. An empty substitution marks a token that
    /// is known but inserts no segment.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,

    /// Directory renames applied to the first directory segment
    /// (e.g. parallel-install directories).
    #[serde(default)]
    pub swaps: BTreeMap<String, String>,
}
