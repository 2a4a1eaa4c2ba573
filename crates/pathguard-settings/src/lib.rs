//! Config parsing and rule-batch validation.
//!
//! This crate is intentionally IO-free: it parses and resolves
//! configuration provided as strings. Rule batches validate fail-closed:
//! one invalid rule rejects its whole batch.

#![forbid(unsafe_code)]

mod model;
mod resolve;
mod rules;

pub use model::{AllowlistConfig, PathguardConfigV1, ResolverConfig};
pub use resolve::{resolve_config, Overrides, ResolvedConfig};
pub use rules::parse_rule_batch;

/// Parse `pathguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PathguardConfigV1> {
    let cfg: PathguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}
