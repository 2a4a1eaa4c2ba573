//! File-reading adapters.
//!
//! The engine consumes case-folded strings; folding and comment filtering
//! happen here, once, at intake. Heavy lifting lives elsewhere.

#![forbid(unsafe_code)]

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};

/// Read an ordered item list: one path per line, trimmed and lowercased,
/// `#` comment lines and blank lines dropped.
pub fn read_items(path: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read item list: {path}"))?;
    Ok(parse_lines(&text))
}

/// Read an allow-list of known-good executable paths; same line format as
/// the item list. Duplicates are left in; the index collapses them.
pub fn read_allowlist(path: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read allow-list: {path}"))?;
    Ok(parse_lines(&text))
}

/// Read raw rule-batch texts, one per file. Validation is the settings
/// layer's job; each batch stays associated with its path for error
/// reporting.
pub fn read_rule_batches(paths: &[Utf8PathBuf]) -> anyhow::Result<Vec<(Utf8PathBuf, String)>> {
    let mut batches = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read rule batch: {path}"))?;
        batches.push((path.clone(), text));
    }
    Ok(batches)
}

fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}
