//! Render use cases: stdout text lines and the JSON report artifact.

use anyhow::Context;
use camino::Utf8Path;
use pathguard_types::ScanReport;

/// One line per flagged item: `item: label, label`.
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        out.push_str(&result.item);
        out.push_str(": ");
        out.push_str(&result.matches.join(", "));
        out.push('\n');
    }
    out
}

pub fn serialize_report(report: &ScanReport) -> anyhow::Result<String> {
    let mut data = serde_json::to_string_pretty(report).context("serialize report")?;
    data.push('\n');
    Ok(data)
}

/// Write the JSON report, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &ScanReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}
