//! The `scan` use case: load inputs, run the engine, produce a report.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use pathguard_domain::allowlist::AllowListIndex;
use pathguard_domain::resolver::Resolver;
use pathguard_domain::rules::Rule;
use pathguard_domain::Scanner;
use pathguard_settings::{Overrides, PathguardConfigV1};
use pathguard_types::{ScanData, ScanReport, ToolMeta, SCHEMA_REPORT_V1};
use time::OffsetDateTime;
use tracing::info;

/// Input for the scan use case.
#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    /// Item inventory to triage.
    pub items_path: &'a Utf8Path,
    /// Known-good executable list; `None` disables the allow-list check.
    pub allowlist_path: Option<&'a Utf8Path>,
    /// Rule batch files, validated independently, all-or-nothing.
    pub rules_paths: &'a [Utf8PathBuf],
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Run the scan use case: resolve config, validate rules, build the
/// allow-list index, scan, and wrap the outcome in a report envelope.
///
/// Configuration and allow-list problems are fatal and surface here,
/// before any scanning work; per-item errors only show up in the report's
/// error tally.
pub fn run_scan(input: ScanInput<'_>) -> anyhow::Result<ScanReport> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        PathguardConfigV1::default()
    } else {
        pathguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let mut resolved =
        pathguard_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    // No allow-list source means no allow-list check.
    if input.allowlist_path.is_none() {
        resolved.scan.check_allowlist = false;
    }

    let resolver = Resolver::new(resolved.aliases);

    let mut rules: Vec<Rule> = Vec::new();
    for (path, text) in pathguard_sources::read_rule_batches(input.rules_paths)? {
        let batch = pathguard_settings::parse_rule_batch(&text)
            .with_context(|| format!("validate rule batch: {path}"))?;
        rules.extend(batch);
    }
    info!(rules = rules.len(), "rule batches validated");

    let index = match (resolved.scan.check_allowlist, input.allowlist_path) {
        (true, Some(path)) => {
            let entries = pathguard_sources::read_allowlist(path)?;
            AllowListIndex::build(entries, &resolver)
                .with_context(|| format!("build allow-list index: {path}"))?
        }
        _ => AllowListIndex::default(),
    };

    let items = pathguard_sources::read_items(input.items_path)?;
    info!(items = items.len(), "item inventory loaded");

    let scanner = Scanner::new(resolved.scan);
    let outcome = scanner
        .scan(&items, &resolver, &index, &rules)
        .context("dispatch scan")?;

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    let data = ScanData {
        items_scanned: items.len() as u64,
        rules_loaded: rules.len() as u32,
        allowlist_directories: index.directory_count() as u32,
        flagged: outcome.results.len() as u64,
        error_count: outcome.error_count,
        had_errors: outcome.had_errors,
    };

    Ok(ScanReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "pathguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        duration_ms: Some(duration_ms),
        results: outcome.results,
        data,
    })
}

/// Exit code for a finished scan: 0 clean, 2 when some items could not be
/// evaluated and the report may be incomplete.
pub fn report_exit_code(report: &ScanReport) -> i32 {
    if report.data.had_errors {
        2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("create temp dir");
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
            Self { _dir: dir, root }
        }

        fn write(&self, name: &str, content: &str) -> Utf8PathBuf {
            let path = self.root.join(name);
            fs::write(&path, content).expect("write fixture");
            path
        }
    }

    #[test]
    fn scan_flags_unexpected_binary_and_rule_match() {
        let fx = Fixture::new();
        let items = fx.write(
            "items.txt",
            "# header\nc:\\windows\\system32\\cmd.exe\nc:\\windows\\system32\\evil.exe\nc:\\users\\a\\temp\\payload.exe\n",
        );
        let allowlist = fx.write("winexe.txt", "c:\\windows\\system32\\cmd.exe\n");
        let rules = fx.write(
            "rules.json",
            r#"[{"name": "temp_exe", "and": true, "conditions": [
                {"criteria": "contains", "value": "temp"},
                {"element": "base", "criteria": "ends", "value": ".exe"}
            ]}]"#,
        );

        let report = run_scan(ScanInput {
            items_path: &items,
            allowlist_path: Some(&allowlist),
            rules_paths: &[rules],
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run scan");

        assert_eq!(report.schema, SCHEMA_REPORT_V1);
        assert_eq!(report.data.items_scanned, 3);
        assert_eq!(report.data.flagged, 2);
        assert!(!report.data.had_errors);
        assert_eq!(report_exit_code(&report), 0);

        assert_eq!(report.results[0].item, r"c:\windows\system32\evil.exe");
        assert_eq!(report.results[0].matches, vec!["NoWin".to_string()]);
        assert_eq!(report.results[1].item, r"c:\users\a\temp\payload.exe");
        assert_eq!(report.results[1].matches, vec!["temp_exe".to_string()]);
    }

    #[test]
    fn item_errors_set_the_error_tally_and_exit_code() {
        let fx = Fixture::new();
        let items = fx.write(
            "items.txt",
            "%mystery%\\bin\\x.exe\nc:\\windows\\system32\\evil.exe\n",
        );
        let allowlist = fx.write("winexe.txt", "c:\\windows\\system32\\cmd.exe\n");

        let report = run_scan(ScanInput {
            items_path: &items,
            allowlist_path: Some(&allowlist),
            rules_paths: &[],
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run scan");

        assert_eq!(report.data.error_count, 1);
        assert!(report.data.had_errors);
        assert_eq!(report.data.flagged, 1);
        assert_eq!(report_exit_code(&report), 2);
    }

    #[test]
    fn invalid_rule_batch_is_fatal_before_scanning() {
        let fx = Fixture::new();
        let items = fx.write("items.txt", "c:\\temp\\x.exe\n");
        let rules = fx.write(
            "rules.json",
            r#"[{"name": "bad", "conditions": [{"criteria": "glob", "value": "*"}]}]"#,
        );

        let err = run_scan(ScanInput {
            items_path: &items,
            allowlist_path: None,
            rules_paths: &[rules],
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect_err("invalid batch");
        assert!(format!("{err:#}").contains("rules.json"));
    }

    #[test]
    fn missing_allowlist_path_disables_the_check() {
        let fx = Fixture::new();
        let items = fx.write("items.txt", "c:\\windows\\system32\\evil.exe\n");

        let report = run_scan(ScanInput {
            items_path: &items,
            allowlist_path: None,
            rules_paths: &[],
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run scan");

        assert_eq!(report.data.flagged, 0);
        assert_eq!(report.data.allowlist_directories, 0);
    }

    #[test]
    fn config_text_tunes_the_scan() {
        let fx = Fixture::new();
        let items = fx.write("items.txt", "c:\\windows\\system32\\evil.exe\n");
        let allowlist = fx.write("winexe.txt", "c:\\windows\\system32\\cmd.exe\n");

        let report = run_scan(ScanInput {
            items_path: &items,
            allowlist_path: Some(&allowlist),
            rules_paths: &[],
            config_text: "workers = 1\nchunk_size = 1\n",
            overrides: Overrides::default(),
        })
        .expect("run scan");

        assert_eq!(report.data.flagged, 1);
    }
}
