//! CLI entry point for pathguard.
//!
//! This module is intentionally thin: it handles argument parsing, logging
//! setup, and exit codes. All business logic lives in the `pathguard-app`
//! crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use pathguard_app::{render_text, report_exit_code, run_scan, write_report, ScanInput};
use pathguard_settings::Overrides;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pathguard",
    version,
    about = "Path-inventory triage for incident response"
)]
struct Cli {
    /// Path to pathguard config TOML.
    #[arg(long, default_value = "pathguard.toml")]
    config: Utf8PathBuf,

    /// Log at debug level (otherwise RUST_LOG applies, default info).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Triage an item inventory against the allow-list and rules.
    Scan {
        /// Text file of file paths to check.
        #[arg(long, short)]
        file: Utf8PathBuf,

        /// Text file of known-good Windows executables; omit to skip the
        /// allow-list check.
        #[arg(long)]
        allowlist: Option<Utf8PathBuf>,

        /// Rule batch JSON files (repeatable).
        #[arg(long)]
        rules: Vec<Utf8PathBuf>,

        /// Override worker-pool size.
        #[arg(long)]
        workers: Option<usize>,

        /// Override items per chunk task.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Where to write the JSON report (not written if omitted).
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("pathguard error: {err:#}");
            1
        }
    };
    if code != 0 {
        std::process::exit(code);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Scan {
            file,
            allowlist,
            rules,
            workers,
            chunk_size,
            report_out,
        } => cmd_scan(
            cli,
            file,
            allowlist.as_deref(),
            rules,
            *workers,
            *chunk_size,
            report_out.as_deref(),
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_scan(
    cli: &Cli,
    file: &Utf8Path,
    allowlist: Option<&Utf8Path>,
    rules: &[Utf8PathBuf],
    workers: Option<usize>,
    chunk_size: Option<usize>,
    report_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    // A missing config file is allowed; defaults apply.
    let config_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

    let report = run_scan(ScanInput {
        items_path: file,
        allowlist_path: allowlist,
        rules_paths: rules,
        config_text: &config_text,
        overrides: Overrides {
            workers,
            chunk_size,
            check_allowlist: None,
        },
    })?;

    print!("{}", render_text(&report));

    if let Some(out) = report_out {
        write_report(out, &report).context("write report json")?;
    }

    if report.data.had_errors {
        eprintln!(
            "pathguard: {} item(s) could not be evaluated; the report may be incomplete",
            report.data.error_count
        );
    }

    Ok(report_exit_code(&report))
}
