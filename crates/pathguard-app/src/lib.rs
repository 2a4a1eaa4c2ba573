//! Use case orchestration for pathguard.
//!
//! This crate provides the application layer: use cases that coordinate
//! the settings, sources, and domain layers. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing and
//! exit codes.

#![forbid(unsafe_code)]

mod render;
mod scan;

pub use render::{render_text, serialize_report, write_report};
pub use scan::{report_exit_code, run_scan, ScanInput};
