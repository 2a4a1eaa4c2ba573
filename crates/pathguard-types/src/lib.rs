//! Stable DTOs and labels used across the pathguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted scan report
//! - stable match-label and schema constants
//!
//! No logic lives here; the engine is in `pathguard-domain`.

#![forbid(unsafe_code)]

pub mod labels;
pub mod report;

pub use report::{MatchResult, ScanData, ScanReport, ToolMeta, SCHEMA_REPORT_V1};
