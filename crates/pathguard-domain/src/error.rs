//! Error taxonomy for the engine.
//!
//! Resolution errors are item-level: the scanner catches them, tallies
//! them, and moves on. Allow-list and pool errors are fatal and surface
//! before any scanning work begins.

use thiserror::Error;

/// A single item could not be resolved into a (directory, basename) pair.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The leading `%token%` segment is not in the resolver's alias table.
    #[error("unhandled environment token {token:?} in {item:?}")]
    UnresolvedToken { token: String, item: String },

    /// Not enough segments left to name a directory and basename
    /// (reachable via the UNC prefix chop, e.g. `\\server\share`).
    #[error("path {item:?} is too short to resolve")]
    Malformed { item: String },
}

/// Allow-list construction failed; the scan must not start.
#[derive(Debug, Error)]
pub enum AllowListError {
    #[error("allow-list entry {entry:?} does not resolve to a directory and basename")]
    InvalidEntry { entry: String },

    #[error("allow-list entry could not be resolved")]
    Resolve(#[from] ResolveError),
}

/// The scan could not be dispatched.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
