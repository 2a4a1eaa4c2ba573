//! Chunked, concurrent scan dispatch with per-item fault isolation.

use crate::allowlist::{AllowListIndex, Coverage};
use crate::error::{ResolveError, ScanError};
use crate::resolver::Resolver;
use crate::rules::Rule;
use pathguard_types::labels::LABEL_NO_WIN;
use pathguard_types::MatchResult;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, warn};

#[derive(Clone, Copy, Debug)]
pub struct ScanConfig {
    /// Bounded worker-pool size.
    pub workers: usize,
    /// Items per chunk; each chunk is processed sequentially by one task.
    pub chunk_size: usize,
    /// Run the allow-list check, independently of rule checks.
    pub check_allowlist: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            chunk_size: 1000,
            check_allowlist: true,
        }
    }
}

/// Aggregate result of one scan.
#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    pub results: Vec<MatchResult>,
    pub error_count: u64,
    pub had_errors: bool,
}

#[derive(Debug, Default)]
struct ChunkOutcome {
    results: Vec<MatchResult>,
    error_count: u64,
}

/// Applies the allow-list check and every validated rule over an item
/// sequence, on a bounded worker pool.
#[derive(Clone, Debug, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan `items`, returning every flagged item plus an error tally.
    ///
    /// The index, resolver, and rule list are read-only for the duration of
    /// the scan. Chunk outcomes are merged in chunk index order (rayon's
    /// ordered collect), so output order is reproducible for any worker
    /// count; order within a chunk is the item order.
    pub fn scan(
        &self,
        items: &[String],
        resolver: &Resolver,
        index: &AllowListIndex,
        rules: &[Rule],
    ) -> Result<ScanOutcome, ScanError> {
        if rules.is_empty() && !self.config.check_allowlist {
            debug!("no allow-list check and no rules, nothing to do");
            return Ok(ScanOutcome::default());
        }

        let chunk_size = self.config.chunk_size.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()?;

        let outcomes: Vec<ChunkOutcome> = pool.install(|| {
            items
                .par_chunks(chunk_size)
                .map(|chunk| self.process_chunk(chunk, resolver, index, rules))
                .collect()
        });

        let mut merged = ScanOutcome::default();
        for outcome in outcomes {
            merged.results.extend(outcome.results);
            merged.error_count += outcome.error_count;
        }
        merged.had_errors = merged.error_count > 0;

        debug!(
            flagged = merged.results.len(),
            errors = merged.error_count,
            "scan finished"
        );
        Ok(merged)
    }

    fn process_chunk(
        &self,
        chunk: &[String],
        resolver: &Resolver,
        index: &AllowListIndex,
        rules: &[Rule],
    ) -> ChunkOutcome {
        let mut outcome = ChunkOutcome::default();

        for item in chunk {
            // Guarded per item: a failure is logged and tallied, and the
            // chunk keeps its partial results.
            let evaluated = catch_unwind(AssertUnwindSafe(|| {
                self.evaluate_item(item, resolver, index, rules)
            }));

            match evaluated {
                Ok(Ok(Some(result))) => outcome.results.push(result),
                Ok(Ok(None)) => {}
                Ok(Err(err)) => {
                    warn!(item = item.as_str(), %err, "error whilst processing item");
                    outcome.error_count += 1;
                }
                Err(_) => {
                    error!(item = item.as_str(), "panic whilst processing item");
                    outcome.error_count += 1;
                }
            }
        }

        outcome
    }

    fn evaluate_item(
        &self,
        item: &str,
        resolver: &Resolver,
        index: &AllowListIndex,
        rules: &[Rule],
    ) -> Result<Option<MatchResult>, ResolveError> {
        let resolved = resolver.resolve(item, true)?;
        let mut matches = Vec::new();

        // Allow-list first, then the rules in declaration order.
        if self.config.check_allowlist
            && index.lookup(&resolved.directory, &resolved.basename) == Coverage::NotAllowed
        {
            matches.push(LABEL_NO_WIN.to_string());
        }

        for rule in rules {
            if rule.matches(item, &resolved.directory, &resolved.basename) {
                matches.push(rule.name.clone());
            }
        }

        if matches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(MatchResult {
                item: item.to_string(),
                matches,
            }))
        }
    }
}
