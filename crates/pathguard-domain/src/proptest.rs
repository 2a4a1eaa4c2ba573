//! Property-based tests for the engine.
//!
//! These verify invariants around:
//! - Chunking completeness (no duplicates, no omissions, any chunk size)
//! - Scan determinism across worker counts
//! - Resolver totality over arbitrary inputs

use crate::allowlist::AllowListIndex;
use crate::scanner::{ScanConfig, Scanner};
use crate::test_support::resolver;
use proptest::prelude::*;

fn covered_items(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!(r"c:\windows\system32\unexpected{i:04}.exe"))
        .collect()
}

fn system32_index() -> AllowListIndex {
    AllowListIndex::build([r"c:\windows\system32\cmd.exe"], &resolver()).expect("build index")
}

proptest! {
    /// Every item lands in exactly one chunk: with N items that all flag,
    /// the output has exactly N results, in item order, for any chunk size
    /// and worker count.
    #[test]
    fn chunking_is_complete(
        n in 0usize..400,
        chunk_size in 1usize..97,
        workers in 1usize..9,
    ) {
        let items = covered_items(n);
        let scanner = Scanner::new(ScanConfig { workers, chunk_size, check_allowlist: true });

        let outcome = scanner
            .scan(&items, &resolver(), &system32_index(), &[])
            .expect("scan");

        prop_assert_eq!(outcome.results.len(), n);
        prop_assert_eq!(outcome.error_count, 0);
        let got: Vec<&str> = outcome.results.iter().map(|r| r.item.as_str()).collect();
        let expected: Vec<&str> = items.iter().map(|s| s.as_str()).collect();
        prop_assert_eq!(got, expected);
    }

    /// Identical inputs produce identical outputs regardless of worker count.
    #[test]
    fn scan_is_deterministic_across_worker_counts(
        n in 0usize..200,
        chunk_size in 1usize..64,
        workers_a in 1usize..9,
        workers_b in 1usize..9,
    ) {
        let items = covered_items(n);
        let index = system32_index();

        let a = Scanner::new(ScanConfig { workers: workers_a, chunk_size, check_allowlist: true })
            .scan(&items, &resolver(), &index, &[])
            .expect("scan a");
        let b = Scanner::new(ScanConfig { workers: workers_b, chunk_size, check_allowlist: true })
            .scan(&items, &resolver(), &index, &[])
            .expect("scan b");

        prop_assert_eq!(a.results, b.results);
        prop_assert_eq!(a.error_count, b.error_count);
    }

    /// The resolver returns a value or a typed error for any printable
    /// input; it never panics.
    #[test]
    fn resolver_is_total(raw in "[ -~]{0,64}") {
        let _ = resolver().resolve(&raw, true);
        let coarse = resolver().resolve(&raw, false);
        prop_assert!(coarse.is_ok());
    }
}
