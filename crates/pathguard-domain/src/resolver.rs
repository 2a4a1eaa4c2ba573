//! Path normalization: raw path string -> (directory, basename).
//!
//! Forensic path inventories arrive in heterogeneous forms: UNC shares,
//! registry-style `%token%` templates, and duplicate OS-install directories
//! left behind by in-place upgrades. All of them must canonicalize to the
//! same directory key the allow-list is indexed by.

use crate::error::ResolveError;
use std::collections::BTreeMap;

/// A normalized path split. `directory` is empty for bare filenames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    pub directory: String,
    pub basename: String,
}

/// Immutable alias configuration injected into [`Resolver`] construction.
///
/// `tokens` maps a `%token%` segment to an optional substitution inserted
/// after it (drive/root canonicalization); `None` means the token is known
/// but adds no segment. `directory_swaps` renames the first directory
/// segment (parallel-install directories such as `windows.old`).
#[derive(Clone, Debug)]
pub struct AliasTables {
    pub tokens: BTreeMap<String, Option<String>>,
    pub directory_swaps: BTreeMap<String, String>,
}

impl Default for AliasTables {
    fn default() -> Self {
        let mut tokens = BTreeMap::new();
        tokens.insert("%systemdrive%".to_string(), None);
        tokens.insert("%hot%".to_string(), Some("c:".to_string()));
        tokens.insert("%windir%".to_string(), Some("windows".to_string()));
        tokens.insert("%osdrive%".to_string(), Some("c:".to_string()));
        tokens.insert(
            "%system32%".to_string(),
            Some(r"windows\system32".to_string()),
        );
        tokens.insert(
            "%programfiles%".to_string(),
            Some("program files".to_string()),
        );

        let mut directory_swaps = BTreeMap::new();
        directory_swaps.insert("windows.old".to_string(), "windows".to_string());

        Self {
            tokens,
            directory_swaps,
        }
    }
}

/// Splits raw path strings into a directory key and basename.
///
/// Inputs are expected to be case-folded already; the resolver never folds.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    tables: AliasTables,
}

impl Resolver {
    pub fn new(tables: AliasTables) -> Self {
        Self { tables }
    }

    /// Resolve `raw` into a (directory, basename) pair.
    ///
    /// Separator detection: backslash means Windows, forward slash means
    /// POSIX, neither means a bare filename. With `expand = false` a
    /// Windows path is split at the last backslash only (coarse grouping,
    /// drive kept); with `expand = true` UNC prefixes are chopped, `%token%`
    /// segments are resolved against the alias table, and the directory key
    /// excludes the drive/token segment.
    pub fn resolve(&self, raw: &str, expand: bool) -> Result<ResolvedPath, ResolveError> {
        if raw.contains('\\') {
            return self.resolve_windows(raw, expand);
        }

        if let Some((directory, basename)) = raw.rsplit_once('/') {
            return Ok(ResolvedPath {
                directory: directory.to_string(),
                basename: basename.to_string(),
            });
        }

        Ok(ResolvedPath {
            directory: String::new(),
            basename: raw.to_string(),
        })
    }

    fn resolve_windows(&self, raw: &str, expand: bool) -> Result<ResolvedPath, ResolveError> {
        if !expand {
            let (directory, basename) = raw.rsplit_once('\\').unwrap_or(("", raw));
            return Ok(ResolvedPath {
                directory: directory.to_string(),
                basename: basename.to_string(),
            });
        }

        let mut segments: Vec<&str> = raw.split('\\').collect();

        if segments.first().is_some_and(|s| s.is_empty()) {
            // UNC: drop the empty lead plus the \\server\share prefix.
            segments = if segments.len() > 3 {
                segments.split_off(3)
            } else {
                Vec::new()
            };
        } else {
            let first = segments[0];
            if first.starts_with('%')
                && first.ends_with('%')
                && !self.tables.tokens.contains_key(first)
            {
                return Err(ResolveError::UnresolvedToken {
                    token: first.to_string(),
                    item: raw.to_string(),
                });
            }
        }

        if let Some(Some(substitution)) = segments.first().and_then(|s| self.tables.tokens.get(*s))
        {
            segments.insert(1, substitution.as_str());
        }

        if segments.len() < 2 {
            return Err(ResolveError::Malformed {
                item: raw.to_string(),
            });
        }

        if let Some(swap) = self.tables.directory_swaps.get(segments[1]) {
            segments[1] = swap.as_str();
        }

        // The drive/token segment and the basename are excluded from the key.
        let basename = segments[segments.len() - 1].to_string();
        let directory = segments[1..segments.len() - 1].join("\\");

        Ok(ResolvedPath {
            directory,
            basename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(AliasTables::default())
    }

    fn resolved(directory: &str, basename: &str) -> ResolvedPath {
        ResolvedPath {
            directory: directory.to_string(),
            basename: basename.to_string(),
        }
    }

    #[test]
    fn bare_filename_has_empty_directory() {
        let r = resolver().resolve("cmd.exe", true).expect("resolve");
        assert_eq!(r, resolved("", "cmd.exe"));
    }

    #[test]
    fn posix_splits_at_last_slash() {
        let r = resolver().resolve("/usr/bin/bash", true).expect("resolve");
        assert_eq!(r, resolved("/usr/bin", "bash"));
    }

    #[test]
    fn windows_drive_is_excluded_from_directory() {
        let r = resolver()
            .resolve(r"c:\windows\system32\cmd.exe", true)
            .expect("resolve");
        assert_eq!(r, resolved(r"windows\system32", "cmd.exe"));
    }

    #[test]
    fn coarse_mode_splits_at_last_backslash_only() {
        let r = resolver()
            .resolve(r"c:\windows\system32\cmd.exe", false)
            .expect("resolve");
        assert_eq!(r, resolved(r"c:\windows\system32", "cmd.exe"));
    }

    #[test]
    fn unc_prefix_is_chopped() {
        let r = resolver()
            .resolve(r"\\server\share\windows\system32\cmd.exe", true)
            .expect("resolve");
        assert_eq!(r, resolved(r"windows\system32", "cmd.exe"));
    }

    #[test]
    fn unc_without_remainder_is_malformed() {
        let err = resolver()
            .resolve(r"\\server\share", true)
            .expect_err("too short");
        assert!(matches!(err, ResolveError::Malformed { .. }));
    }

    #[test]
    fn known_token_inserts_substitution() {
        let r = resolver()
            .resolve(r"%windir%\system32\cmd.exe", true)
            .expect("resolve");
        assert_eq!(r, resolved(r"windows\system32", "cmd.exe"));

        // Same directory key as the drive-qualified spelling.
        let drive = resolver()
            .resolve(r"c:\windows\system32\cmd.exe", true)
            .expect("resolve");
        assert_eq!(r.directory, drive.directory);
    }

    #[test]
    fn token_without_substitution_is_dropped() {
        let r = resolver()
            .resolve(r"%systemdrive%\windows\system32\cmd.exe", true)
            .expect("resolve");
        assert_eq!(r, resolved(r"windows\system32", "cmd.exe"));
    }

    #[test]
    fn unknown_token_fails() {
        let err = resolver()
            .resolve(r"%foo%\bar\baz.exe", true)
            .expect_err("unknown token");
        assert_eq!(
            err,
            ResolveError::UnresolvedToken {
                token: "%foo%".to_string(),
                item: r"%foo%\bar\baz.exe".to_string(),
            }
        );
    }

    #[test]
    fn directory_swap_canonicalizes_parallel_install() {
        let old = resolver()
            .resolve(r"c:\windows.old\system32\foo.exe", true)
            .expect("resolve");
        let current = resolver()
            .resolve(r"c:\windows\system32\foo.exe", true)
            .expect("resolve");
        assert_eq!(old.directory, current.directory);
    }

    #[test]
    fn custom_tables_resolve_tokens_defaults_do_not() {
        let mut tables = AliasTables::default();
        tables
            .tokens
            .insert("%appdata%".to_string(), Some(r"users\appdata".to_string()));
        let custom = Resolver::new(tables);

        let r = custom
            .resolve(r"%appdata%\roaming\x.exe", true)
            .expect("resolve");
        assert_eq!(r, resolved(r"users\appdata\roaming", "x.exe"));

        assert!(resolver().resolve(r"%appdata%\roaming\x.exe", true).is_err());
    }

    #[test]
    fn file_directly_under_drive_has_empty_directory() {
        let r = resolver().resolve(r"c:\foo.exe", true).expect("resolve");
        assert_eq!(r, resolved("", "foo.exe"));
    }
}
