//! Known-good executable inventory, indexed by directory key.

use crate::error::AllowListError;
use crate::resolver::Resolver;
use std::collections::{BTreeMap, BTreeSet};

/// Result of an allow-list lookup.
///
/// `Unknown` is distinct from `NotAllowed`: the allow-list has no coverage
/// for the directory, so flagging there would be a false-positive magnet.
/// Only `NotAllowed` produces a flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    Allowed,
    NotAllowed,
    Unknown,
}

/// Immutable directory -> basenames mapping, built once before scanning.
#[derive(Clone, Debug, Default)]
pub struct AllowListIndex {
    directories: BTreeMap<String, BTreeSet<String>>,
}

impl AllowListIndex {
    /// Build the index from known-good executable paths.
    ///
    /// Entries are resolved with expansion so `%windir%`-style and
    /// `windows.old`-style spellings land on the same directory key. An
    /// entry that resolves to an empty directory or basename aborts the
    /// build. Duplicate entries collapse.
    pub fn build<I, S>(entries: I, resolver: &Resolver) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut directories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for entry in entries {
            let entry = entry.as_ref();
            let resolved = resolver.resolve(entry, true)?;
            if resolved.directory.is_empty() || resolved.basename.is_empty() {
                return Err(AllowListError::InvalidEntry {
                    entry: entry.to_string(),
                });
            }
            directories
                .entry(resolved.directory)
                .or_default()
                .insert(resolved.basename);
        }

        Ok(Self { directories })
    }

    pub fn lookup(&self, directory: &str, basename: &str) -> Coverage {
        match self.directories.get(directory) {
            None => Coverage::Unknown,
            Some(basenames) if basenames.contains(basename) => Coverage::Allowed,
            Some(_) => Coverage::NotAllowed,
        }
    }

    /// Number of directories the allow-list covers.
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}
