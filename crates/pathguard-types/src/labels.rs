//! Stable match labels.
//!
//! A flagged item carries an ordered list of labels: either the allow-list
//! sentinel below or the name of the rule that matched.

/// Sentinel label: the item's directory is covered by the allow-list but its
/// basename is not in the known-good set for that directory.
pub const LABEL_NO_WIN: &str = "NoWin";
