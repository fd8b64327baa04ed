//! Configuration-file loading.
//!
//! Config files are line-oriented `KEY: value` documents. `#`-prefixed lines
//! are comments; blank lines and lines without a colon are skipped. Loading
//! a file means writing its pairs into the environment store under their
//! `UPPER_SNAKE` spelling, which is what guarantees that a later
//! [`getenv`](crate::getenv) lookup finds file-sourced values through its
//! second candidate.
//!
//! Config files are optional by design: a missing or unreadable file
//! contributes nothing and is not an error. Only the pairs actually written
//! are reported back, so callers can see what a file changed.
//!
//! [`apply_legacy_env_file`] handles the deprecated `KEY=value` format via
//! dotenvy, at the lowest priority — it never overwrites existing values.

use std::collections::BTreeMap;
use std::path::Path;

use crate::case::to_upper_snake;
use crate::env::EnvStore;

/// Parse a `KEY: value` document into pairs, in file order.
///
/// Keys and values are trimmed. Comment (`#`), blank, and colon-less lines
/// are skipped. The value may itself contain colons; only the first one
/// separates.
pub fn parse_document(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Load a config file and apply its pairs to the environment store.
///
/// Every key is normalized to `UPPER_SNAKE` before writing. When
/// `override_existing` is false, keys already present in the store are left
/// alone (the process environment wins). Returns the pairs actually
/// written, keyed by their normalized spelling.
///
/// A missing or unreadable file yields an empty map; that is the intended
/// way to express "no file-sourced configuration".
pub fn apply_config_file(
    store: &dyn EnvStore,
    path: &Path,
    override_existing: bool,
) -> BTreeMap<String, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "config file not loaded");
            return BTreeMap::new();
        }
    };

    let mut applied = BTreeMap::new();
    for (key, value) in parse_document(&content) {
        let upper = to_upper_snake(&key);
        if override_existing || !store.contains(&upper) {
            store.set(&upper, &value);
            applied.insert(upper, value);
        }
    }
    applied
}

/// Load a deprecated `KEY=value` env file at the lowest priority.
///
/// Existing store values are never overwritten. Any loader failure —
/// missing file, malformed line — is logged and swallowed; the result is
/// simply whatever could be applied.
pub fn apply_legacy_env_file(store: &dyn EnvStore, path: &Path) -> BTreeMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "legacy env file not loaded");
            return BTreeMap::new();
        }
    };

    let mut applied = BTreeMap::new();
    for item in iter {
        let (key, value) = match item {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping malformed legacy entry");
                continue;
            }
        };
        let upper = to_upper_snake(&key);
        if !store.contains(&upper) {
            store.set(&upper, &value);
            applied.insert(upper, value);
        }
    }
    applied
}
