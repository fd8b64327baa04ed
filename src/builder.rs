//! The layered merge pipeline and its builder entry point.
//!
//! [`ClenvBuilder::load`] runs the seven ordered steps that turn four
//! configuration sources into one flat result. Order matters because every
//! step before the final parse may mutate the shared environment store, and
//! later steps read what earlier ones wrote:
//!
//! 1. Legacy `KEY=value` file (deprecated, opt-in, never overrides)
//! 2. Default config file (`.lenv` unless changed)
//! 3. Pre-scan of the argument vector for `--configuration`/`-c`
//! 4. Override config file (always overrides)
//! 5. Final parser construction — reserved `configuration` option
//!    registered, built-in help/version disabled, user callback applied
//!    with the environment resolver
//! 6. Final parse — the only step whose failure reaches the caller
//! 7. Key normalization to camelCase
//!
//! The net precedence, highest first: explicit command-line argument,
//! resolver-derived default (which observes the override file), override
//! file, default file, legacy file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::case::to_camel;
use crate::env::{EnvResolver, EnvStore, ProcessEnv};
use crate::error::ClenvError;
use crate::file;
use crate::flags::{self, FlagSet};
use crate::types::Value;

/// Entry point for building a layered configuration.
pub struct Clenv;

impl Clenv {
    pub fn builder() -> ClenvBuilder {
        ClenvBuilder::new()
    }
}

type DefineFn = Box<dyn FnOnce(FlagSet, &EnvResolver) -> FlagSet>;

/// Builder for the merge pipeline.
///
/// Everything has a working default: the real process environment, a
/// `.lenv` default file with override semantics, the real argument vector,
/// strict parsing, and no options beyond the reserved `configuration` flag.
pub struct ClenvBuilder {
    program: Option<String>,
    store: Box<dyn EnvStore>,
    config_file: Option<PathBuf>,
    override_existing: bool,
    legacy_file: Option<PathBuf>,
    env_enabled: bool,
    strict: bool,
    args: Option<Vec<String>>,
    define: Option<DefineFn>,
}

impl ClenvBuilder {
    fn new() -> Self {
        Self {
            program: None,
            store: Box::new(ProcessEnv),
            config_file: Some(PathBuf::from(".lenv")),
            override_existing: true,
            legacy_file: None,
            env_enabled: true,
            strict: true,
            args: None,
            define: None,
        }
    }

    /// Parser name used in diagnostics (default: derived from `argv[0]`).
    pub fn program(mut self, name: &str) -> Self {
        self.program = Some(name.to_string());
        self
    }

    /// Inject the environment store (default: the process environment).
    ///
    /// Pass an [`Arc<MemoryEnv>`](crate::MemoryEnv) to keep a handle on the
    /// store for inspection after the load.
    pub fn env_store(mut self, store: impl EnvStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Path of the default configuration file (default: `.lenv`).
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skip the default configuration file entirely.
    pub fn no_config_file(mut self) -> Self {
        self.config_file = None;
        self
    }

    /// Whether the default file overwrites values already in the store
    /// (default: true). The override file named on the command line always
    /// overwrites, regardless of this setting.
    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// Load a deprecated `KEY=value` env file before everything else, at the
    /// lowest priority. Disabled unless called.
    pub fn legacy_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_file = Some(path.into());
        self
    }

    /// Hand the flag-definition callback a resolver that ignores the
    /// environment and always returns the supplied default.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Reject unknown arguments (default: true).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Explicit argument vector, including the program name (default:
    /// `std::env::args()`).
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// The flag-definition callback. It receives the [`FlagSet`] with the
    /// reserved `configuration` option already registered, plus the
    /// [`EnvResolver`] — which at call time already observes everything the
    /// file loaders wrote.
    pub fn options(mut self, define: impl FnOnce(FlagSet, &EnvResolver) -> FlagSet + 'static) -> Self {
        self.define = Some(Box::new(define));
        self
    }

    /// Run the pipeline and produce the resolved configuration.
    ///
    /// Missing files at any step contribute nothing; the only error is a
    /// rejected argument vector, surfaced verbatim as [`ClenvError::Arg`].
    pub fn load(self) -> Result<ResolvedConfig, ClenvError> {
        let argv = self
            .args
            .unwrap_or_else(|| std::env::args().collect());
        let program = self.program.unwrap_or_else(|| program_from(&argv));
        let store = self.store.as_ref();

        // 1. Legacy source, lowest priority.
        if let Some(path) = &self.legacy_file {
            file::apply_legacy_env_file(store, path);
        }

        // 2. Default configuration file.
        if let Some(path) = &self.config_file {
            file::apply_config_file(store, path, self.override_existing);
        }

        // 3-4. Pre-scan for an override path; an explicitly requested file
        // always overrides.
        if let Some(path) = flags::prescan_override_path(&argv) {
            file::apply_config_file(store, Path::new(&path), true);
        }

        // 5. Final parser: reserved flag first, then the user's options.
        // The resolver sees the store as mutated by steps 1-4.
        let mut flag_set = FlagSet::new()
            .option(flags::config_flag())
            .strict(self.strict);
        let resolver = if self.env_enabled {
            EnvResolver::new(store)
        } else {
            EnvResolver::disabled(store)
        };
        if let Some(define) = self.define {
            flag_set = define(flag_set, &resolver);
        }

        // 6-7. Parse and normalize. Parse failures propagate untouched.
        let values = flag_set.parse(&program, &argv)?;
        Ok(ResolvedConfig { values })
    }
}

fn program_from(argv: &[String]) -> String {
    argv.first()
        .and_then(|arg0| Path::new(arg0).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("clenv")
        .to_string()
}

/// The final flat configuration: camelCase keys to typed values.
///
/// Keys appear under a single camel spelling only — an option declared as
/// `api-key` shows up as `apiKey` and nothing else. The accessors normalize
/// the lookup key, so any spelling with explicit separators finds the value.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ResolvedConfig {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values
            .get(key)
            .or_else(|| self.values.get(&to_camel(key)))
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(camelKey, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;
    use crate::flags::FlagDef;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("test")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    fn port_options(flags: FlagSet, env: &EnvResolver) -> FlagSet {
        flags.option(FlagDef::int("port").default(env.int("APP_PORT", 3000)))
    }

    #[test]
    fn defaults_only() {
        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .args(argv(&[]))
            .options(port_options)
            .load()
            .unwrap();
        assert_eq!(config.int("port"), Some(3000));
    }

    #[test]
    fn default_file_feeds_resolver_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lenv");
        fs::write(&path, "APP_PORT: 5000\n").unwrap();

        let store = Arc::new(MemoryEnv::new());
        let config = Clenv::builder()
            .env_store(Arc::clone(&store))
            .config_file(&path)
            .args(argv(&[]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(5000));
        // The file's pairs are visible in the store after the load.
        assert_eq!(store.get("APP_PORT").as_deref(), Some("5000"));
    }

    #[test]
    fn override_file_beats_default_file() {
        let dir = TempDir::new().unwrap();
        let default_path = dir.path().join(".lenv");
        let override_path = dir.path().join("override.lenv");
        fs::write(&default_path, "APP_PORT: 5000\n").unwrap();
        fs::write(&override_path, "APP_PORT: 9000\n").unwrap();

        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .config_file(&default_path)
            .args(argv(&["--configuration", override_path.to_str().unwrap()]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(9000));
    }

    #[test]
    fn cli_argument_beats_every_file() {
        let dir = TempDir::new().unwrap();
        let default_path = dir.path().join(".lenv");
        let override_path = dir.path().join("override.lenv");
        fs::write(&default_path, "APP_PORT: 5000\n").unwrap();
        fs::write(&override_path, "APP_PORT: 9000\n").unwrap();

        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .config_file(&default_path)
            .args(argv(&[
                "--configuration",
                override_path.to_str().unwrap(),
                "--port",
                "7000",
            ]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(7000));
    }

    #[test]
    fn preexisting_env_wins_without_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lenv");
        fs::write(&path, "APP_PORT: 5000\n").unwrap();

        let store = Arc::new(MemoryEnv::new());
        store.set("APP_PORT", "8888");

        let config = Clenv::builder()
            .env_store(Arc::clone(&store))
            .config_file(&path)
            .override_existing(false)
            .args(argv(&[]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(8888));
        assert_eq!(store.get("APP_PORT").as_deref(), Some("8888"));
    }

    #[test]
    fn default_file_overrides_preexisting_env_by_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lenv");
        fs::write(&path, "APP_PORT: 5000\n").unwrap();

        let store = Arc::new(MemoryEnv::new());
        store.set("APP_PORT", "8888");

        let config = Clenv::builder()
            .env_store(Arc::clone(&store))
            .config_file(&path)
            .args(argv(&[]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(5000));
    }

    #[test]
    fn legacy_file_is_lowest_priority() {
        let dir = TempDir::new().unwrap();
        let legacy_path = dir.path().join(".env");
        let default_path = dir.path().join(".lenv");
        fs::write(&legacy_path, "APP_PORT=4000\nLEGACY_ONLY=here\n").unwrap();
        fs::write(&default_path, "APP_PORT: 5000\n").unwrap();

        let store = Arc::new(MemoryEnv::new());
        let config = Clenv::builder()
            .env_store(Arc::clone(&store))
            .legacy_env_file(&legacy_path)
            .config_file(&default_path)
            .args(argv(&[]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(5000));
        assert_eq!(store.get("LEGACY_ONLY").as_deref(), Some("here"));
    }

    #[test]
    fn missing_files_are_silent() {
        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .config_file("/nonexistent/.lenv")
            .legacy_env_file("/nonexistent/.env")
            .args(argv(&["-c", "/nonexistent/override.lenv"]))
            .options(port_options)
            .load()
            .unwrap();
        assert_eq!(config.int("port"), Some(3000));
    }

    #[test]
    fn result_keys_are_single_camel_spellings() {
        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .args(argv(&["--api-key", "secret"]))
            .options(|flags, _| flags.option(FlagDef::string("api-key")))
            .load()
            .unwrap();

        let keys: Vec<&str> = config.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["apiKey"]);
        // Accessors accept any separator spelling.
        assert_eq!(config.str("api-key"), Some("secret"));
        assert_eq!(config.str("apiKey"), Some("secret"));
        assert_eq!(config.str("API_KEY"), Some("secret"));
    }

    #[test]
    fn configuration_flag_appears_in_result_when_passed() {
        let dir = TempDir::new().unwrap();
        let override_path = dir.path().join("override.lenv");
        fs::write(&override_path, "X: 1\n").unwrap();

        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .args(argv(&["-c", override_path.to_str().unwrap()]))
            .load()
            .unwrap();

        assert_eq!(
            config.str("configuration"),
            override_path.to_str()
        );
    }

    #[test]
    fn user_version_option_is_not_shadowed() {
        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .args(argv(&["--version", "0.8.36"]))
            .options(|flags, _| flags.option(FlagDef::string("version")))
            .load()
            .unwrap();

        assert_eq!(config.str("version"), Some("0.8.36"));
    }

    #[test]
    fn strict_parse_failure_propagates() {
        let result = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .args(argv(&["--no-such-flag"]))
            .options(port_options)
            .load();

        assert!(matches!(result, Err(ClenvError::Arg(_))));
    }

    #[test]
    fn lenient_parse_ignores_unknown() {
        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .strict(false)
            .args(argv(&["--no-such-flag", "x"]))
            .options(port_options)
            .load()
            .unwrap();
        assert_eq!(config.int("port"), Some(3000));
    }

    #[test]
    fn no_env_gives_the_callback_a_blind_resolver() {
        let store = Arc::new(MemoryEnv::new());
        store.set("APP_PORT", "5000");

        let config = Clenv::builder()
            .env_store(Arc::clone(&store))
            .no_config_file()
            .no_env()
            .args(argv(&[]))
            .options(port_options)
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(3000));
    }

    #[test]
    fn mixed_kinds_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lenv");
        fs::write(&path, "API_KEY: from-file\nVERBOSE: yes\n").unwrap();

        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .config_file(&path)
            .args(argv(&["--port", "7000"]))
            .options(|flags, env| {
                flags
                    .option(FlagDef::int("port").default(env.int("APP_PORT", 3000)))
                    .option(FlagDef::string("api-key").default(env.string("API_KEY", "")))
                    .option(FlagDef::bool("verbose").default(env.bool("VERBOSE", false)))
            })
            .load()
            .unwrap();

        assert_eq!(config.int("port"), Some(7000));
        assert_eq!(config.str("apiKey"), Some("from-file"));
        assert_eq!(config.bool("verbose"), Some(true));
    }

    #[test]
    fn resolved_config_serializes_flat() {
        let config = Clenv::builder()
            .env_store(MemoryEnv::new())
            .no_config_file()
            .args(argv(&[]))
            .options(|flags, _| {
                flags
                    .option(FlagDef::int("port").default(3000i64))
                    .option(FlagDef::bool("verbose").default(false))
            })
            .load()
            .unwrap();

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["port"], 3000);
        assert_eq!(json["verbose"], false);
    }
}
