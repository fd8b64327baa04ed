//! The environment store and the convention-aware resolver.
//!
//! The environment is the shared middle layer of the priority chain: config
//! files write into it, option defaults read out of it. Rather than touching
//! `std::env` directly everywhere, the store is an injected capability
//! ([`EnvStore`]) so the whole pipeline can run against an in-memory map in
//! tests — [`MemoryEnv`] — or the real process environment — [`ProcessEnv`].
//!
//! [`getenv`] looks a key up under all five naming conventions, the literal
//! spelling first so exact matches always win, and coerces the raw string to
//! the type of the caller-supplied default. Coercion never fails loudly: a
//! value that won't parse falls back to the default.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::case::{to_camel, to_kebab, to_pascal, to_snake, to_upper_snake};
use crate::types::Value;

/// A mutable key/value store with environment semantics.
///
/// Implementations take `&self` for writes because the process environment
/// is itself globally shared; in-memory implementations use interior
/// mutability.
pub trait EnvStore {
    /// Read a key, exactly as spelled.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key, exactly as spelled.
    fn set(&self, key: &str, value: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T: EnvStore + ?Sized> EnvStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// The real process environment.
///
/// Writes mutate process-wide state and stay visible for the remainder of
/// the process. The crate assumes single-threaded, synchronous access while
/// a load is in flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: the documented contract of this crate is single-threaded,
        // synchronous access to the process environment during a load.
        unsafe { std::env::set_var(key, value) }
    }
}

/// An in-memory environment store.
///
/// Hermetic stand-in for [`ProcessEnv`]: tests can seed it, run the full
/// pipeline against it, and inspect what the loaders wrote, without any
/// process-global mutation. Wrap it in an [`Arc`] to keep a handle for
/// assertions after the builder consumes the store.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<BTreeMap<String, String>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

/// The ordered lookup candidates for a key: the literal spelling first,
/// then the five conventional spellings.
fn candidates(key: &str) -> [String; 6] {
    [
        key.to_string(),
        to_upper_snake(key),
        to_camel(key),
        to_kebab(key),
        to_snake(key),
        to_pascal(key),
    ]
}

/// Look up `key` in the store under every naming convention, returning a
/// value coerced to the type of `default`.
///
/// The literal spelling is tried before any converted spelling, so when two
/// store entries differ only by convention the caller gets the exact match.
/// On the first hit:
///
/// - integer default → parse as `i64`, fall back to the default on failure
/// - float default → parse as `f64`, same fallback
/// - boolean default → permissive vocabulary (`true/false/1/0/yes/no/on/off`,
///   case-insensitive), same fallback
/// - string default → the raw value
///
/// If no spelling matches, the default is returned unchanged. Never panics.
///
/// ```
/// use clenv::{getenv, EnvStore, MemoryEnv, Value};
///
/// let env = MemoryEnv::new();
/// env.set("API_KEY", "secret");
/// assert_eq!(getenv(&env, "apiKey", "fallback"), Value::Str("secret".into()));
/// assert_eq!(getenv(&env, "port", 3000), Value::Int(3000));
/// ```
pub fn getenv(store: &dyn EnvStore, key: &str, default: impl Into<Value>) -> Value {
    let default = default.into();
    let raw = candidates(key).iter().find_map(|name| store.get(name));
    let Some(raw) = raw else {
        return default;
    };

    match default {
        Value::Int(_) => raw.trim().parse::<i64>().map(Value::Int).unwrap_or(default),
        Value::Float(_) => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or(default),
        Value::Bool(_) => parse_bool(&raw).map(Value::Bool).unwrap_or(default),
        Value::Str(_) => Value::Str(raw),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Typed facade over [`getenv`], handed to the flag-definition callback.
///
/// A disabled resolver (builder [`no_env()`](crate::ClenvBuilder::no_env))
/// never consults the store and returns the caller's default unchanged.
pub struct EnvResolver<'a> {
    store: &'a dyn EnvStore,
    enabled: bool,
}

impl<'a> EnvResolver<'a> {
    pub fn new(store: &'a dyn EnvStore) -> Self {
        Self {
            store,
            enabled: true,
        }
    }

    pub(crate) fn disabled(store: &'a dyn EnvStore) -> Self {
        Self {
            store,
            enabled: false,
        }
    }

    /// Convention-aware lookup with a typed default. See [`getenv`].
    pub fn get(&self, key: &str, default: impl Into<Value>) -> Value {
        let default = default.into();
        if !self.enabled {
            return default;
        }
        getenv(self.store, key, default)
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        match self.get(key, default) {
            Value::Str(s) => s,
            other => other.to_string(),
        }
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key, default).as_int().unwrap_or(default)
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.get(key, default).as_float().unwrap_or(default)
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.get(key, default).as_bool().unwrap_or(default)
    }
}
