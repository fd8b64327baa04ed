//! Layered flag + environment configuration for CLI apps. Declare your
//! options, point at a config file, and go.
//!
//! Clenv merges four configuration sources — command-line flags, the
//! process environment, a runtime-selected override file, and a default
//! `.lenv` file — into one flat, typed result with a strict priority order
//! and a single key spelling.
//!
//! ```no_run
//! use clenv::{Clenv, FlagDef};
//!
//! let config = Clenv::builder()
//!     .options(|flags, env| {
//!         flags
//!             .option(FlagDef::int("port").default(env.int("PORT", 3000)))
//!             .option(FlagDef::string("api-key").default(env.string("API_KEY", "")))
//!     })
//!     .load()
//!     .unwrap_or_else(|e| e.exit());
//!
//! println!("port = {}", config.int("port").unwrap_or(3000));
//! ```
//!
//! That single call loads `.lenv` into the environment, honors a
//! `--configuration <path>` override file, evaluates the `env.int(...)`
//! defaults against the updated environment, parses the real argument
//! vector, and hands back camelCase keys with typed values.
//!
//! # Layer precedence
//!
//! ```text
//! Legacy KEY=value file     .legacy_env_file() (deprecated, opt-in)
//!        ↑ overridden by
//! Default config file       .lenv, or .config_file()
//!        ↑ overridden by
//! Override config file      --configuration <path> / -c <path>
//!        ↑ overridden by
//! Environment lookups       env.int("PORT", 3000) at definition time
//!        ↑ overridden by
//! Command-line flags        --port 7000
//! ```
//!
//! The file layers work by writing into the environment store under
//! `UPPER_SNAKE` keys; the resolver layer reads the store back out when the
//! flag-definition callback runs; the flag layer wins simply because a
//! declared default is only used when no explicit argument is present.
//!
//! # One key, five spellings
//!
//! A key may be written as `API_KEY`, `apiKey`, `api-key`, `api_key`, or
//! `ApiKey` — in a config file, in the environment, or in a lookup — and
//! they all reach the same value. The [`case`] module holds the conversion
//! functions; [`getenv`] tries the literal spelling first and then each
//! convention, so exact matches always take precedence. Results use
//! camelCase, long flags use kebab-case, the environment uses UPPER_SNAKE.
//!
//! # Reserved flags are opt-in
//!
//! The underlying parsing engine ships built-in `--help`/`--version`
//! handling that would silently shadow user options of the same name —
//! a user-declared string option `version` would come back as `false` or
//! exit the program. Clenv therefore disables the built-ins on every parser
//! it constructs, pre-scan and final alike. An application that wants
//! `--version` declares it like any other option. The only flag clenv
//! itself reserves is `--configuration`/`-c`, and even its definition can
//! be re-declared in the callback.
//!
//! # The environment store is a capability
//!
//! File loaders mutate shared environment state by design: values must stay
//! visible to later lookups, including ones made by the caller after
//! [`load`](ClenvBuilder::load) returns. That state is injected as an
//! [`EnvStore`] rather than hard-wired to `std::env` — the default is the
//! real [`ProcessEnv`], and tests run the identical pipeline against a
//! [`MemoryEnv`]. Access is single-threaded and synchronous; the pipeline
//! steps run strictly in order because each one reads what the previous
//! ones wrote.
//!
//! # Errors
//!
//! Missing or unreadable config files are not errors — they contribute
//! nothing and the load continues. Coercion failures fall back to the
//! supplied default. The one failure a caller sees is a rejected argument
//! vector ([`ClenvError::Arg`]), carrying the parsing engine's diagnostic
//! untouched.

pub mod case;
pub mod error;

mod builder;
mod env;
mod file;
mod flags;
mod types;

pub use builder::{Clenv, ClenvBuilder, ResolvedConfig};
pub use env::{EnvResolver, EnvStore, MemoryEnv, ProcessEnv, getenv};
pub use error::ClenvError;
pub use file::{apply_config_file, apply_legacy_env_file, parse_document};
pub use flags::{FlagDef, FlagSet};
pub use types::Value;
