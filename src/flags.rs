//! The flag-definition surface over the clap parsing engine.
//!
//! [`FlagSet`] is what the flag-definition callback receives: an ordered
//! list of typed option declarations that is lowered to a `clap::Command`
//! at parse time. Two properties of that lowering carry the correctness
//! guarantees of the whole crate:
//!
//! - clap's built-in `--help` and `--version` flags are **always disabled**,
//!   on the pre-scan parser and on the final parser alike. Built-in reserved
//!   flags are opt-in here, never opt-out: if they stayed on, a user option
//!   literally named `version` would be shadowed by the built-in and come
//!   back as a boolean (or exit the program) instead of yielding the user's
//!   string. Users who want the stock behavior re-enable it by declaring
//!   their own option.
//! - Parsed keys are emitted in camelCase only. The long flag on the command
//!   line is the kebab spelling of the declared name; the result never
//!   carries both.
//!
//! [`prescan_override_path`] is the first of the two parse stages: a
//! throwaway parser that recognizes only `--configuration`/`-c`, so the
//! override file can be located before the full option set exists. Its
//! parse failures are swallowed — the final parse is authoritative for
//! error reporting.

use std::collections::BTreeMap;

use clap::{Arg, Command};

use crate::case::{to_camel, to_kebab};
use crate::types::Value;

/// Name of the reserved configuration-file override option.
pub(crate) const CONFIG_FLAG: &str = "configuration";

/// The reserved `--configuration`/`-c` definition registered on every final
/// parser.
pub(crate) fn config_flag() -> FlagDef {
    FlagDef::string(CONFIG_FLAG)
        .alias('c')
        .help("Path to an override configuration file")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagKind {
    Str,
    Int,
    Float,
    Bool,
}

/// A single typed option declaration.
///
/// The declared name may use any naming convention; the long flag is its
/// kebab spelling and the result key is its camel spelling.
#[derive(Debug, Clone)]
pub struct FlagDef {
    name: String,
    kind: FlagKind,
    default: Option<Value>,
    alias: Option<char>,
    help: Option<String>,
}

impl FlagDef {
    fn new(name: &str, kind: FlagKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: None,
            alias: None,
            help: None,
        }
    }

    /// A string-valued option.
    pub fn string(name: &str) -> Self {
        Self::new(name, FlagKind::Str)
    }

    /// An integer-valued option.
    pub fn int(name: &str) -> Self {
        Self::new(name, FlagKind::Int)
    }

    /// A float-valued option.
    pub fn float(name: &str) -> Self {
        Self::new(name, FlagKind::Float)
    }

    /// A boolean option. Accepts bare `--name` as well as `--name false`.
    pub fn bool(name: &str) -> Self {
        Self::new(name, FlagKind::Bool)
    }

    /// Default used when the argument vector does not mention the option.
    /// This is where [`EnvResolver`](crate::EnvResolver) lookups plug in.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// One-letter short alias.
    pub fn alias(mut self, short: char) -> Self {
        self.alias = Some(short);
        self
    }

    /// Help text shown by a user-defined help option.
    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone()).long(to_kebab(&self.name));
        if let Some(short) = self.alias {
            arg = arg.short(short);
        }
        if let Some(text) = &self.help {
            arg = arg.help(text.clone());
        }
        arg = match self.kind {
            FlagKind::Str => arg.value_parser(clap::value_parser!(String)),
            FlagKind::Int => arg.value_parser(clap::value_parser!(i64)),
            FlagKind::Float => arg.value_parser(clap::value_parser!(f64)),
            FlagKind::Bool => arg
                .value_parser(clap::value_parser!(bool))
                .num_args(0..=1)
                .default_missing_value("true"),
        };
        if let Some(default) = &self.default {
            arg = arg.default_value(default.to_string());
        }
        arg
    }
}

/// The set of declared options plus parser-wide settings.
#[derive(Debug)]
pub struct FlagSet {
    defs: Vec<FlagDef>,
    strict: bool,
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagSet {
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            strict: true,
        }
    }

    /// Declare an option. Declaring the same name again replaces the earlier
    /// definition, so callers can re-describe the reserved `configuration`
    /// option.
    pub fn option(mut self, def: FlagDef) -> Self {
        if let Some(slot) = self.defs.iter_mut().find(|d| d.name == def.name) {
            *slot = def;
        } else {
            self.defs.push(def);
        }
        self
    }

    /// Reject unknown arguments (default: true). When off, unrecognized
    /// arguments are ignored rather than reported.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn to_command(&self, program: &str) -> Command {
        // Built-in help/version stay off so user options of the same name
        // are never shadowed.
        let mut cmd = Command::new(program.to_string())
            .disable_help_flag(true)
            .disable_version_flag(true);
        if !self.strict {
            cmd = cmd.ignore_errors(true);
        }
        for def in &self.defs {
            cmd = cmd.arg(def.to_arg());
        }
        cmd
    }

    /// Parse `argv` (including the program name) and return the resolved
    /// values keyed by the camel spelling of each declared name.
    ///
    /// Options with neither an argument nor a default are absent from the
    /// result. Parse errors are returned exactly as clap reports them.
    pub(crate) fn parse(
        &self,
        program: &str,
        argv: &[String],
    ) -> Result<BTreeMap<String, Value>, clap::Error> {
        let matches = self.to_command(program).try_get_matches_from(argv)?;

        let mut values = BTreeMap::new();
        for def in &self.defs {
            let value = match def.kind {
                FlagKind::Str => matches
                    .get_one::<String>(&def.name)
                    .map(|s| Value::Str(s.clone())),
                FlagKind::Int => matches.get_one::<i64>(&def.name).copied().map(Value::Int),
                FlagKind::Float => matches
                    .get_one::<f64>(&def.name)
                    .copied()
                    .map(Value::Float),
                FlagKind::Bool => matches.get_one::<bool>(&def.name).copied().map(Value::Bool),
            };
            if let Some(value) = value {
                values.insert(to_camel(&def.name), value);
            }
        }
        Ok(values)
    }
}

/// Stage one of the two-stage parse: locate an override config-file path.
///
/// Recognizes only `--configuration <path>` / `-c <path>`, with built-in
/// help/version disabled and all other arguments ignored. Any parse failure
/// means "no override path given" — the final parse owns error reporting.
pub(crate) fn prescan_override_path(argv: &[String]) -> Option<String> {
    let cmd = Command::new("prescan")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .ignore_errors(true)
        .arg(
            Arg::new(CONFIG_FLAG)
                .long(CONFIG_FLAG)
                .short('c')
                .value_parser(clap::value_parser!(String)),
        );
    match cmd.try_get_matches_from(argv) {
        Ok(matches) => matches.get_one::<String>(CONFIG_FLAG).cloned(),
        Err(_) => None,
    }
}
