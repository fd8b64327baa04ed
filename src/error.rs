use thiserror::Error;

/// Errors surfaced by a [`load`](crate::ClenvBuilder::load).
///
/// File and environment problems are recovered locally and never reach the
/// caller — a missing config file is an empty contribution, a value that
/// won't coerce falls back to its default. The one thing that does surface
/// is a rejected argument vector, passed through exactly as the parsing
/// engine reports it.
#[derive(Debug, Error)]
pub enum ClenvError {
    /// The final argument parse failed (unknown flag in strict mode, wrong
    /// value type, ...). Carries clap's own diagnostic untouched.
    #[error(transparent)]
    Arg(#[from] clap::Error),
}

impl ClenvError {
    /// Print the diagnostic the way the parsing engine would and exit with
    /// its exit code. Intended for `main`:
    ///
    /// ```ignore
    /// let config = Clenv::builder().load().unwrap_or_else(|e| e.exit());
    /// ```
    pub fn exit(self) -> ! {
        match self {
            ClenvError::Arg(err) => err.exit(),
        }
    }
}
