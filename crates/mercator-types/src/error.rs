//! Error types for Mercator.

use std::io;

/// Errors produced by the Mercator console.
#[derive(Debug, thiserror::Error)]
pub enum MercatorError {
    /// Malformed shell syntax (unbalanced quotes).
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("unknown command \"{name}\" for \"{path}\"")]
    UnknownSubcommand { name: String, path: String },

    #[error("unknown scope: {0}")]
    UnknownScope(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("flag needs an argument: --{0}")]
    MissingFlagValue(String),

    #[error("invalid value \"{value}\" for flag --{flag}: expected {expected}")]
    InvalidFlagValue {
        flag: String,
        value: String,
        expected: &'static str,
    },

    #[error("required flag --{0} not set")]
    RequiredFlag(String),

    /// Positional argument count rejected by a command's arity rule.
    #[error("{0}")]
    Arity(String),

    /// A command body failed; the message is shown to the user verbatim.
    #[error("{0}")]
    Failed(String),

    /// A scope or command tree violates its construction invariants.
    #[error("invalid scope definition: {0}")]
    Definition(String),

    #[error("scope stack is empty")]
    EmptyScopeStack,

    #[error("exchange error: {0}")]
    Exchange(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MercatorError {
    /// Shorthand for a command body failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MercatorError>;
