//! Scoped command shell.
//!
//! The console keeps a stack of scopes. Each scope owns a tree of
//! commands; input lines are tokenized, resolved against the active
//! scope's tree, and dispatched. Commands change the stack by returning
//! signal outputs that the [`Environment`] applies after they finish.

pub mod command;
pub mod completer;
mod environment;
pub mod interpreter;
mod output;
mod root_scope;
mod scope;

/// Command tree node builder.
pub use command::{Arity, CommandNode, FlagKind, FlagSpec, FlagValue, ParsedArgs, SuggestionSource};
/// A completion candidate.
pub use completer::Suggestion;
/// Scope stack and line execution.
pub use environment::{Environment, Popped};
/// Output produced by a command (text, table, signals).
pub use output::{CommandOutput, Flow, render};
/// Root scope construction.
pub use root_scope::{ROOT_DESCRIPTION, root_scope};
/// Scope contract and the standard implementation.
pub use scope::{CommandScope, Scope, ScopeFactory, ScopeMeta};
