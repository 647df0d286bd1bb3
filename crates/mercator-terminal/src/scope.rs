//! Scopes: named command namespaces stacked by the environment.

use std::collections::BTreeMap;
use std::fmt;

use mercator_types::error::{MercatorError, Result};

use crate::command::{Arity, CommandNode};
use crate::output::CommandOutput;

/// Identity of a scope: the prompt prefix and a one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeMeta {
    pub prefix: String,
    pub description: String,
}

impl ScopeMeta {
    /// The prefix must be a non-empty word without `:`.
    pub fn new(prefix: &str, description: &str) -> Result<Self> {
        if prefix.is_empty() || prefix.contains(|c: char| c.is_whitespace() || c == ':') {
            return Err(MercatorError::Definition(format!(
                "scope prefix {prefix:?} must be a single word without ':'"
            )));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            description: description.to_string(),
        })
    }
}

/// A command namespace the console can enter.
pub trait Scope {
    fn meta(&self) -> &ScopeMeta;

    /// Root of the scope's command tree; its children are the top-level commands.
    fn root_command(&self) -> &CommandNode;
}

impl fmt::Debug for dyn Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({})", self.meta().prefix)
    }
}

/// Builds a scope on demand when the user enters it.
///
/// Construction may fail (missing credentials, unreachable exchange); the
/// failure is reported and nothing is pushed.
pub trait ScopeFactory {
    fn meta(&self) -> ScopeMeta;
    fn build(&self) -> Result<Box<dyn Scope>>;
}

/// Standard scope implementation over a validated command tree.
///
/// Adds the `help`, `exit` and `quit` commands every scope carries.
#[derive(Debug)]
pub struct CommandScope {
    meta: ScopeMeta,
    root: CommandNode,
}

impl CommandScope {
    pub fn new(prefix: &str, description: &str, commands: Vec<CommandNode>) -> Result<Self> {
        let meta = ScopeMeta::new(prefix, description)?;
        let mut commands = commands;
        commands.push(exit_command());
        commands.push(quit_command());
        let help = help_command(&meta, &commands);
        commands.push(help);

        let root = CommandNode::new(&meta.prefix, &meta.description).children_from(commands);
        root.validate()?;
        log::debug!(
            "Built scope '{}' with {} commands",
            meta.prefix,
            root.children().len()
        );
        Ok(Self { meta, root })
    }

    /// Box as a trait object for pushing onto the environment.
    pub fn boxed(self) -> Box<dyn Scope> {
        Box::new(self)
    }
}

impl Scope for CommandScope {
    fn meta(&self) -> &ScopeMeta {
        &self.meta
    }

    fn root_command(&self) -> &CommandNode {
        &self.root
    }
}

// ---------------------------------------------------------------------------
// exit / quit
// ---------------------------------------------------------------------------

fn exit_command() -> CommandNode {
    CommandNode::new(
        "exit",
        "Exits the current scope. Exits the console if at the top-level scope.",
    )
    .arity(Arity::Exact(0))
    .run(|_| Ok(CommandOutput::PopScope))
}

fn quit_command() -> CommandNode {
    CommandNode::new("quit", "Fully exits the console regardless of scope")
        .arity(Arity::Exact(0))
        .run(|_| Ok(CommandOutput::Quit))
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

/// `help` with its text rendered once, at scope construction.
fn help_command(meta: &ScopeMeta, commands: &[CommandNode]) -> CommandNode {
    let mut names: Vec<&str> = commands.iter().map(CommandNode::name).collect();
    names.push("help");

    let mut topics: BTreeMap<String, String> = commands
        .iter()
        .map(|c| (c.name().to_string(), c.usage(c.name())))
        .collect();
    let help_short = "Help about any command";
    topics.insert(
        "help".to_string(),
        format!("{help_short}\n\nUsage:\n  help [command]"),
    );

    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    let mut overview = format!("{}\n\nAvailable Commands:\n", meta.description);
    for command in commands {
        overview.push_str(&format!("  {:width$}  {}\n", command.name(), command.short()));
    }
    overview.push_str(&format!("  {:width$}  {help_short}\n", "help"));
    overview.push_str("\nUse \"help [command]\" for more information about a command.");

    CommandNode::new("help", help_short)
        .args_hint("[command]")
        .arity(Arity::Maximum(1))
        .valid_args(names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
        .run(move |args| match args.arg(0) {
            None => Ok(CommandOutput::Text(overview.clone())),
            Some(name) => topics
                .get(name)
                .map(|text| CommandOutput::Text(text.clone()))
                .ok_or_else(|| MercatorError::CommandNotFound(name.to_string())),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::dispatch;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> CommandScope {
        CommandScope::new(
            "binance",
            "Binance exchange",
            vec![
                CommandNode::new("server-time", "Server time")
                    .run(|_| Ok(CommandOutput::Text("12:00".into()))),
            ],
        )
        .unwrap()
    }

    #[test]
    fn meta_rejects_bad_prefixes() {
        assert!(ScopeMeta::new("", "x").is_err());
        assert!(ScopeMeta::new("two words", "x").is_err());
        assert!(ScopeMeta::new("a:b", "x").is_err());
        assert!(ScopeMeta::new("binance", "x").is_ok());
    }

    #[test]
    fn scope_has_builtin_commands() {
        let scope = sample();
        let root = scope.root_command();
        for name in ["server-time", "help", "exit", "quit"] {
            assert!(root.find_child(name).is_some(), "missing {name}");
        }
        assert_eq!(scope.meta().prefix, "binance");
    }

    #[test]
    fn duplicate_builtin_rejected() {
        let result = CommandScope::new(
            "dup",
            "Duplicate exit",
            vec![CommandNode::new("exit", "mine")],
        );
        assert!(matches!(result, Err(MercatorError::Definition(_))));
    }

    #[test]
    fn exit_and_quit_signal() {
        let scope = sample();
        let root = scope.root_command();
        assert!(matches!(
            dispatch(root, &strings(&["exit"])).unwrap(),
            CommandOutput::PopScope
        ));
        assert!(matches!(
            dispatch(root, &strings(&["quit"])).unwrap(),
            CommandOutput::Quit
        ));
    }

    #[test]
    fn help_overview_lists_commands() {
        let scope = sample();
        match dispatch(scope.root_command(), &strings(&["help"])).unwrap() {
            CommandOutput::Text(text) => {
                assert!(text.starts_with("Binance exchange"));
                assert!(text.contains("server-time"));
                assert!(text.contains("quit"));
                assert!(text.contains("help"));
            },
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn help_topic_and_unknown_topic() {
        let scope = sample();
        match dispatch(scope.root_command(), &strings(&["help", "server-time"])).unwrap() {
            CommandOutput::Text(text) => assert!(text.contains("Usage:\n  server-time")),
            other => panic!("unexpected output: {other:?}"),
        }
        let err = dispatch(scope.root_command(), &strings(&["help", "nope"])).unwrap_err();
        assert!(matches!(err, MercatorError::CommandNotFound(_)));
    }

    #[test]
    fn debug_shows_prefix() {
        let scope = sample().boxed();
        assert_eq!(format!("{scope:?}"), "Scope(binance)");
    }
}
