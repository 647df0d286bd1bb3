//! The scope stack and line execution.

use std::io::{self, Write};

use mercator_types::error::{MercatorError, Result};
use mercator_types::style;

use crate::completer::{self, Suggestion};
use crate::interpreter::{dispatch, tokenize};
use crate::output::{CommandOutput, Flow, render};
use crate::scope::Scope;

/// Result of [`Environment::pop`].
#[derive(Debug)]
pub enum Popped {
    /// The removed scope.
    Scope(Box<dyn Scope>),
    /// Only the root remained; the stack is unchanged and the console
    /// should terminate.
    ExitRequested,
}

/// Console state: a stack of scopes with the root at the bottom.
///
/// The top of the stack is the active scope. Every line is resolved
/// against the active scope's command tree only.
pub struct Environment {
    stack: Vec<Box<dyn Scope>>,
}

impl Environment {
    pub fn new(root: Box<dyn Scope>) -> Self {
        Self { stack: vec![root] }
    }

    pub fn push(&mut self, scope: Box<dyn Scope>) {
        log::info!("Entering scope '{}'", scope.meta().prefix);
        self.stack.push(scope);
    }

    /// Remove the active scope unless it is the root.
    pub fn pop(&mut self) -> Popped {
        if self.stack.len() <= 1 {
            return Popped::ExitRequested;
        }
        match self.stack.pop() {
            Some(scope) => {
                log::info!("Leaving scope '{}'", scope.meta().prefix);
                Popped::Scope(scope)
            },
            None => Popped::ExitRequested,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_scope(&self) -> Result<&dyn Scope> {
        self.stack
            .last()
            .map(|s| s.as_ref())
            .ok_or(MercatorError::EmptyScopeStack)
    }

    /// Scopes from root to active.
    pub fn scopes(&self) -> impl Iterator<Item = &dyn Scope> {
        self.stack.iter().map(|s| s.as_ref())
    }

    /// Prefixes joined with `:` followed by `"> "`, e.g. `mercator:binance> `.
    pub fn prompt(&self) -> String {
        let path = self
            .scopes()
            .map(|s| s.meta().prefix.as_str())
            .collect::<Vec<_>>()
            .join(":");
        format!("{path}> ")
    }

    /// Execute one line and apply any scope signal it produced.
    ///
    /// Returns [`CommandOutput::Exit`] when the console should terminate.
    pub fn execute(&mut self, line: &str) -> Result<CommandOutput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(CommandOutput::None);
        }
        let tokens = tokenize(trimmed)?;
        let output = dispatch(self.current_scope()?.root_command(), &tokens)?;
        Ok(self.apply(output))
    }

    fn apply(&mut self, output: CommandOutput) -> CommandOutput {
        match output {
            CommandOutput::PushScope(scope) => {
                self.push(scope);
                CommandOutput::None
            },
            CommandOutput::PopScope => match self.pop() {
                Popped::Scope(_) => CommandOutput::None,
                Popped::ExitRequested => CommandOutput::Exit,
            },
            CommandOutput::Quit => CommandOutput::Exit,
            other => other,
        }
    }

    /// Execute a line and write its output or error to `out`.
    ///
    /// Command failures are printed as a warning and never end the loop.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        match self.execute(line) {
            Ok(CommandOutput::Exit) => Ok(Flow::Exit),
            Ok(output) => {
                render(&output, out)?;
                Ok(Flow::Continue)
            },
            Err(e) => {
                log::debug!("Command failed: {e:?}");
                writeln!(out, "{}", style::warning(&e.to_string()))?;
                Ok(Flow::Continue)
            },
        }
    }

    /// Completion candidates for `line` against the active scope.
    pub fn complete(&self, line: &str, word: &str) -> Vec<Suggestion> {
        match self.current_scope() {
            Ok(scope) => completer::complete(self, scope.root_command(), line, word),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Arity, CommandNode};
    use crate::scope::{CommandScope, ScopeFactory, ScopeMeta};
    use crate::root_scope::root_scope;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn scope(prefix: &str) -> Box<dyn Scope> {
        CommandScope::new(
            prefix,
            "test scope",
            vec![
                CommandNode::new("symbol-price", "Price of a symbol")
                    .arity(Arity::Minimum(1))
                    .run(|args| match args.arg(0) {
                        Some("BTCUSDT") => Ok(CommandOutput::Text("65000".into())),
                        Some(other) => Err(MercatorError::failed(format!("unknown symbol: {other}"))),
                        None => Ok(CommandOutput::None),
                    }),
            ],
        )
        .unwrap()
        .boxed()
    }

    struct TestFactory {
        fail: bool,
    }

    impl ScopeFactory for TestFactory {
        fn meta(&self) -> ScopeMeta {
            ScopeMeta::new("binance", "Test exchange").unwrap()
        }

        fn build(&self) -> Result<Box<dyn Scope>> {
            if self.fail {
                Err(MercatorError::failed("missing credentials"))
            } else {
                Ok(scope("binance"))
            }
        }
    }

    fn console(fail: bool) -> Environment {
        let factory: Rc<dyn ScopeFactory> = Rc::new(TestFactory { fail });
        Environment::new(root_scope("mercator", vec![factory]).unwrap().boxed())
    }

    fn run(env: &mut Environment, line: &str) -> (Flow, String) {
        let mut buf = Vec::new();
        let flow = env.run_line(line, &mut buf).unwrap();
        (flow, String::from_utf8(buf).unwrap())
    }

    fn bottom_prefix(env: &Environment) -> String {
        env.scopes().next().unwrap().meta().prefix.clone()
    }

    #[test]
    fn pop_at_root_requests_exit() {
        let mut env = Environment::new(scope("root"));
        assert!(matches!(env.pop(), Popped::ExitRequested));
        assert_eq!(env.depth(), 1);
        assert_eq!(bottom_prefix(&env), "root");
    }

    #[test]
    fn push_then_pop_returns_scope() {
        let mut env = Environment::new(scope("root"));
        env.push(scope("child"));
        assert_eq!(env.depth(), 2);
        match env.pop() {
            Popped::Scope(s) => assert_eq!(s.meta().prefix, "child"),
            Popped::ExitRequested => panic!("expected a scope"),
        }
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn prompt_joins_prefixes() {
        let mut env = Environment::new(scope("mercator"));
        assert_eq!(env.prompt(), "mercator> ");
        env.push(scope("binance"));
        assert_eq!(env.prompt(), "mercator:binance> ");
    }

    #[test]
    fn current_scope_is_top() {
        let mut env = Environment::new(scope("mercator"));
        env.push(scope("shopify"));
        assert_eq!(env.current_scope().unwrap().meta().prefix, "shopify");
    }

    #[test]
    fn empty_line_prints_nothing() {
        let mut env = console(false);
        assert_eq!(run(&mut env, ""), (Flow::Continue, String::new()));
        assert_eq!(run(&mut env, "   "), (Flow::Continue, String::new()));
    }

    #[test]
    fn use_pushes_scope() {
        let mut env = console(false);
        let (flow, out) = run(&mut env, "use binance");
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert_eq!(env.depth(), 2);
        assert_eq!(env.prompt(), "mercator:binance> ");
    }

    #[test]
    fn failed_scope_is_not_pushed() {
        let mut env = console(true);
        let (flow, out) = run(&mut env, "use binance");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("missing credentials"));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn command_failure_keeps_console_running() {
        let mut env = console(false);
        run(&mut env, "use binance");
        let (flow, out) = run(&mut env, "symbol-price XYZ");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("unknown symbol: XYZ"));
        let (_, out) = run(&mut env, "symbol-price BTCUSDT");
        assert_eq!(out, "65000\n");
    }

    #[test]
    fn commands_resolve_in_active_scope_only() {
        let mut env = console(false);
        let (_, out) = run(&mut env, "symbol-price BTCUSDT");
        assert!(out.contains("command not found: symbol-price"));
        run(&mut env, "use binance");
        let (_, out) = run(&mut env, "use binance");
        assert!(out.contains("command not found: use"));
    }

    #[test]
    fn exit_pops_then_terminates() {
        let mut env = console(false);
        run(&mut env, "use binance");
        assert_eq!(run(&mut env, "exit").0, Flow::Continue);
        assert_eq!(env.depth(), 1);
        assert_eq!(run(&mut env, "exit").0, Flow::Exit);
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn quit_terminates_from_any_depth() {
        let mut env = console(false);
        run(&mut env, "use binance");
        assert_eq!(run(&mut env, "quit").0, Flow::Exit);
    }

    #[test]
    fn syntax_error_is_reported() {
        let mut env = console(false);
        let (flow, out) = run(&mut env, "use 'binance");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("unterminated single quote"));

        let (flow, out) = run(&mut env, r"use binance\");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("unterminated backslash escape"));
        assert_eq!(env.depth(), 1);
    }

    proptest! {
        #[test]
        fn depth_tracks_pushes_and_pops(pushes in 0usize..20, pops in 0usize..20) {
            let mut env = Environment::new(scope("root"));
            for i in 0..pushes {
                env.push(scope(&format!("s{i}")));
            }
            let pops = pops.min(pushes);
            for _ in 0..pops {
                prop_assert!(matches!(env.pop(), Popped::Scope(_)));
            }
            prop_assert_eq!(env.depth(), 1 + pushes - pops);
            prop_assert_eq!(bottom_prefix(&env), "root");

            while let Popped::Scope(_) = env.pop() {}
            prop_assert!(matches!(env.pop(), Popped::ExitRequested));
            prop_assert_eq!(env.depth(), 1);
            prop_assert_eq!(bottom_prefix(&env), "root");
        }
    }
}
