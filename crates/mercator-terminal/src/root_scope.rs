//! The root scope and its `use` command.

use std::rc::Rc;

use mercator_types::error::{MercatorError, Result};

use crate::command::{Arity, CommandNode};
use crate::output::CommandOutput;
use crate::scope::{CommandScope, ScopeFactory};

/// Description shown by `help` at the top level.
pub const ROOT_DESCRIPTION: &str = "A command line tool for managing monetary assets";

/// Build the bottom-of-stack scope.
///
/// `use <name>` has one child per factory; running it builds the scope
/// and signals the environment to push it.
pub fn root_scope(prefix: &str, factories: Vec<Rc<dyn ScopeFactory>>) -> Result<CommandScope> {
    CommandScope::new(prefix, ROOT_DESCRIPTION, vec![use_command(factories)])
}

fn use_command(factories: Vec<Rc<dyn ScopeFactory>>) -> CommandNode {
    let listing: Vec<(String, String)> = factories
        .iter()
        .map(|f| {
            let meta = f.meta();
            (meta.prefix, meta.description)
        })
        .collect();

    let mut node = CommandNode::new("use", "Changes the scope of the console")
        .long(
            "Changes the scope of the console. Each scope has its own set of \
             commands; `exit` returns to the previous scope.",
        )
        .args_hint("<scope>")
        .arity(Arity::Maximum(1))
        .run(move |args| match args.arg(0) {
            Some(name) => Err(MercatorError::UnknownScope(name.to_string())),
            None => {
                let width = listing.iter().map(|(p, _)| p.len()).max().unwrap_or(0);
                let mut lines = vec!["Available scopes:".to_string()];
                lines.extend(
                    listing
                        .iter()
                        .map(|(prefix, description)| format!("  {prefix:width$}  {description}")),
                );
                Ok(CommandOutput::lines(lines))
            },
        });

    for factory in factories {
        let meta = factory.meta();
        node = node.child(
            CommandNode::new(&meta.prefix, &meta.description)
                .arity(Arity::Exact(0))
                .run(move |_| enter(factory.as_ref())),
        );
    }
    node
}

fn enter(factory: &dyn ScopeFactory) -> Result<CommandOutput> {
    let prefix = factory.meta().prefix;
    match factory.build() {
        Ok(scope) => Ok(CommandOutput::PushScope(scope)),
        Err(e) => {
            log::warn!("Failed to build scope '{prefix}': {e}");
            Err(e)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::dispatch;
    use crate::scope::{Scope, ScopeMeta};

    struct Named(&'static str);

    impl ScopeFactory for Named {
        fn meta(&self) -> ScopeMeta {
            ScopeMeta::new(self.0, "A test scope").unwrap()
        }

        fn build(&self) -> Result<Box<dyn Scope>> {
            Ok(CommandScope::new(self.0, "A test scope", Vec::new())?.boxed())
        }
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn root() -> CommandScope {
        let factories: Vec<Rc<dyn ScopeFactory>> =
            vec![Rc::new(Named("binance")), Rc::new(Named("shopify"))];
        root_scope("mercator", factories).unwrap()
    }

    #[test]
    fn use_lists_scopes() {
        let root = root();
        match dispatch(root.root_command(), &strings(&["use"])).unwrap() {
            CommandOutput::Text(text) => {
                assert!(text.starts_with("Available scopes:"));
                assert!(text.contains("binance"));
                assert!(text.contains("shopify"));
            },
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn use_unknown_scope() {
        let root = root();
        let err = dispatch(root.root_command(), &strings(&["use", "foo"])).unwrap_err();
        assert_eq!(format!("{err}"), "unknown scope: foo");
    }

    #[test]
    fn use_known_scope_signals_push() {
        let root = root();
        match dispatch(root.root_command(), &strings(&["use", "shopify"])).unwrap() {
            CommandOutput::PushScope(scope) => assert_eq!(scope.meta().prefix, "shopify"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn use_rejects_extra_args() {
        let root = root();
        let err = dispatch(root.root_command(), &strings(&["use", "binance", "now"])).unwrap_err();
        assert!(matches!(err, MercatorError::Arity(_)));
    }

    #[test]
    fn duplicate_factories_rejected() {
        let factories: Vec<Rc<dyn ScopeFactory>> =
            vec![Rc::new(Named("binance")), Rc::new(Named("binance"))];
        assert!(root_scope("mercator", factories).is_err());
    }
}
