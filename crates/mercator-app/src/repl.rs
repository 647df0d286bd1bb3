//! Line editor loop over the scope stack.

use std::io;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Context, Editor, Helper, Highlighter, Hinter, Validator};

use mercator_terminal::completer::word_before_cursor;
use mercator_terminal::{Environment, Flow};

/// Editor helper owning the environment, so completion sees the active scope.
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct ConsoleHelper {
    env: Environment,
}

impl ConsoleHelper {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// Replacement start and candidates for the word ending at `pos`.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        let word = word_before_cursor(line, pos);
        let pairs = self
            .env
            .complete(before, word)
            .into_iter()
            .map(|s| Pair {
                display: if s.description.is_empty() {
                    s.text.clone()
                } else {
                    format!("{:<24} {}", s.text, s.description)
                },
                replacement: s.text,
            })
            .collect();
        (pos - word.len(), pairs)
    }
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

/// Read, execute and print until the environment asks to exit or input ends.
pub fn run(env: Environment) -> anyhow::Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let mut editor: Editor<ConsoleHelper, DefaultHistory> = Editor::with_config(config)?;
    editor.set_helper(Some(ConsoleHelper::new(env)));
    let mut stdout = io::stdout();

    loop {
        let Some(prompt) = editor.helper().map(|h| h.env.prompt()) else {
            break;
        };
        match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty()
                    && let Err(e) = editor.add_history_entry(line.as_str())
                {
                    log::debug!("History entry dropped: {e}");
                }
                let Some(helper) = editor.helper_mut() else {
                    break;
                };
                if helper.env.run_line(&line, &mut stdout)? == Flow::Exit {
                    break;
                }
            },
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use mercator_shopify::ShopifyScopeFactory;
    use mercator_terminal::{ScopeFactory, root_scope};
    use mercator_types::config::ShopifyConfig;

    use super::*;

    fn helper() -> ConsoleHelper {
        let factories: Vec<Rc<dyn ScopeFactory>> =
            vec![Rc::new(ShopifyScopeFactory::new(ShopifyConfig::default()))];
        let root = root_scope("mercator", factories).unwrap();
        ConsoleHelper::new(Environment::new(root.boxed()))
    }

    #[test]
    fn completes_scope_names_after_use() {
        let h = helper();
        let line = "use sho";
        let (start, pairs) = h.candidates(line, line.len());
        assert_eq!(start, 4);
        assert_eq!(pairs[0].replacement, "shopify");
    }

    #[test]
    fn completes_commands_of_active_scope() {
        let mut h = helper();
        let mut sink = Vec::new();
        assert_eq!(h.env.run_line("use shopify", &mut sink).unwrap(), Flow::Continue);
        assert_eq!(h.env.prompt(), "mercator:shopify> ");
        let (start, pairs) = h.candidates("rev", 3);
        assert_eq!(start, 0);
        assert_eq!(pairs[0].replacement, "revenue");
        assert!(pairs[0].display.contains("estimated revenue"));
    }

    #[test]
    fn completes_flags() {
        let mut h = helper();
        let mut sink = Vec::new();
        h.env.run_line("use shopify", &mut sink).unwrap();
        let line = "revenue --go";
        let (start, pairs) = h.candidates(line, line.len());
        assert_eq!(start, 8);
        assert!(pairs.iter().any(|p| p.replacement == "--goal"));
    }

    #[test]
    fn quit_from_nested_scope_ends_loop() {
        let mut h = helper();
        let mut sink = Vec::new();
        h.env.run_line("use shopify", &mut sink).unwrap();
        assert_eq!(h.env.run_line("quit", &mut sink).unwrap(), Flow::Exit);
    }
}
