//! Line tokenizing and command-tree dispatch.

use mercator_types::error::{MercatorError, Result};

use crate::command::CommandNode;
use crate::output::CommandOutput;

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split an input line into words using shell quoting rules.
///
/// Single quotes are literal. Double quotes honor `\"`, `\\` and `\$`.
/// A backslash outside quotes escapes the next character, and a trailing
/// one is a syntax error. Quoted empty strings (`""`) produce an empty word.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => match chars.next_if(|next| matches!(next, '"' | '\\' | '$')) {
                    Some(escaped) => current.push(escaped),
                    None => current.push('\\'),
                },
                _ => current.push(ch),
            }
        } else {
            match ch {
                '\'' => {
                    in_single = true;
                    quoted = true;
                },
                '"' => {
                    in_double = true;
                    quoted = true;
                },
                '\\' => match chars.next() {
                    Some(next) => current.push(next),
                    None => {
                        return Err(MercatorError::Syntax(
                            "unterminated backslash escape".to_string(),
                        ));
                    },
                },
                c if c.is_whitespace() => {
                    if !current.is_empty() || quoted {
                        tokens.push(std::mem::take(&mut current));
                        quoted = false;
                    }
                },
                _ => current.push(ch),
            }
        }
    }

    if in_single {
        return Err(MercatorError::Syntax("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(MercatorError::Syntax("unterminated double quote".to_string()));
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Walk down from `root` while the leading tokens name children.
///
/// Returns the matched path (excluding `root`) and the unconsumed tokens.
pub fn resolve<'a, 't>(
    root: &'a CommandNode,
    tokens: &'t [String],
) -> (Vec<&'a CommandNode>, &'t [String]) {
    let mut path = Vec::new();
    let mut node = root;
    let mut rest = tokens;
    while let Some((first, tail)) = rest.split_first() {
        match node.find_child(first) {
            Some(child) => {
                path.push(child);
                node = child;
                rest = tail;
            },
            None => break,
        }
    }
    (path, rest)
}

/// Run the command named by `tokens` under `root`.
///
/// `--help` or `-h` anywhere in the arguments prints usage instead of
/// running. A group without a body prints its usage when called bare.
pub fn dispatch(root: &CommandNode, tokens: &[String]) -> Result<CommandOutput> {
    let Some(first) = tokens.first() else {
        return Ok(CommandOutput::None);
    };
    let (path, rest) = resolve(root, tokens);
    let Some(node) = path.last().copied() else {
        return Err(MercatorError::CommandNotFound(first.clone()));
    };
    let path_text = path
        .iter()
        .map(|n| n.name())
        .collect::<Vec<_>>()
        .join(" ");

    if wants_help(node, rest) {
        return Ok(CommandOutput::Text(node.usage(&path_text)));
    }

    if !node.is_runnable() {
        return match rest.first() {
            Some(name) => Err(MercatorError::UnknownSubcommand {
                name: name.clone(),
                path: path_text,
            }),
            None => Ok(CommandOutput::Text(node.usage(&path_text))),
        };
    }

    log::debug!("Dispatching '{path_text}' with {} arg(s)", rest.len());
    node.invoke(rest)
}

fn wants_help(node: &CommandNode, args: &[String]) -> bool {
    let declares = |name: &str, alias: char| {
        node.flags()
            .iter()
            .any(|f| f.name() == name || f.short_alias() == Some(alias))
    };
    args.iter()
        .take_while(|a| a.as_str() != "--")
        .any(|a| (a == "--help" || a == "-h") && !declares("help", 'h'))
}
