//! Tree-walking completion with fuzzy filtering.
//!
//! Candidates come from the active scope's command tree: subcommand names,
//! flags, fixed argument lists, and dynamic [`SuggestionSource`]s. The word
//! under the cursor then filters them as a case-insensitive subsequence.
//!
//! [`SuggestionSource`]: crate::command::SuggestionSource

use crate::command::CommandNode;
use crate::environment::Environment;

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub description: String,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

/// Candidates for `line` (text up to the cursor) filtered by `word`.
pub fn complete(env: &Environment, root: &CommandNode, line: &str, word: &str) -> Vec<Suggestion> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    let candidates = collect(env, root.children(), line.trim_start());
    filter_fuzzy(candidates, word)
}

/// The partial word ending at byte offset `pos`.
pub fn word_before_cursor(line: &str, pos: usize) -> &str {
    let head = line.get(..pos).unwrap_or(line);
    let start = head
        .rfind(char::is_whitespace)
        .map(|i| i + head[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    &head[start..]
}

/// Suggestions from every command whose name ends a word at the start of
/// `input`, or the command names themselves when none does.
fn collect(env: &Environment, commands: &[CommandNode], input: &str) -> Vec<Suggestion> {
    let mut entered = false;
    let mut suggestions = Vec::new();
    for command in commands {
        let Some(rest) = input
            .strip_prefix(command.name())
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        else {
            continue;
        };
        entered = true;

        let remaining = rest.trim_start();
        suggestions.extend(collect(env, command.children(), remaining));
        suggestions.extend(
            command
                .flags()
                .iter()
                .map(|f| Suggestion::new(format!("--{}", f.name()), f.usage())),
        );

        let past_name = !rest.is_empty();
        if past_name && (command.is_eager() || !remaining.is_empty()) {
            suggestions.extend(
                command
                    .valid_arg_list()
                    .iter()
                    .map(|a| Suggestion::new(a.as_str(), "")),
            );
            if let Some(source) = command.suggestion_source() {
                let args: Vec<String> = remaining.split_whitespace().map(str::to_string).collect();
                suggestions.extend(
                    source
                        .suggest(env, &args)
                        .into_iter()
                        .map(|s| Suggestion::new(s, "")),
                );
            }
        }
    }
    if entered {
        return suggestions;
    }
    commands
        .iter()
        .map(|command| Suggestion::new(command.name(), command.short()))
        .collect()
}

/// Keep candidates whose text contains `word` as a case-insensitive
/// subsequence, best matches first.
///
/// Ranking: prefix matches, then contiguous substrings, then fewer gaps.
/// Ties keep their input order.
pub fn filter_fuzzy(candidates: Vec<Suggestion>, word: &str) -> Vec<Suggestion> {
    if word.is_empty() {
        return candidates;
    }
    let needle = word.to_lowercase();
    let mut scored: Vec<(usize, usize, Suggestion)> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(i, s)| fuzzy_score(&s.text.to_lowercase(), &needle).map(|score| (score, i, s)))
        .collect();
    scored.sort_by_key(|(score, i, _)| (*score, *i));
    scored.into_iter().map(|(_, _, s)| s).collect()
}

/// Lower is better; `None` when `needle` is not a subsequence.
fn fuzzy_score(haystack: &str, needle: &str) -> Option<usize> {
    if haystack.starts_with(needle) {
        return Some(0);
    }
    if haystack.contains(needle) {
        return Some(1);
    }
    let mut gaps = 0;
    let mut adjacent = false;
    let mut wanted = needle.chars().peekable();
    for c in haystack.chars() {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
                if !adjacent {
                    gaps += 1;
                }
                adjacent = true;
            },
            Some(_) => adjacent = false,
            None => break,
        }
    }
    wanted.peek().is_none().then_some(2 + gaps)
}
