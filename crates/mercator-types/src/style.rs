//! Terminal color helpers.
//!
//! Command bodies style their text through these functions so the palette
//! stays consistent across scopes. Coloring follows `colored`'s global
//! switch (`NO_COLOR`, `CLICOLOR_FORCE`, non-terminal output).

use colored::Colorize;
use unicode_width::UnicodeWidthChar;

/// Field label (light green).
pub fn label(text: &str) -> String {
    text.bright_green().to_string()
}

/// Section heading (light white).
pub fn heading(text: &str) -> String {
    text.bright_white().bold().to_string()
}

/// Asset or currency name (light blue).
pub fn asset(text: &str) -> String {
    text.bright_blue().to_string()
}

/// Secondary field label (light yellow).
pub fn sublabel(text: &str) -> String {
    text.bright_yellow().to_string()
}

/// Positive marker (green).
pub fn good(text: &str) -> String {
    text.green().to_string()
}

/// Negative marker (red).
pub fn bad(text: &str) -> String {
    text.red().to_string()
}

/// Ask side of an order book (magenta).
pub fn ask(text: &str) -> String {
    text.magenta().to_string()
}

/// Bid side of an order book (cyan).
pub fn bid(text: &str) -> String {
    text.cyan().to_string()
}

/// De-emphasized text (gray).
pub fn dim(text: &str) -> String {
    text.bright_black().to_string()
}

/// Warning line printed when a command is aborted.
pub fn warning(text: &str) -> String {
    text.yellow().to_string()
}

/// `true` in green, `false` in red.
pub fn boolean(value: bool) -> String {
    if value { good("true") } else { bad("false") }
}

/// A `label: value` line.
pub fn info(name: &str, value: impl std::fmt::Display) -> String {
    format!("{}: {value}", label(name))
}

/// Terminal column width of `text` ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequence: ESC '[' params final-byte
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += c.width().unwrap_or(0);
        }
    }
    width
}
