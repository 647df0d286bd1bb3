//! Command results and their rendering to the console.

use std::io::{self, Write};

use mercator_types::style;

use crate::scope::Scope;

/// Output produced by a command.
///
/// The signal variants are applied by the [`Environment`](crate::Environment)
/// after the command body has returned; they never reach the renderer.
#[derive(Debug)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Tabular data (header row + data rows).
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Command produced no visible output.
    None,
    /// Signal to push a freshly built scope.
    PushScope(Box<dyn Scope>),
    /// Signal to pop the active scope (`exit`).
    PopScope,
    /// Signal to leave the console from any depth (`quit`).
    Quit,
    /// The console should terminate; returned by the environment only.
    Exit,
}

impl CommandOutput {
    /// Join lines into a single text output.
    pub fn lines(lines: Vec<String>) -> Self {
        Self::Text(lines.join("\n"))
    }
}

/// What the read loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Write a command's visible output. Signals and `None` print nothing.
pub fn render<W: Write>(output: &CommandOutput, out: &mut W) -> io::Result<()> {
    match output {
        CommandOutput::Text(text) => writeln!(out, "{text}"),
        CommandOutput::Table { headers, rows } => {
            for line in table_lines(headers, rows) {
                writeln!(out, "{line}")?;
            }
            Ok(())
        },
        CommandOutput::None
        | CommandOutput::PushScope(_)
        | CommandOutput::PopScope
        | CommandOutput::Quit
        | CommandOutput::Exit => Ok(()),
    }
}

/// Box-drawn table with upper-cased headers and left-aligned cells.
pub fn table_lines(headers: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let headers: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&headers).chain(rows) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(style::visible_width(cell));
        }
    }

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line
    };
    let format_row = |row: &[String]| {
        let mut line = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let pad = w - style::visible_width(cell);
            line.push_str(&format!(" {cell}{} |", " ".repeat(pad)));
        }
        line
    };

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(border.clone());
    if !headers.is_empty() {
        lines.push(format_row(&headers));
        lines.push(border.clone());
    }
    for row in rows {
        lines.push(format_row(row));
    }
    lines.push(border);
    lines
}
