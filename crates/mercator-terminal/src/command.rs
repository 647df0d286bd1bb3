//! Command tree nodes, flag declarations, and per-invocation argument parsing.
//!
//! A scope's commands form a tree of [`CommandNode`]s built once when the
//! scope is constructed. Each invocation parses its tokens into a fresh
//! [`ParsedArgs`]; run bodies never keep flag state between calls.

use std::collections::{HashMap, HashSet};
use std::fmt;

use mercator_types::error::{MercatorError, Result};

use crate::environment::Environment;
use crate::output::CommandOutput;

/// Value type accepted by a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Float,
    Int,
    Text,
    Bool,
}

impl FlagKind {
    /// Type name shown in usage text.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Text => "string",
            Self::Bool => "bool",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Float => "a number",
            Self::Int => "an integer",
            Self::Text => "a string",
            Self::Bool => "true or false",
        }
    }
}

/// A typed flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Float(f64),
    Int(i64),
    Text(String),
    Bool(bool),
}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            Self::Float(_) => FlagKind::Float,
            Self::Int(_) => FlagKind::Int,
            Self::Text(_) => FlagKind::Text,
            Self::Bool(_) => FlagKind::Bool,
        }
    }

    fn parse(kind: FlagKind, raw: &str) -> Option<Self> {
        match kind {
            FlagKind::Float => raw.parse().ok().filter(|v: &f64| v.is_finite()).map(Self::Float),
            FlagKind::Int => raw.parse().ok().map(Self::Int),
            FlagKind::Text => Some(Self::Text(raw.to_string())),
            FlagKind::Bool => match raw {
                "true" | "1" => Some(Self::Bool(true)),
                "false" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Declaration of a single `--flag`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    name: String,
    short: Option<char>,
    default: FlagValue,
    usage: String,
    required: bool,
}

impl FlagSpec {
    fn new(name: &str, default: FlagValue, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            default,
            usage: usage.to_string(),
            required: false,
        }
    }

    pub fn float(name: &str, default: f64, usage: &str) -> Self {
        Self::new(name, FlagValue::Float(default), usage)
    }

    pub fn int(name: &str, default: i64, usage: &str) -> Self {
        Self::new(name, FlagValue::Int(default), usage)
    }

    pub fn text(name: &str, default: &str, usage: &str) -> Self {
        Self::new(name, FlagValue::Text(default.to_string()), usage)
    }

    /// Boolean switch, `false` unless given.
    pub fn switch(name: &str, usage: &str) -> Self {
        Self::new(name, FlagValue::Bool(false), usage)
    }

    /// Single-letter alias (`-i` for `--inv`).
    pub fn short(mut self, alias: char) -> Self {
        self.short = Some(alias);
        self
    }

    /// The command fails before its body runs unless this flag is given.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_alias(&self) -> Option<char> {
        self.short
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> FlagKind {
        self.default.kind()
    }
}

/// Positional argument count rule, checked after flags are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    #[default]
    Any,
    Exact(usize),
    Minimum(usize),
    Maximum(usize),
}

impl Arity {
    pub fn check(self, count: usize) -> Result<()> {
        let message = match self {
            Self::Any => return Ok(()),
            Self::Exact(n) if count != n => {
                format!("accepts {n} arg(s), received {count}")
            },
            Self::Minimum(n) if count < n => {
                format!("requires at least {n} arg(s), only received {count}")
            },
            Self::Maximum(n) if count > n => {
                format!("accepts at most {n} arg(s), received {count}")
            },
            _ => return Ok(()),
        };
        Err(MercatorError::Arity(message))
    }
}

/// Flags and positional arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    positional: Vec<String>,
    values: HashMap<String, FlagValue>,
    set: HashSet<String>,
}

impl ParsedArgs {
    /// Parse `args` against the declared `flags`.
    ///
    /// Accepts `--name value`, `--name=value`, `-x value`, bare boolean
    /// switches, and `--` to end flag parsing. Undeclared flags are errors.
    pub fn parse(flags: &[FlagSpec], args: &[String]) -> Result<Self> {
        let mut parsed = Self {
            values: flags
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
            ..Self::default()
        };

        let mut iter = args.iter();
        let mut flags_done = false;
        while let Some(arg) = iter.next() {
            if flags_done {
                parsed.positional.push(arg.clone());
                continue;
            }
            if arg == "--" {
                flags_done = true;
                continue;
            }
            if let Some(long) = arg.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (long, None),
                };
                let spec = flags
                    .iter()
                    .find(|f| f.name == name)
                    .ok_or_else(|| MercatorError::UnknownFlag(format!("--{name}")))?;
                parsed.assign(spec, inline, &mut iter)?;
            } else if let Some(alias) = short_flag(arg) {
                let spec = flags
                    .iter()
                    .find(|f| f.short == Some(alias))
                    .ok_or_else(|| MercatorError::UnknownFlag(arg.clone()))?;
                parsed.assign(spec, None, &mut iter)?;
            } else {
                parsed.positional.push(arg.clone());
            }
        }
        Ok(parsed)
    }

    fn assign<'a>(
        &mut self,
        spec: &FlagSpec,
        inline: Option<&str>,
        rest: &mut impl Iterator<Item = &'a String>,
    ) -> Result<()> {
        let kind = spec.kind();
        let raw = match (inline, kind) {
            (Some(raw), _) => raw.to_string(),
            (None, FlagKind::Bool) => "true".to_string(),
            (None, _) => rest
                .next()
                .cloned()
                .ok_or_else(|| MercatorError::MissingFlagValue(spec.name.clone()))?,
        };
        let value = FlagValue::parse(kind, &raw).ok_or_else(|| MercatorError::InvalidFlagValue {
            flag: spec.name.clone(),
            value: raw.clone(),
            expected: kind.expected(),
        })?;
        self.values.insert(spec.name.clone(), value);
        self.set.insert(spec.name.clone());
        Ok(())
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Whether the flag was given explicitly in this invocation.
    pub fn is_set(&self, name: &str) -> bool {
        self.set.contains(name)
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.value(name)? {
            FlagValue::Float(v) => Ok(*v),
            other => Err(wrong_kind(name, FlagKind::Float, other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.value(name)? {
            FlagValue::Int(v) => Ok(*v),
            other => Err(wrong_kind(name, FlagKind::Int, other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.value(name)? {
            FlagValue::Text(v) => Ok(v),
            other => Err(wrong_kind(name, FlagKind::Text, other)),
        }
    }

    pub fn switch(&self, name: &str) -> Result<bool> {
        match self.value(name)? {
            FlagValue::Bool(v) => Ok(*v),
            other => Err(wrong_kind(name, FlagKind::Bool, other)),
        }
    }

    fn value(&self, name: &str) -> Result<&FlagValue> {
        self.values
            .get(name)
            .ok_or_else(|| MercatorError::Definition(format!("flag --{name} is not declared")))
    }
}

fn wrong_kind(name: &str, wanted: FlagKind, found: &FlagValue) -> MercatorError {
    MercatorError::Definition(format!(
        "flag --{name} is a {} flag, not {}",
        found.kind().type_name(),
        wanted.type_name()
    ))
}

/// `-x` where `x` is a letter; `-5` stays positional.
fn short_flag(arg: &str) -> Option<char> {
    let mut chars = arg.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

/// Produces candidate strings for a command's arguments while the user types.
///
/// Called on every keystroke with the tokens typed after the command name.
pub trait SuggestionSource {
    fn suggest(&self, env: &Environment, args: &[String]) -> Vec<String>;
}

impl<F> SuggestionSource for F
where
    F: Fn(&Environment, &[String]) -> Vec<String>,
{
    fn suggest(&self, env: &Environment, args: &[String]) -> Vec<String> {
        self(env, args)
    }
}

/// Body of a runnable command.
pub type RunFn = Box<dyn Fn(&ParsedArgs) -> Result<CommandOutput>>;

/// One named entry of a scope's command tree.
pub struct CommandNode {
    name: String,
    short: String,
    long: Option<String>,
    args_hint: Option<String>,
    flags: Vec<FlagSpec>,
    arity: Arity,
    valid_args: Vec<String>,
    eager: bool,
    suggestions: Option<Box<dyn SuggestionSource>>,
    run: Option<RunFn>,
    children: Vec<CommandNode>,
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("arity", &self.arity)
            .field("runnable", &self.run.is_some())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl CommandNode {
    pub fn new(name: &str, short: &str) -> Self {
        Self {
            name: name.to_string(),
            short: short.to_string(),
            long: None,
            args_hint: None,
            flags: Vec::new(),
            arity: Arity::Any,
            valid_args: Vec::new(),
            eager: false,
            suggestions: None,
            run: None,
            children: Vec::new(),
        }
    }

    /// Extended description shown by `help <command>`.
    pub fn long(mut self, text: &str) -> Self {
        self.long = Some(text.trim().to_string());
        self
    }

    /// Positional placeholder for the usage line, e.g. `<SYMBOL>...`.
    pub fn args_hint(mut self, hint: &str) -> Self {
        self.args_hint = Some(hint.to_string());
        self
    }

    pub fn flag(mut self, spec: FlagSpec) -> Self {
        self.flags.push(spec);
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Fixed list of positional values offered by completion.
    pub fn valid_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Offer argument suggestions as soon as the command name is complete.
    pub fn eager_suggestions(mut self) -> Self {
        self.eager = true;
        self
    }

    pub fn suggestions(mut self, source: impl SuggestionSource + 'static) -> Self {
        self.suggestions = Some(Box::new(source));
        self
    }

    pub fn run(mut self, body: impl Fn(&ParsedArgs) -> Result<CommandOutput> + 'static) -> Self {
        self.run = Some(Box::new(body));
        self
    }

    pub fn child(mut self, node: CommandNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children_from(mut self, nodes: impl IntoIterator<Item = CommandNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn valid_arg_list(&self) -> &[String] {
        &self.valid_args
    }

    pub fn is_eager(&self) -> bool {
        self.eager
    }

    pub fn suggestion_source(&self) -> Option<&dyn SuggestionSource> {
        self.suggestions.as_deref()
    }

    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn find_child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Check the naming invariants of this subtree.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.contains(char::is_whitespace) {
            return Err(MercatorError::Definition(format!(
                "invalid command name {:?}",
                self.name
            )));
        }

        let mut flag_names = HashSet::new();
        let mut aliases = HashSet::new();
        for flag in &self.flags {
            if !flag_names.insert(flag.name.as_str()) {
                return Err(MercatorError::Definition(format!(
                    "duplicate flag --{} on {}",
                    flag.name, self.name
                )));
            }
            if let Some(alias) = flag.short
                && !aliases.insert(alias)
            {
                return Err(MercatorError::Definition(format!(
                    "duplicate flag alias -{alias} on {}",
                    self.name
                )));
            }
        }

        let mut child_names = HashSet::new();
        for child in &self.children {
            if !child_names.insert(child.name.as_str()) {
                return Err(MercatorError::Definition(format!(
                    "duplicate command {} under {}",
                    child.name, self.name
                )));
            }
            child.validate()?;
        }
        Ok(())
    }

    /// Parse, validate, and run this command with the given argument tokens.
    ///
    /// Order: flags, then required flags, then arity, then the body.
    pub fn invoke(&self, args: &[String]) -> Result<CommandOutput> {
        let parsed = ParsedArgs::parse(&self.flags, args)?;
        if let Some(missing) = self
            .flags
            .iter()
            .find(|f| f.required && !parsed.is_set(&f.name))
        {
            return Err(MercatorError::RequiredFlag(missing.name.clone()));
        }
        self.arity.check(parsed.positional().len())?;
        match &self.run {
            Some(body) => body(&parsed),
            None => Ok(CommandOutput::None),
        }
    }

    /// Usage text for this node; `path` is the command path as typed.
    pub fn usage(&self, path: &str) -> String {
        let mut out = String::new();
        out.push_str(self.long.as_deref().unwrap_or(&self.short));
        out.push_str("\n\nUsage:\n");
        if self.is_runnable() {
            out.push_str(&format!("  {path}"));
            if !self.flags.is_empty() {
                out.push_str(" [flags]");
            }
            if let Some(hint) = &self.args_hint {
                out.push(' ');
                out.push_str(hint);
            }
            out.push('\n');
        }
        if !self.children.is_empty() {
            out.push_str(&format!("  {path} [command]\n"));
            out.push_str("\nAvailable Commands:\n");
            let width = self.children.iter().map(|c| c.name.len()).max().unwrap_or(0);
            for child in &self.children {
                out.push_str(&format!("  {:width$}  {}\n", child.name, child.short));
            }
        }
        if !self.flags.is_empty() {
            out.push_str("\nFlags:\n");
            let cells: Vec<String> = self
                .flags
                .iter()
                .map(|f| {
                    let alias = f.short.map(|c| format!("-{c}, ")).unwrap_or_else(|| "    ".to_string());
                    format!("{alias}--{} {}", f.name, f.kind().type_name())
                })
                .collect();
            let width = cells.iter().map(String::len).max().unwrap_or(0);
            for (cell, flag) in cells.iter().zip(&self.flags) {
                let mut line = format!("  {cell:width$}   {}", flag.usage);
                if flag.required {
                    line.push_str(" (required)");
                } else if !matches!(flag.default, FlagValue::Bool(false)) {
                    line.push_str(&format!(" (default {})", flag.default));
                }
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn risk_flags() -> Vec<FlagSpec> {
        vec![
            FlagSpec::float("inv", 0.0, "Investment amount").short('i').required(),
            FlagSpec::float("ratio", 2.0, "Risk/reward ratio"),
            FlagSpec::int("limit", 50, "Number of results"),
            FlagSpec::text("symbol", "", "Symbol filter"),
            FlagSpec::switch("verbose", "Verbose output"),
        ]
    }

    #[test]
    fn parse_long_short_and_inline_flags() {
        let parsed = ParsedArgs::parse(
            &risk_flags(),
            &strings(&["BTCUSDT", "-i", "100", "--ratio=3.5", "--symbol", "ETHBTC"]),
        )
        .unwrap();
        assert_eq!(parsed.positional(), &["BTCUSDT".to_string()]);
        assert_eq!(parsed.float("inv").unwrap(), 100.0);
        assert_eq!(parsed.float("ratio").unwrap(), 3.5);
        assert_eq!(parsed.text("symbol").unwrap(), "ETHBTC");
        assert!(parsed.is_set("inv"));
        assert!(!parsed.is_set("limit"));
    }

    #[test]
    fn defaults_fill_unset_flags() {
        let parsed = ParsedArgs::parse(&risk_flags(), &[]).unwrap();
        assert_eq!(parsed.float("ratio").unwrap(), 2.0);
        assert_eq!(parsed.int("limit").unwrap(), 50);
        assert!(!parsed.switch("verbose").unwrap());
        assert!(!parsed.is_set("ratio"));
    }

    #[test]
    fn bare_switch_is_true() {
        let parsed = ParsedArgs::parse(&risk_flags(), &strings(&["--verbose", "x"])).unwrap();
        assert!(parsed.switch("verbose").unwrap());
        assert_eq!(parsed.positional(), &["x".to_string()]);
    }

    #[test]
    fn double_dash_ends_flags() {
        let parsed = ParsedArgs::parse(&risk_flags(), &strings(&["--", "--inv", "-i"])).unwrap();
        assert_eq!(parsed.positional().len(), 2);
        assert!(!parsed.is_set("inv"));
    }

    #[test]
    fn negative_number_is_positional() {
        let parsed = ParsedArgs::parse(&risk_flags(), &strings(&["-5"])).unwrap();
        assert_eq!(parsed.arg(0), Some("-5"));
    }

    #[test]
    fn negative_flag_value_is_consumed() {
        let parsed = ParsedArgs::parse(&risk_flags(), &strings(&["--ratio", "-1"])).unwrap();
        assert_eq!(parsed.float("ratio").unwrap(), -1.0);
    }

    #[test]
    fn unknown_flag_rejected() {
        let err = ParsedArgs::parse(&risk_flags(), &strings(&["--nope"])).unwrap_err();
        assert_eq!(format!("{err}"), "unknown flag: --nope");
        let err = ParsedArgs::parse(&risk_flags(), &strings(&["-z"])).unwrap_err();
        assert_eq!(format!("{err}"), "unknown flag: -z");
    }

    #[test]
    fn missing_value_rejected() {
        let err = ParsedArgs::parse(&risk_flags(), &strings(&["--inv"])).unwrap_err();
        assert!(matches!(err, MercatorError::MissingFlagValue(name) if name == "inv"));
    }

    #[test]
    fn invalid_value_rejected() {
        let err = ParsedArgs::parse(&risk_flags(), &strings(&["--limit", "ten"])).unwrap_err();
        assert!(format!("{err}").contains("expected an integer"));
        let err = ParsedArgs::parse(&risk_flags(), &strings(&["--inv", "NaN"])).unwrap_err();
        assert!(format!("{err}").contains("expected a number"));
    }

    #[test]
    fn later_flag_overrides_earlier() {
        let parsed =
            ParsedArgs::parse(&risk_flags(), &strings(&["--limit", "5", "--limit", "7"])).unwrap();
        assert_eq!(parsed.int("limit").unwrap(), 7);
    }

    #[test]
    fn wrong_accessor_is_definition_error() {
        let parsed = ParsedArgs::parse(&risk_flags(), &[]).unwrap();
        assert!(matches!(parsed.int("inv"), Err(MercatorError::Definition(_))));
        assert!(matches!(parsed.float("missing"), Err(MercatorError::Definition(_))));
    }

    #[test]
    fn arity_rules() {
        assert!(Arity::Any.check(9).is_ok());
        assert!(Arity::Exact(1).check(1).is_ok());
        assert_eq!(
            format!("{}", Arity::Exact(3).check(2).unwrap_err()),
            "accepts 3 arg(s), received 2"
        );
        assert!(Arity::Minimum(1).check(0).is_err());
        assert!(Arity::Minimum(1).check(4).is_ok());
        assert!(Arity::Maximum(1).check(2).is_err());
        assert!(Arity::Maximum(1).check(0).is_ok());
    }

    #[test]
    fn invoke_checks_required_before_arity() {
        let node = CommandNode::new("risk", "Calculate risk")
            .flag(FlagSpec::float("inv", 0.0, "Investment amount").required())
            .arity(Arity::Exact(1))
            .run(|_| Ok(CommandOutput::Text("ran".into())));
        let err = node.invoke(&[]).unwrap_err();
        assert!(matches!(err, MercatorError::RequiredFlag(name) if name == "inv"));
        let err = node.invoke(&strings(&["--inv", "5"])).unwrap_err();
        assert!(matches!(err, MercatorError::Arity(_)));
        match node.invoke(&strings(&["--inv", "5", "BTCUSDT"])).unwrap() {
            CommandOutput::Text(s) => assert_eq!(s, "ran"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn each_invocation_starts_from_defaults() {
        let node = CommandNode::new("limit", "Echo the limit")
            .flag(FlagSpec::int("limit", 50, "Number of results"))
            .run(|args| Ok(CommandOutput::Text(args.int("limit")?.to_string())));
        let first = node.invoke(&strings(&["--limit", "5"])).unwrap();
        let second = node.invoke(&[]).unwrap();
        assert!(matches!(first, CommandOutput::Text(ref s) if s == "5"));
        assert!(matches!(second, CommandOutput::Text(ref s) if s == "50"));
    }

    #[test]
    fn validate_rejects_duplicate_children() {
        let node = CommandNode::new("root", "")
            .child(CommandNode::new("depth", ""))
            .child(CommandNode::new("depth", ""));
        assert!(matches!(node.validate(), Err(MercatorError::Definition(_))));
    }

    #[test]
    fn validate_rejects_duplicate_flags() {
        let node = CommandNode::new("shares", "")
            .flag(FlagSpec::float("inv", 0.0, "").short('i'))
            .flag(FlagSpec::float("price", 0.0, "").short('i'));
        assert!(node.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_names() {
        assert!(CommandNode::new("", "").validate().is_err());
        assert!(CommandNode::new("two words", "").validate().is_err());
        let nested = CommandNode::new("use", "").child(CommandNode::new("", ""));
        assert!(nested.validate().is_err());
    }

    #[test]
    fn usage_lists_flags_and_children() {
        let node = CommandNode::new("shares", "Calculate shares")
            .args_hint("[SYMBOL]")
            .flag(FlagSpec::float("inv", 0.0, "Investment amount").short('i').required())
            .flag(FlagSpec::float("price", 1.0, "Buy price").short('p'))
            .run(|_| Ok(CommandOutput::None));
        let text = node.usage("shares");
        assert!(text.starts_with("Calculate shares"));
        assert!(text.contains("shares [flags] [SYMBOL]"));
        assert!(text.contains("-i, --inv float"));
        assert!(text.contains("(required)"));
        assert!(text.contains("(default 1)"));

        let group = CommandNode::new("use", "Change scope").child(CommandNode::new("binance", "Exchange"));
        let text = group.usage("use");
        assert!(text.contains("use [command]"));
        assert!(text.contains("binance  Exchange"));
    }
}
