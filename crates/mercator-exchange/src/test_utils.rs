//! Shared helpers for exchange command tests.

use std::rc::Rc;

use mercator_terminal::{CommandOutput, Environment, render};
use mercator_types::config::BinanceConfig;
use mercator_types::error::Result;

use crate::client::ExchangeClient;
use crate::scope::build_scope;

/// An environment whose only scope is `binance` over `client`.
pub fn console(client: Rc<dyn ExchangeClient>) -> Environment {
    let config = BinanceConfig {
        depth_limit: 10,
        trade_limit: 50,
        ..BinanceConfig::default()
    };
    let scope = build_scope(client, &config).expect("scope builds over mock exchange");
    Environment::new(scope.boxed())
}

/// Execute `line` and return its rendered output without color codes.
pub fn run(env: &mut Environment, line: &str) -> Result<String> {
    let output = env.execute(line)?;
    let mut buf = Vec::new();
    render(&output, &mut buf)?;
    if let CommandOutput::Exit = output {
        return Ok("<exit>".to_string());
    }
    Ok(plain(&String::from_utf8_lossy(&buf)))
}

/// Strip ANSI escape sequences.
pub fn plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
