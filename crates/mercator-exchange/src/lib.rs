//! Binance exchange scope.
//!
//! [`BinanceScopeFactory`] reads credentials from the environment, loads the
//! symbol list once, and builds a `binance` scope whose commands query the
//! exchange through an [`ExchangeClient`].

mod account_commands;
pub mod binance;
pub mod calc;
mod calc_commands;
pub mod client;
mod market_commands;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod scope;
pub mod symbols;

#[cfg(test)]
pub(crate) mod test_utils;

pub use binance::{BinanceClient, Credentials, ProxySettings};
pub use client::ExchangeClient;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockExchange;
pub use scope::{BinanceScopeFactory, build_scope};
pub use symbols::SymbolTable;
