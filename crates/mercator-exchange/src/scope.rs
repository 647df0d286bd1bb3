//! The `binance` scope: construction, shared market context, and helpers
//! used by the command modules.

use std::collections::HashMap;
use std::rc::Rc;

use mercator_terminal::{CommandScope, Environment, Scope, ScopeFactory, ScopeMeta, SuggestionSource};
use mercator_types::config::BinanceConfig;
use mercator_types::error::{MercatorError, Result};

use crate::binance::{BinanceClient, Credentials, ProxySettings};
use crate::client::{ExchangeClient, parse_amount};
use crate::symbols::SymbolTable;
use crate::{account_commands, calc_commands, market_commands};

pub const PREFIX: &str = "binance";
pub const DESCRIPTION: &str = "Access Binance exchange information";

/// State shared by every command of one `binance` scope.
pub struct MarketContext {
    pub client: Rc<dyn ExchangeClient>,
    pub symbols: SymbolTable,
    pub depth_limit: u16,
    pub trade_limit: u16,
}

impl MarketContext {
    /// Latest prices keyed by symbol.
    pub fn prices(&self) -> Result<HashMap<String, String>> {
        self.client.prices()
    }
}

/// Look up and parse the price of `symbol`.
pub(crate) fn price_in(prices: &HashMap<String, String>, symbol: &str) -> Result<f64> {
    let text = prices
        .get(symbol)
        .ok_or_else(|| MercatorError::failed(format!("unknown symbol: {symbol}")))?;
    parse_amount(text)
        .map_err(|_| MercatorError::failed(format!("could not convert price: {symbol} {text}")))
}

/// Exchange timestamps (ms) in local time, second resolution.
pub(crate) fn local_time(millis: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(t) => t
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
        None => millis.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Suggestion sources
// ---------------------------------------------------------------------------

pub(crate) fn symbol_names(ctx: &Rc<MarketContext>) -> impl SuggestionSource + 'static {
    let ctx = Rc::clone(ctx);
    move |_: &Environment, _: &[String]| ctx.symbols.names().to_vec()
}

/// Base assets, or quote assets once `--quote` has been typed.
pub(crate) fn asset_names(ctx: &Rc<MarketContext>) -> impl SuggestionSource + 'static {
    let ctx = Rc::clone(ctx);
    move |_: &Environment, args: &[String]| {
        if args.iter().any(|a| a == "--quote") {
            ctx.symbols.quote_assets()
        } else {
            ctx.symbols.base_assets()
        }
    }
}

/// Symbols, once `flag` has been typed.
pub(crate) fn symbols_after(ctx: &Rc<MarketContext>, flag: &'static str) -> impl SuggestionSource + 'static {
    let ctx = Rc::clone(ctx);
    move |_: &Environment, args: &[String]| {
        if args.iter().any(|a| a == flag) {
            ctx.symbols.names().to_vec()
        } else {
            Vec::new()
        }
    }
}

/// Base assets, once `flag` has been typed.
pub(crate) fn assets_after(ctx: &Rc<MarketContext>, flag: &'static str) -> impl SuggestionSource + 'static {
    let ctx = Rc::clone(ctx);
    move |_: &Environment, args: &[String]| {
        if args.iter().any(|a| a == flag) {
            ctx.symbols.base_assets()
        } else {
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the scope over an already constructed client.
///
/// Loads the symbol list once; a failure aborts construction.
pub fn build_scope(client: Rc<dyn ExchangeClient>, config: &BinanceConfig) -> Result<CommandScope> {
    let info = client.exchange_info().map_err(|e| {
        log::warn!("Exchange info request failed: {e}");
        MercatorError::failed("failed to list symbols")
    })?;
    let symbols = SymbolTable::new(info.symbols);
    if symbols.is_empty() {
        log::warn!("Exchange listed no symbols");
    } else {
        log::info!("Loaded {} symbols", symbols.len());
    }

    let ctx = Rc::new(MarketContext {
        client,
        symbols,
        depth_limit: config.depth_limit,
        trade_limit: config.trade_limit,
    });

    let mut commands = market_commands::commands(&ctx);
    commands.extend(account_commands::commands(&ctx));
    commands.extend(calc_commands::commands(&ctx));
    CommandScope::new(PREFIX, DESCRIPTION, commands)
}

/// Builds the `binance` scope from environment credentials.
pub struct BinanceScopeFactory {
    config: BinanceConfig,
}

impl BinanceScopeFactory {
    pub fn new(config: BinanceConfig) -> Self {
        Self { config }
    }
}

impl ScopeFactory for BinanceScopeFactory {
    fn meta(&self) -> ScopeMeta {
        ScopeMeta {
            prefix: PREFIX.to_string(),
            description: DESCRIPTION.to_string(),
        }
    }

    fn build(&self) -> Result<Box<dyn Scope>> {
        let credentials = Credentials::from_env()?;
        let proxy = ProxySettings::from_env(&self.config)?;
        let client = BinanceClient::new(&self.config, credentials, proxy)?;
        Ok(build_scope(Rc::new(client), &self.config)?.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExchange;
    use crate::test_utils::{console, run};

    #[test]
    fn failed_symbol_listing_aborts_construction() {
        let client: Rc<dyn ExchangeClient> = Rc::new(MockExchange::failing("timeout"));
        let err = build_scope(client, &BinanceConfig::default()).unwrap_err();
        assert_eq!(format!("{err}"), "failed to list symbols");
    }

    #[test]
    fn symbol_list_loaded_once() {
        let mock = Rc::new(MockExchange::sample());
        let client: Rc<dyn ExchangeClient> = Rc::clone(&mock) as Rc<dyn ExchangeClient>;
        let mut env = console(client);
        run(&mut env, "symbol-detail --symbol ETHBTC").unwrap();
        run(&mut env, "symbol-detail --symbol LTCBTC").unwrap();
        assert_eq!(
            mock.calls().iter().filter(|c| *c == "exchange_info").count(),
            1
        );
    }

    #[test]
    fn scope_carries_every_command() {
        let client: Rc<dyn ExchangeClient> = Rc::new(MockExchange::sample());
        let scope = build_scope(client, &BinanceConfig::default()).unwrap();
        let root = scope.root_command();
        for name in [
            "rate-limits",
            "server-time",
            "symbol-price",
            "asset-price",
            "compare",
            "depth",
            "account-info",
            "account-balance",
            "account-trades",
            "historical-market-trades",
            "recent-market-trades",
            "asset-detail",
            "symbol-detail",
            "shares",
            "risk",
            "current-value",
            "future-value",
            "help",
            "exit",
            "quit",
        ] {
            assert!(root.find_child(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn price_lookup_errors() {
        let mut prices = HashMap::new();
        prices.insert("ETHBTC".to_string(), "abc".to_string());
        assert_eq!(
            format!("{}", price_in(&prices, "XYZ").unwrap_err()),
            "unknown symbol: XYZ"
        );
        assert_eq!(
            format!("{}", price_in(&prices, "ETHBTC").unwrap_err()),
            "could not convert price: ETHBTC abc"
        );
    }

    #[test]
    fn factory_meta() {
        let factory = BinanceScopeFactory::new(BinanceConfig::default());
        assert_eq!(factory.meta().prefix, "binance");
    }

    #[test]
    fn completion_offers_symbols_after_flag() {
        let env = console(Rc::new(MockExchange::sample()));
        let got: Vec<String> = env
            .complete("account-trades --symbol ", "")
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert!(got.contains(&"ETHBTC".to_string()));
        let got = env.complete("depth ", "");
        assert!(got.iter().any(|s| s.text == "LTCBTC"));
        assert!(got.iter().any(|s| s.text == "--limit"));
    }
}
