//! Exchange client trait and the data it returns.
//!
//! Prices and quantities stay as the decimal strings the exchange sends;
//! commands parse them only where they compute with them.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use mercator_types::error::{MercatorError, Result};

// ---------------------------------------------------------------------------
// Exchange metadata
// ---------------------------------------------------------------------------

/// One API rate limit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub rate_limit_type: String,
    pub interval: String,
    #[serde(default)]
    pub interval_num: u32,
    pub limit: u64,
}

/// A tradable market.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub base_asset_precision: usize,
    pub quote_asset: String,
    pub quote_precision: usize,
    pub order_types: Vec<String>,
    pub iceberg_allowed: bool,
    pub oco_allowed: bool,
    pub is_spot_trading_allowed: bool,
    pub is_margin_trading_allowed: bool,
}

impl SymbolInfo {
    /// Format an amount of the base asset at its precision.
    pub fn format_base(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.base_asset_precision)
    }

    /// Format a price in the quote asset at its precision.
    pub fn format_quote(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.quote_precision)
    }
}

/// Response of the exchange information endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExchangeInfo {
    pub timezone: String,
    /// Milliseconds since the Unix epoch.
    pub server_time: i64,
    pub rate_limits: Vec<RateLimit>,
    pub symbols: Vec<SymbolInfo>,
}

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

/// One order book level, sent as `["price", "qty"]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct PriceLevel {
    pub price: String,
    pub quantity: String,
}

impl From<(String, String)> for PriceLevel {
    fn from((price, quantity): (String, String)) -> Self {
        Self { price, quantity }
    }
}

/// Order book snapshot. Asks ascend from the best price, bids descend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderBook {
    pub last_update_id: u64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// A public trade of a market.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrade {
    pub id: u64,
    pub price: String,
    pub qty: String,
    pub time: i64,
    #[serde(default)]
    pub is_buyer_maker: bool,
}

/// Symbol and row limit for the trade listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuery {
    pub symbol: String,
    pub limit: u16,
}

// ---------------------------------------------------------------------------
// Account data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

impl Balance {
    /// Free plus locked.
    pub fn total(&self) -> Result<f64> {
        Ok(parse_amount(&self.free)? + parse_amount(&self.locked)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub maker_commission: i64,
    pub taker_commission: i64,
    pub buyer_commission: i64,
    pub seller_commission: i64,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    pub balances: Vec<Balance>,
}

/// A trade of the authenticated account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTrade {
    pub symbol: String,
    pub id: u64,
    pub price: String,
    pub qty: String,
    pub time: i64,
    pub is_buyer: bool,
}

/// Deposit and withdrawal terms of one asset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetDetail {
    #[serde(deserialize_with = "lenient_f64")]
    pub min_withdraw_amount: f64,
    pub deposit_status: bool,
    #[serde(deserialize_with = "lenient_f64")]
    pub withdraw_fee: f64,
    pub withdraw_status: bool,
    pub deposit_tip: String,
}

/// The endpoint mixes JSON numbers and decimal strings for amounts.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(v) => Ok(v),
        NumberOrText::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Parse a decimal string sent by the exchange.
pub fn parse_amount(text: &str) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| MercatorError::Exchange(format!("invalid decimal value: {text:?}")))
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

/// Read-only access to a spot exchange.
///
/// Every call is a single blocking request; no retries are attempted.
pub trait ExchangeClient {
    fn exchange_info(&self) -> Result<ExchangeInfo>;

    /// Latest price of every symbol, keyed by symbol.
    fn prices(&self) -> Result<HashMap<String, String>>;

    fn depth(&self, symbol: &str, limit: u16) -> Result<OrderBook>;

    /// Requires signed credentials.
    fn account(&self) -> Result<Account>;

    /// Requires signed credentials.
    fn account_trades(&self, query: &TradeQuery) -> Result<Vec<AccountTrade>>;

    /// Requires an API key.
    fn historical_trades(&self, query: &TradeQuery) -> Result<Vec<MarketTrade>>;

    fn recent_trades(&self, query: &TradeQuery) -> Result<Vec<MarketTrade>>;

    /// Requires signed credentials.
    fn asset_details(&self) -> Result<HashMap<String, AssetDetail>>;
}
