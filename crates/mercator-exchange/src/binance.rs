//! Blocking REST client for the Binance spot API.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use ring::hmac;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use mercator_types::config::BinanceConfig;
use mercator_types::error::{MercatorError, Result};

use crate::client::{
    Account, AccountTrade, AssetDetail, ExchangeClient, ExchangeInfo, MarketTrade, OrderBook,
    TickerPrice, TradeQuery,
};

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";
pub const PROXY_USER_VAR: &str = "PROXY_USER";
pub const PROXY_PASS_VAR: &str = "PROXY_PASS";
pub const PROXY_URL_VAR: &str = "HTTPS_PROXY";

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

// ---------------------------------------------------------------------------
// Credentials and proxy
// ---------------------------------------------------------------------------

/// API key pair used for keyed and signed endpoints.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read the key pair from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        let api_secret = lookup(API_SECRET_VAR).unwrap_or_default();
        if api_key.trim().is_empty() || api_secret.trim().is_empty() {
            return Err(MercatorError::failed(format!(
                "Binance scope requires env variables: {API_KEY_VAR} and {API_SECRET_VAR}"
            )));
        }
        Ok(Self {
            api_key,
            api_secret,
        })
    }
}

/// Authenticated proxy for all exchange traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub url: String,
    pub user: String,
    pub pass: String,
}

impl ProxySettings {
    pub fn from_env(config: &BinanceConfig) -> Result<Option<Self>> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// `None` unless both proxy credentials are present. The URL comes from
    /// the config, then `HTTPS_PROXY`.
    pub fn from_lookup(
        config: &BinanceConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let (Some(user), Some(pass)) = (non_empty(PROXY_USER_VAR), non_empty(PROXY_PASS_VAR)) else {
            return Ok(None);
        };
        let url = config
            .proxy_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| non_empty(PROXY_URL_VAR))
            .ok_or_else(|| {
                MercatorError::Config(format!(
                    "{PROXY_USER_VAR}/{PROXY_PASS_VAR} are set but no proxy url is configured \
                     (binance.proxy_url or {PROXY_URL_VAR})"
                ))
            })?;
        Ok(Some(Self { url, user, pass }))
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Hex HMAC-SHA256 of `payload` keyed by `secret`.
pub fn sign(secret: &str, payload: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hex::encode(hmac::sign(&key, payload.as_bytes()).as_ref())
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

fn http_error(err: reqwest::Error) -> MercatorError {
    MercatorError::Exchange(err.to_string())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct BinanceClient {
    http: Client,
    base_url: String,
    recv_window_ms: u64,
    credentials: Credentials,
}

impl BinanceClient {
    pub fn new(
        config: &BinanceConfig,
        credentials: Credentials,
        proxy: Option<ProxySettings>,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(proxy) = proxy {
            log::info!("Routing exchange traffic through proxy {}", proxy.url);
            let proxy = reqwest::Proxy::all(&proxy.url)
                .map_err(http_error)?
                .basic_auth(&proxy.user, &proxy.pass);
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(http_error)?;
        log::info!("Binance client ready for {}", config.base_url);
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recv_window_ms: config.recv_window_ms,
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_public<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        self.send(self.http.get(self.url(path)).query(params))
    }

    fn get_keyed<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let request = self
            .http
            .get(self.url(path))
            .query(params)
            .header(API_KEY_HEADER, &self.credentials.api_key);
        self.send(request)
    }

    /// Adds `recvWindow`, `timestamp`, and the signature over the query.
    fn get_signed<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let mut params = params.to_vec();
        params.push(("recvWindow", self.recv_window_ms.to_string()));
        params.push(("timestamp", chrono::Utc::now().timestamp_millis().to_string()));
        let query = query_string(&params);
        let signature = sign(&self.credentials.api_secret, &query);
        let url = format!("{}?{query}&signature={signature}", self.url(path));
        let request = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.credentials.api_key);
        self.send(request)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().map_err(http_error)?;
        let status = response.status();
        let body = response.text().map_err(http_error)?;
        log::debug!("Exchange responded {status} ({} bytes)", body.len());
        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiError>(&body) {
                Ok(api) => MercatorError::Exchange(format!("{} (code {})", api.msg, api.code)),
                Err(_) => MercatorError::Exchange(format!("HTTP {status}")),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl ExchangeClient for BinanceClient {
    fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.get_public("/api/v3/exchangeInfo", &[])
    }

    fn prices(&self) -> Result<HashMap<String, String>> {
        let tickers: Vec<TickerPrice> = self.get_public("/api/v3/ticker/price", &[])?;
        Ok(tickers.into_iter().map(|t| (t.symbol, t.price)).collect())
    }

    fn depth(&self, symbol: &str, limit: u16) -> Result<OrderBook> {
        self.get_public(
            "/api/v3/depth",
            &[("symbol", symbol.to_string()), ("limit", limit.to_string())],
        )
    }

    fn account(&self) -> Result<Account> {
        self.get_signed("/api/v3/account", &[])
    }

    fn account_trades(&self, query: &TradeQuery) -> Result<Vec<AccountTrade>> {
        self.get_signed("/api/v3/myTrades", &trade_params(query))
    }

    fn historical_trades(&self, query: &TradeQuery) -> Result<Vec<MarketTrade>> {
        self.get_keyed("/api/v3/historicalTrades", &trade_params(query))
    }

    fn recent_trades(&self, query: &TradeQuery) -> Result<Vec<MarketTrade>> {
        self.get_public("/api/v3/trades", &trade_params(query))
    }

    fn asset_details(&self) -> Result<HashMap<String, AssetDetail>> {
        self.get_signed("/sapi/v1/asset/assetDetail", &[])
    }
}

fn trade_params(query: &TradeQuery) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", query.symbol.clone()),
        ("limit", query.limit.to_string()),
    ]
}
