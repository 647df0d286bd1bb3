//! In-memory exchange for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use mercator_types::error::{MercatorError, Result};

use crate::client::{
    Account, AccountTrade, AssetDetail, Balance, ExchangeClient, ExchangeInfo, MarketTrade,
    OrderBook, PriceLevel, RateLimit, SymbolInfo, TradeQuery,
};

/// Canned responses; every call is recorded by name.
#[derive(Debug, Default)]
pub struct MockExchange {
    pub info: ExchangeInfo,
    pub prices: HashMap<String, String>,
    pub books: HashMap<String, OrderBook>,
    pub account: Account,
    pub account_trades: Vec<AccountTrade>,
    pub market_trades: Vec<MarketTrade>,
    pub assets: HashMap<String, AssetDetail>,
    /// When set, every call fails with this exchange error.
    pub fail_with: Option<String>,
    calls: RefCell<Vec<String>>,
}

fn market(symbol: &str, base: &str, quote: &str, base_precision: usize, quote_precision: usize) -> SymbolInfo {
    SymbolInfo {
        symbol: symbol.to_string(),
        status: "TRADING".to_string(),
        base_asset: base.to_string(),
        base_asset_precision: base_precision,
        quote_asset: quote.to_string(),
        quote_precision,
        order_types: vec!["LIMIT".to_string(), "MARKET".to_string()],
        iceberg_allowed: true,
        oco_allowed: false,
        is_spot_trading_allowed: true,
        is_margin_trading_allowed: false,
    }
}

fn level(price: &str, quantity: &str) -> PriceLevel {
    PriceLevel {
        price: price.to_string(),
        quantity: quantity.to_string(),
    }
}

impl MockExchange {
    /// A small market: ETHBTC, BTCUSDT, ETHUSDT, LTCBTC.
    pub fn sample() -> Self {
        let symbols = vec![
            market("ETHBTC", "ETH", "BTC", 8, 6),
            market("BTCUSDT", "BTC", "USDT", 8, 2),
            market("ETHUSDT", "ETH", "USDT", 8, 2),
            market("LTCBTC", "LTC", "BTC", 8, 6),
        ];
        let prices = [
            ("ETHBTC", "0.05000000"),
            ("BTCUSDT", "60000.00000000"),
            ("ETHUSDT", "3000.00000000"),
            ("LTCBTC", "0.00150000"),
        ]
        .into_iter()
        .map(|(s, p)| (s.to_string(), p.to_string()))
        .collect();

        let mut books = HashMap::new();
        books.insert(
            "ETHBTC".to_string(),
            OrderBook {
                last_update_id: 1,
                bids: vec![level("0.04990000", "12.50000000"), level("0.04980000", "3.00000000")],
                asks: vec![level("0.05010000", "1.25000000"), level("0.05020000", "7.00000000")],
            },
        );

        let mut assets = HashMap::new();
        assets.insert(
            "ETH".to_string(),
            AssetDetail {
                min_withdraw_amount: 0.01,
                deposit_status: true,
                withdraw_fee: 0.005,
                withdraw_status: false,
                deposit_tip: "Wait for 12 confirmations".to_string(),
            },
        );

        Self {
            info: ExchangeInfo {
                timezone: "UTC".to_string(),
                server_time: 1_565_246_363_776,
                rate_limits: vec![RateLimit {
                    rate_limit_type: "REQUEST_WEIGHT".to_string(),
                    interval: "MINUTE".to_string(),
                    interval_num: 1,
                    limit: 1200,
                }],
                symbols,
            },
            prices,
            books,
            account: Account {
                maker_commission: 10,
                taker_commission: 10,
                buyer_commission: 0,
                seller_commission: 0,
                can_trade: true,
                can_withdraw: false,
                can_deposit: true,
                balances: vec![
                    Balance {
                        asset: "BTC".to_string(),
                        free: "0.50000000".to_string(),
                        locked: "0.25000000".to_string(),
                    },
                    Balance {
                        asset: "LTC".to_string(),
                        free: "0.00000000".to_string(),
                        locked: "0.00000000".to_string(),
                    },
                    Balance {
                        asset: "ETH".to_string(),
                        free: "4.00000000".to_string(),
                        locked: "0.00000000".to_string(),
                    },
                ],
            },
            account_trades: vec![
                AccountTrade {
                    symbol: "ETHBTC".to_string(),
                    id: 28457,
                    price: "0.04900000".to_string(),
                    qty: "2.00000000".to_string(),
                    time: 1_499_865_549_590,
                    is_buyer: true,
                },
                AccountTrade {
                    symbol: "LTCBTC".to_string(),
                    id: 28458,
                    price: "0.00140000".to_string(),
                    qty: "10.00000000".to_string(),
                    time: 1_499_865_549_990,
                    is_buyer: false,
                },
            ],
            market_trades: (0..5)
                .map(|i| MarketTrade {
                    id: 100 + i,
                    price: format!("0.0500{i}000"),
                    qty: "1.00000000".to_string(),
                    time: 1_499_865_549_590 + i as i64 * 1000,
                    is_buyer_maker: i % 2 == 0,
                })
                .collect(),
            assets,
            fail_with: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Names of the calls made so far, with their arguments.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        match &self.fail_with {
            Some(message) => Err(MercatorError::Exchange(message.clone())),
            None => Ok(()),
        }
    }
}

impl ExchangeClient for MockExchange {
    fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.record("exchange_info".to_string())?;
        Ok(self.info.clone())
    }

    fn prices(&self) -> Result<HashMap<String, String>> {
        self.record("prices".to_string())?;
        Ok(self.prices.clone())
    }

    fn depth(&self, symbol: &str, limit: u16) -> Result<OrderBook> {
        self.record(format!("depth {symbol} {limit}"))?;
        self.books
            .get(symbol)
            .cloned()
            .ok_or_else(|| MercatorError::Exchange("Invalid symbol. (code -1121)".to_string()))
    }

    fn account(&self) -> Result<Account> {
        self.record("account".to_string())?;
        Ok(self.account.clone())
    }

    fn account_trades(&self, query: &TradeQuery) -> Result<Vec<AccountTrade>> {
        self.record(format!("account_trades {} {}", query.symbol, query.limit))?;
        Ok(self
            .account_trades
            .iter()
            .filter(|t| t.symbol == query.symbol)
            .take(usize::from(query.limit))
            .cloned()
            .collect())
    }

    fn historical_trades(&self, query: &TradeQuery) -> Result<Vec<MarketTrade>> {
        self.record(format!("historical_trades {} {}", query.symbol, query.limit))?;
        Ok(self
            .market_trades
            .iter()
            .take(usize::from(query.limit))
            .cloned()
            .collect())
    }

    fn recent_trades(&self, query: &TradeQuery) -> Result<Vec<MarketTrade>> {
        self.record(format!("recent_trades {} {}", query.symbol, query.limit))?;
        Ok(self
            .market_trades
            .iter()
            .rev()
            .take(usize::from(query.limit))
            .cloned()
            .collect())
    }

    fn asset_details(&self) -> Result<HashMap<String, AssetDetail>> {
        self.record("asset_details".to_string())?;
        Ok(self.assets.clone())
    }
}
