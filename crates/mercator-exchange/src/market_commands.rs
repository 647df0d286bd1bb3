//! Public market data commands: limits, time, prices, order book, trades
//! and symbol details.

use std::rc::Rc;

use mercator_terminal::{Arity, CommandNode, CommandOutput, FlagSpec, ParsedArgs};
use mercator_types::error::{MercatorError, Result};
use mercator_types::style;

use crate::calc::{self, Advice};
use crate::client::{MarketTrade, PriceLevel, TradeQuery, parse_amount};
use crate::scope::{MarketContext, asset_names, local_time, price_in, symbol_names, symbols_after};

const COMPARE_LONG: &str = "\
Converts the price through two markets and compares it with the direct
market price. To check whether the ETHUSDT price matches the ETHBTC/BTCUSDT
price:

    compare ETHUSDT ETHBTC BTCUSDT";

pub(crate) fn commands(ctx: &Rc<MarketContext>) -> Vec<CommandNode> {
    vec![
        rate_limits(ctx),
        server_time(ctx),
        symbol_price(ctx),
        asset_price(ctx),
        compare(ctx),
        depth(ctx),
        market_trades(ctx, TradeListing::Historical),
        market_trades(ctx, TradeListing::Recent),
        symbol_detail(ctx),
    ]
}

/// Row limit from an integer flag, within what the exchange accepts.
pub(crate) fn limit_from(args: &ParsedArgs, name: &str) -> Result<u16> {
    let value = args.int(name)?;
    match u16::try_from(value) {
        Ok(limit) if (1..=1000).contains(&limit) => Ok(limit),
        _ => Err(MercatorError::InvalidFlagValue {
            flag: name.to_string(),
            value: value.to_string(),
            expected: "a limit between 1 and 1000",
        }),
    }
}

/// The `--symbol` flag of trade and detail commands, upper-cased.
pub(crate) fn symbol_flag(args: &ParsedArgs) -> Result<String> {
    Ok(args.text("symbol")?.to_uppercase())
}

fn rate_limits(ctx: &Rc<MarketContext>) -> CommandNode {
    let ctx = Rc::clone(ctx);
    CommandNode::new("rate-limits", "API limits for the exchange")
        .arity(Arity::Exact(0))
        .run(move |_| {
            let info = ctx.client.exchange_info()?;
            let blocks: Vec<String> = info
                .rate_limits
                .iter()
                .map(|limit| {
                    format!(
                        "{}\n  {}\n  {}",
                        style::info("Interval", &limit.interval),
                        style::info("Limit", limit.limit),
                        style::info("Type", &limit.rate_limit_type),
                    )
                })
                .collect();
            Ok(CommandOutput::Text(blocks.join("\n\n")))
        })
}

fn server_time(ctx: &Rc<MarketContext>) -> CommandNode {
    let ctx = Rc::clone(ctx);
    CommandNode::new("server-time", "Server time and timezone")
        .arity(Arity::Exact(0))
        .run(move |_| {
            let info = ctx.client.exchange_info()?;
            let time = chrono::DateTime::from_timestamp_millis(info.server_time)
                .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                .unwrap_or_else(|| info.server_time.to_string());
            Ok(CommandOutput::lines(vec![
                style::info("Server Time", time),
                style::info("Timezone", &info.timezone),
            ]))
        })
}

fn symbol_price(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("symbol-price", "Get the current price for the given symbols")
        .args_hint("<SYMBOL>...")
        .arity(Arity::Minimum(1))
        .eager_suggestions()
        .suggestions(symbol_names(ctx))
        .run(move |args| {
            let prices = run_ctx.prices()?;
            let lines = args
                .positional()
                .iter()
                .map(|arg| {
                    let symbol = arg.to_uppercase();
                    let value = match prices.get(&symbol) {
                        Some(price) => price.clone(),
                        None => style::bad("unknown symbol"),
                    };
                    format!("{}:  {value}", style::label(&symbol))
                })
                .collect();
            Ok(CommandOutput::lines(lines))
        })
}

fn asset_price(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("asset-price", "Get all current prices for an asset")
        .args_hint("<ASSET>")
        .arity(Arity::Exact(1))
        .flag(FlagSpec::switch("quote", "List the markets quoted in the asset"))
        .eager_suggestions()
        .suggestions(asset_names(ctx))
        .run(move |args| {
            let asset = args.positional()[0].to_uppercase();
            let markets = if args.switch("quote")? {
                run_ctx.symbols.markets_for_quote(&asset)
            } else {
                run_ctx.symbols.markets_for_base(&asset)
            };
            let markets = markets
                .ok_or_else(|| MercatorError::failed(format!("unknown symbol: {asset}")))?;
            let prices = run_ctx.prices()?;
            let lines = markets
                .iter()
                .map(|symbol| {
                    let value = match prices.get(symbol) {
                        Some(price) => price.clone(),
                        None => style::bad("unknown price"),
                    };
                    format!("{}:  {value}", style::label(symbol))
                })
                .collect();
            Ok(CommandOutput::lines(lines))
        })
}

fn compare(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new(
        "compare",
        "Compare the price of a market with the price through an intermediary market",
    )
    .long(COMPARE_LONG)
    .args_hint("<MARKET> <LEG1> <LEG2>")
    .arity(Arity::Exact(3))
    .eager_suggestions()
    .suggestions(symbol_names(ctx))
    .run(move |args| {
        let names: Vec<String> = args.positional().iter().map(|a| a.to_uppercase()).collect();
        let (market, leg1, leg2) = (&names[0], &names[1], &names[2]);
        let prices = run_ctx.prices()?;

        let market_price = price_in(&prices, market)?;
        let leg1_price = price_in(&prices, leg1)?;
        let leg2_price = price_in(&prices, leg2)?;
        if market_price <= 0.0 {
            return Err(MercatorError::failed(format!("{market} has gone to 0")));
        }
        if leg2_price <= 0.0 {
            return Err(MercatorError::failed(format!("{leg2} has gone to 0")));
        }

        let c = calc::compare(market_price, leg1_price, leg2_price);
        let mut lines = vec![
            format!("{}:  {}", style::label(market), prices[market.as_str()]),
            format!("{}:  {}", style::label(leg1), prices[leg1.as_str()]),
            format!("{}:  {}", style::label(leg2), prices[leg2.as_str()]),
            String::new(),
            format!("Converted Price: {:.8}", c.converted),
            format!("Difference:      {:.8} ({:.2}%)", c.difference, c.percent),
            String::new(),
            style::heading("Suggestion:"),
        ];
        lines.push(match c.advice {
            Advice::NoOpportunity => format!(
                "There's no opportunity here as the price difference is less than {:.1}%.",
                calc::OPPORTUNITY_THRESHOLD_PCT
            ),
            Advice::BuyThroughLegs => format!(
                "Buy {leg1} and {leg2} ({:.8}) and sell {market} at {market_price:.8} for a gain of {:.2}%",
                c.converted, c.percent
            ),
            Advice::BuyDirect => format!(
                "Buy {market} at {market_price:.8} and sell through {leg1} and {leg2} ({:.8}) for a gain of {:.2}%",
                c.converted, c.percent
            ),
        });
        Ok(CommandOutput::lines(lines))
    })
}

fn book_line(level: &PriceLevel, paint: fn(&str) -> String) -> Result<String> {
    let quantity = parse_amount(&level.quantity)?;
    let price = format!("{:>12}", level.price);
    let quantity = format!("{quantity:.4}");
    Ok(format!(" {} {quantity:>15}", paint(&price)))
}

fn depth(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("depth", "Show the order book of a symbol")
        .args_hint("<SYMBOL>")
        .arity(Arity::Exact(1))
        .flag(FlagSpec::int(
            "limit",
            i64::from(ctx.depth_limit),
            "Number of price levels per side",
        ))
        .eager_suggestions()
        .suggestions(symbol_names(ctx))
        .run(move |args| {
            let symbol = args.positional()[0].to_uppercase();
            let limit = limit_from(args, "limit")?;
            let book = run_ctx.client.depth(&symbol, limit)?;

            let mut lines = vec![
                String::new(),
                format!("       {} Order Book", style::heading(&symbol)),
                "------------------------------".to_string(),
            ];
            for ask in book.asks.iter().rev() {
                lines.push(book_line(ask, style::ask)?);
            }
            lines.push(String::new());
            for bid in &book.bids {
                lines.push(book_line(bid, style::bid)?);
            }
            lines.push("------------ -----------------".to_string());
            Ok(CommandOutput::lines(lines))
        })
}

#[derive(Debug, Clone, Copy)]
enum TradeListing {
    Historical,
    Recent,
}

/// ID / Timestamp / Price / Quantity table.
fn trade_table(trades: &[MarketTrade]) -> CommandOutput {
    CommandOutput::Table {
        headers: ["ID", "Timestamp", "Price", "Quantity"]
            .iter()
            .map(ToString::to_string)
            .collect(),
        rows: trades
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    local_time(t.time),
                    t.price.clone(),
                    t.qty.clone(),
                ]
            })
            .collect(),
    }
}

fn market_trades(ctx: &Rc<MarketContext>, listing: TradeListing) -> CommandNode {
    let (name, short) = match listing {
        TradeListing::Historical => ("historical-market-trades", "List the historical market trades"),
        TradeListing::Recent => ("recent-market-trades", "List the recent market trades"),
    };
    let run_ctx = Rc::clone(ctx);
    CommandNode::new(name, short)
        .arity(Arity::Exact(0))
        .flag(FlagSpec::text("symbol", "", "List trades of this symbol").required())
        .flag(FlagSpec::int(
            "limit",
            i64::from(ctx.trade_limit),
            "Number of results to return",
        ))
        .suggestions(symbols_after(ctx, "--symbol"))
        .run(move |args| {
            let query = TradeQuery {
                symbol: symbol_flag(args)?,
                limit: limit_from(args, "limit")?,
            };
            let trades = match listing {
                TradeListing::Historical => run_ctx.client.historical_trades(&query)?,
                TradeListing::Recent => run_ctx.client.recent_trades(&query)?,
            };
            log::debug!("{name}: {} rows for {}", trades.len(), query.symbol);
            Ok(trade_table(&trades))
        })
}

fn symbol_detail(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("symbol-detail", "Show the details of a symbol")
        .arity(Arity::Exact(0))
        .flag(FlagSpec::text("symbol", "", "Show the details of this symbol").required())
        .suggestions(symbols_after(ctx, "--symbol"))
        .run(move |args| {
            let symbol = symbol_flag(args)?;
            let info = run_ctx.symbols.get(&symbol)?;
            let mut lines = vec![
                style::info("Symbol Status", &info.status),
                style::info("Base Asset", &info.base_asset),
                style::info("Base Asset Precision", info.base_asset_precision),
                style::info("Quote Asset", &info.quote_asset),
                style::info("Quote Precision", info.quote_precision),
                style::info("Iceberg Allowed", style::boolean(info.iceberg_allowed)),
                style::info("OCO Orders Allowed", style::boolean(info.oco_allowed)),
                style::info("Spot Trading", style::boolean(info.is_spot_trading_allowed)),
                style::info("Margin Trading", style::boolean(info.is_margin_trading_allowed)),
                String::new(),
                style::heading("Supported Order Types:"),
            ];
            lines.extend(info.order_types.iter().cloned());
            Ok(CommandOutput::lines(lines))
        })
}
