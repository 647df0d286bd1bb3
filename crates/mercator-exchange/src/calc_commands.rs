//! Position calculators. Prices come from flags or the live market.

use std::rc::Rc;

use mercator_terminal::{Arity, CommandNode, CommandOutput, FlagSpec};
use mercator_types::error::{MercatorError, Result};
use mercator_types::style;

use crate::calc;
use crate::client::SymbolInfo;
use crate::scope::{MarketContext, price_in, symbol_names, symbols_after};

pub(crate) fn commands(ctx: &Rc<MarketContext>) -> Vec<CommandNode> {
    vec![shares(ctx), risk(ctx), current_value(ctx), future_value()]
}

/// `Shares: 100.00 USDT buys 0.00166667 BTC at 60000.00`
fn purchase_line(title: &str, info: &SymbolInfo, investment: f64, price: f64) -> String {
    format!(
        "{}: {} {} buys {} {} at {}",
        style::label(title),
        info.format_quote(investment),
        style::asset(&info.quote_asset),
        info.format_base(investment / price),
        style::asset(&info.base_asset),
        info.format_quote(price),
    )
}

fn shares(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("shares", "Calculate shares if bought at a certain price")
        .args_hint("[SYMBOL]")
        .arity(Arity::Maximum(1))
        .flag(FlagSpec::float("inv", 0.0, "Investment amount").short('i').required())
        .flag(FlagSpec::float("price", 1.0, "Buy price").short('p'))
        .suggestions(symbol_names(ctx))
        .run(move |args| {
            let investment = args.float("inv")?;
            match args.arg(0) {
                Some(arg) => {
                    let symbol = arg.to_uppercase();
                    let info = run_ctx.symbols.get(&symbol)?;
                    let price = price_in(&run_ctx.prices()?, &symbol)?;
                    calc::check_price(price)?;
                    Ok(CommandOutput::Text(purchase_line("Shares", info, investment, price)))
                },
                None if args.is_set("price") => {
                    let price = args.float("price")?;
                    let shares = calc::shares(investment, price)?;
                    Ok(CommandOutput::Text(format!(
                        "{}: {shares:.8} at {price:.8}",
                        style::label("Shares")
                    )))
                },
                None => Err(MercatorError::failed("either price or symbol is required")),
            }
        })
}

fn risk(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("risk", "Calculate risk if bought and sold at certain prices")
        .args_hint("<SYMBOL>")
        .arity(Arity::Exact(1))
        .flag(FlagSpec::float("inv", 0.0, "Investment amount").required())
        .flag(FlagSpec::float("entry", 1.0, "Entry price").required())
        .flag(FlagSpec::float("stop", 1.0, "Stop price").required())
        .flag(FlagSpec::float("ratio", 2.0, "Risk/reward ratio"))
        .suggestions(symbol_names(ctx))
        .run(move |args| {
            let investment = args.float("inv")?;
            let entry = args.float("entry")?;
            let plan = calc::risk(
                investment,
                entry,
                args.float("stop")?,
                args.float("ratio")?,
            )?;
            let symbol = args.positional()[0].to_uppercase();
            let info = run_ctx.symbols.get(&symbol)?;
            let quote = style::asset(&info.quote_asset);
            Ok(CommandOutput::lines(vec![
                purchase_line("Shares", info, investment, entry),
                format!(
                    "{}: {} {quote}",
                    style::label("Risk"),
                    info.format_quote(plan.risk)
                ),
                format!(
                    "{}: {} {quote} if sold at {} {quote}",
                    style::label("Earnings"),
                    info.format_quote(plan.earnings),
                    info.format_quote(plan.target),
                ),
            ]))
        })
}

fn current_value(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new(
        "current-value",
        "Get the current value of an amount of asset in the given markets",
    )
    .args_hint("<SYMBOL>...")
    .arity(Arity::Minimum(1))
    .flag(FlagSpec::float("amount", 1.0, "Amount of asset").required())
    .suggestions(symbols_after(ctx, "--amount"))
    .run(move |args| {
        let amount = args.float("amount")?;
        let prices = run_ctx
            .prices()
            .map_err(|_| MercatorError::failed("failed to get current prices"))?;
        let lines = args
            .positional()
            .iter()
            .map(|arg| {
                let symbol = arg.to_uppercase();
                let valued = run_ctx
                    .symbols
                    .get(&symbol)
                    .and_then(|info| Ok((info, price_in(&prices, &symbol)?)));
                let value = match valued {
                    Ok((info, price)) => format!(
                        "{} {}",
                        info.format_quote(amount * price),
                        style::asset(&info.quote_asset)
                    ),
                    Err(e) => style::bad(&e.to_string()),
                };
                format!("{}: {value}", style::label(&symbol))
            })
            .collect();
        Ok(CommandOutput::lines(lines))
    })
}

fn future_value() -> CommandNode {
    CommandNode::new("future-value", "Calculate value of shares if sold at a future price")
        .arity(Arity::Exact(0))
        .flag(FlagSpec::float("amount", 0.0, "Number of shares").short('a').required())
        .flag(FlagSpec::float("price", 1.0, "Sell price").short('p').required())
        .run(|args| -> Result<CommandOutput> {
            let amount = args.float("amount")?;
            let price = args.float("price")?;
            calc::check_price(price)?;
            Ok(CommandOutput::Text(format!(
                "The {} shares would be valued at {} if sold at {}",
                style::sublabel(&format!("{amount:.8}")),
                style::good(&format!("{:.8}", price * amount)),
                style::asset(&format!("{price:.8}")),
            )))
        })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::client::ExchangeClient;
    use crate::mock::MockExchange;
    use crate::test_utils::{console, run};

    fn env() -> mercator_terminal::Environment {
        console(Rc::new(MockExchange::sample()))
    }

    #[test]
    fn shares_at_market_price() {
        let mut env = env();
        let out = run(&mut env, "shares btcusdt -i 120").unwrap();
        assert_eq!(out.trim(), "Shares: 120.00 USDT buys 0.00200000 BTC at 60000.00");
    }

    #[test]
    fn shares_at_given_price() {
        let mut env = env();
        let out = run(&mut env, "shares --inv 100 --price 4").unwrap();
        assert_eq!(out.trim(), "Shares: 25.00000000 at 4.00000000");
    }

    #[test]
    fn shares_needs_price_or_symbol() {
        let mut env = env();
        let err = run(&mut env, "shares -i 100").unwrap_err();
        assert_eq!(format!("{err}"), "either price or symbol is required");
        let err = run(&mut env, "shares -p 10").unwrap_err();
        assert_eq!(format!("{err}"), "required flag --inv not set");
        let err = run(&mut env, "shares -i 100 -p 0").unwrap_err();
        assert_eq!(format!("{err}"), "current price is 0.0");
        assert!(run(&mut env, "shares ETHBTC BTCUSDT -i 1").is_err());
    }

    #[test]
    fn shares_with_zero_market_price() {
        let mut mock = MockExchange::sample();
        mock.prices.insert("LTCBTC".to_string(), "0.00000000".to_string());
        let mut env = console(Rc::new(mock));
        let err = run(&mut env, "shares LTCBTC -i 1").unwrap_err();
        assert_eq!(format!("{err}"), "current price is 0.0");
    }

    #[test]
    fn risk_plan_lines() {
        let mut env = env();
        let out = run(
            &mut env,
            "risk BTCUSDT --inv 1000 --entry 50000 --stop 45000 --ratio 3",
        )
        .unwrap();
        assert!(out.contains("Shares: 1000.00 USDT buys 0.02000000 BTC at 50000.00"));
        assert!(out.contains("Risk: 100.00 USDT"));
        assert!(out.contains("Earnings: 300.00 USDT if sold at 65000.00 USDT"));
    }

    #[test]
    fn risk_validation() {
        let mut env = env();
        let err = run(&mut env, "risk BTCUSDT --inv 1 --entry 10 --stop 12").unwrap_err();
        assert_eq!(format!("{err}"), "stop price must be less than entry price");
        let err = run(&mut env, "risk BTCUSDT --inv 1 --entry 10").unwrap_err();
        assert_eq!(format!("{err}"), "required flag --stop not set");
        let err = run(&mut env, "risk NOPE --inv 1 --entry 10 --stop 5").unwrap_err();
        assert_eq!(format!("{err}"), "unknown symbol: NOPE");
    }

    #[test]
    fn current_value_per_symbol() {
        let mock = Rc::new(MockExchange::sample());
        let mut env = console(Rc::clone(&mock) as Rc<dyn ExchangeClient>);
        let out = run(&mut env, "current-value --amount 2 ETHUSDT ethbtc NOPE").unwrap();
        assert!(out.contains("ETHUSDT: 6000.00 USDT"));
        assert!(out.contains("ETHBTC: 0.100000 BTC"));
        assert!(out.contains("NOPE: unknown symbol: NOPE"));
        assert_eq!(mock.calls().iter().filter(|c| *c == "prices").count(), 1);
    }

    #[test]
    fn current_value_requires_amount() {
        let mut env = env();
        let err = run(&mut env, "current-value ETHUSDT").unwrap_err();
        assert_eq!(format!("{err}"), "required flag --amount not set");
    }

    #[test]
    fn future_value_line() {
        let mut env = env();
        let out = run(&mut env, "future-value -a 2 -p 1.5").unwrap();
        assert_eq!(
            out.trim(),
            "The 2.00000000 shares would be valued at 3.00000000 if sold at 1.50000000"
        );
        let err = run(&mut env, "future-value -a 2 -p -1").unwrap_err();
        assert_eq!(format!("{err}"), "price must be positive");
        let err = run(&mut env, "future-value -a 2").unwrap_err();
        assert_eq!(format!("{err}"), "required flag --price not set");
    }
}
