//! Commands reading the authenticated account.

use std::rc::Rc;

use mercator_terminal::{Arity, CommandNode, CommandOutput, FlagSpec};
use mercator_types::error::MercatorError;
use mercator_types::style;

use crate::calc;
use crate::client::TradeQuery;
use crate::market_commands::{limit_from, symbol_flag};
use crate::scope::{MarketContext, assets_after, local_time, symbols_after};

pub(crate) fn commands(ctx: &Rc<MarketContext>) -> Vec<CommandNode> {
    vec![
        account_info(ctx),
        account_balance(ctx),
        account_trades(ctx),
        asset_detail(ctx),
    ]
}

fn account_info(ctx: &Rc<MarketContext>) -> CommandNode {
    let ctx = Rc::clone(ctx);
    CommandNode::new("account-info", "Show user account info")
        .arity(Arity::Exact(0))
        .run(move |_| {
            let account = ctx.client.account()?;
            let item = |name: &str, value: String| format!("- {}", style::info(name, value));
            Ok(CommandOutput::lines(vec![
                String::new(),
                style::heading("Commissions:"),
                item("Maker Commission", account.maker_commission.to_string()),
                item("Taker Commission", account.taker_commission.to_string()),
                item("Buyer Commission", account.buyer_commission.to_string()),
                item("Seller Commission", account.seller_commission.to_string()),
                String::new(),
                style::heading("Permissions:"),
                item("Can Trade", style::boolean(account.can_trade)),
                item("Can Deposit", style::boolean(account.can_deposit)),
                item("Can Withdraw", style::boolean(account.can_withdraw)),
            ]))
        })
}

fn account_balance(ctx: &Rc<MarketContext>) -> CommandNode {
    let ctx = Rc::clone(ctx);
    CommandNode::new("account-balance", "Show user account balances")
        .arity(Arity::Exact(0))
        .run(move |_| {
            let account = ctx.client.account()?;
            let mut lines = vec![String::new(), style::heading("Account Balance(s):")];
            for (balance, total) in calc::ranked_balances(&account.balances)? {
                lines.push(format!("{}:", style::label(&balance.asset)));
                lines.push(format!("  {}:     {}", style::sublabel("Free"), balance.free));
                lines.push(format!("  {}:   {}", style::sublabel("Locked"), balance.locked));
                lines.push(format!("  {}:    {total:.8}", style::sublabel("Total")));
            }
            Ok(CommandOutput::lines(lines))
        })
}

fn account_trades(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("account-trades", "Show user account trades")
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
            let trades = run_ctx.client.account_trades(&query)?;
            Ok(CommandOutput::Table {
                headers: ["ID", "Timestamp", "Price", "Quantity", "Side"]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                rows: trades
                    .iter()
                    .map(|t| {
                        let side = if t.is_buyer {
                            style::good("BUY")
                        } else {
                            style::bad("SELL")
                        };
                        vec![
                            t.id.to_string(),
                            local_time(t.time),
                            t.price.clone(),
                            t.qty.clone(),
                            side,
                        ]
                    })
                    .collect(),
            })
        })
}

fn asset_detail(ctx: &Rc<MarketContext>) -> CommandNode {
    let run_ctx = Rc::clone(ctx);
    CommandNode::new("asset-detail", "Show the deposit and withdrawal details of an asset")
        .arity(Arity::Exact(0))
        .flag(FlagSpec::text("asset", "", "Show the details of this asset").required())
        .suggestions(assets_after(ctx, "--asset"))
        .run(move |args| {
            let asset = args.text("asset")?.to_uppercase();
            let details = run_ctx.client.asset_details()?;
            let detail = details
                .get(&asset)
                .ok_or_else(|| MercatorError::failed(format!("unknown asset: {asset}")))?;
            Ok(CommandOutput::lines(vec![
                style::info("Deposit Status", style::boolean(detail.deposit_status)),
                style::info("Deposit Tip", &detail.deposit_tip),
                style::info("Withdraw Status", style::boolean(detail.withdraw_status)),
                style::info("Minimum Withdraw Amount", format!("{:.6}", detail.min_withdraw_amount)),
                style::info("Withdraw Fee", format!("{:.6}", detail.withdraw_fee)),
            ]))
        })
}
