//! Position and arbitrage arithmetic behind the calculator commands.

use std::cmp::Ordering;

use mercator_types::error::{MercatorError, Result};

use crate::client::Balance;

/// Differences below this percentage are not worth trading.
pub const OPPORTUNITY_THRESHOLD_PCT: f64 = 1.0;

/// Which side of a triangular comparison is cheaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    NoOpportunity,
    /// The two-leg route is cheaper: buy through the legs, sell the market.
    BuyThroughLegs,
    /// The direct market is cheaper: buy it, sell through the legs.
    BuyDirect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub converted: f64,
    pub difference: f64,
    pub percent: f64,
    pub advice: Advice,
}

/// Compare a direct market price with the product of two leg prices.
pub fn compare(market: f64, leg1: f64, leg2: f64) -> Comparison {
    let converted = leg1 * leg2;
    let difference = (converted - market).abs();
    let percent = difference / market * 100.0;
    let advice = if percent < OPPORTUNITY_THRESHOLD_PCT {
        Advice::NoOpportunity
    } else if converted < market {
        Advice::BuyThroughLegs
    } else {
        Advice::BuyDirect
    };
    Comparison {
        converted,
        difference,
        percent,
        advice,
    }
}

/// Rejects zero and negative prices with the user-facing messages.
pub fn check_price(price: f64) -> Result<()> {
    match price.partial_cmp(&0.0) {
        Some(Ordering::Greater) => Ok(()),
        Some(Ordering::Equal) => Err(MercatorError::failed("current price is 0.0")),
        _ => Err(MercatorError::failed("price must be positive")),
    }
}

/// Shares bought by `investment` at `price`.
pub fn shares(investment: f64, price: f64) -> Result<f64> {
    check_price(price)?;
    Ok(investment / price)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPlan {
    pub shares: f64,
    /// Loss if the stop is hit.
    pub risk: f64,
    /// Gain if the target is reached.
    pub earnings: f64,
    /// Exit price giving `ratio` times the risk.
    pub target: f64,
}

pub fn risk(investment: f64, entry: f64, stop: f64, ratio: f64) -> Result<RiskPlan> {
    if entry <= 0.0 {
        return Err(MercatorError::failed("entry price is required"));
    }
    if stop <= 0.0 {
        return Err(MercatorError::failed("stop price is required"));
    }
    if stop >= entry {
        return Err(MercatorError::failed(
            "stop price must be less than entry price",
        ));
    }
    if ratio <= 0.0 {
        return Err(MercatorError::failed(
            "risk/reward ratio must be greater than 0",
        ));
    }
    let shares = investment / entry;
    let spread = entry - stop;
    Ok(RiskPlan {
        shares,
        risk: shares * spread,
        earnings: shares * spread * ratio,
        target: entry + spread * ratio,
    })
}

/// Non-empty balances, largest total first.
pub fn ranked_balances(balances: &[Balance]) -> Result<Vec<(&Balance, f64)>> {
    let mut ranked = Vec::new();
    for balance in balances {
        let total = balance.total()?;
        if total > 0.0 {
            ranked.push((balance, total));
        }
    }
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(asset: &str, free: &str, locked: &str) -> Balance {
        Balance {
            asset: asset.into(),
            free: free.into(),
            locked: locked.into(),
        }
    }

    #[test]
    fn compare_below_threshold() {
        let c = compare(3000.0, 0.05, 60_000.0);
        assert!((c.converted - 3000.0).abs() < 1e-9);
        assert!(c.difference < 1e-9);
        assert_eq!(c.advice, Advice::NoOpportunity);
    }

    #[test]
    fn compare_legs_cheaper() {
        let c = compare(3000.0, 0.049, 60_000.0);
        assert!((c.converted - 2940.0).abs() < 1e-9);
        assert!((c.percent - 2.0).abs() < 1e-9);
        assert_eq!(c.advice, Advice::BuyThroughLegs);
    }

    #[test]
    fn compare_direct_cheaper() {
        let c = compare(3000.0, 0.051, 60_000.0);
        assert_eq!(c.advice, Advice::BuyDirect);
    }

    #[test]
    fn shares_division() {
        assert_eq!(shares(100.0, 4.0).unwrap(), 25.0);
        assert_eq!(
            format!("{}", shares(100.0, 0.0).unwrap_err()),
            "current price is 0.0"
        );
        assert_eq!(
            format!("{}", shares(100.0, -1.0).unwrap_err()),
            "price must be positive"
        );
    }

    #[test]
    fn risk_plan() {
        let plan = risk(1000.0, 10.0, 8.0, 2.0).unwrap();
        assert_eq!(plan.shares, 100.0);
        assert_eq!(plan.risk, 200.0);
        assert_eq!(plan.earnings, 400.0);
        assert_eq!(plan.target, 14.0);
    }

    #[test]
    fn risk_validation_order() {
        let msg = |r: Result<RiskPlan>| format!("{}", r.unwrap_err());
        assert_eq!(msg(risk(1.0, 0.0, 1.0, 2.0)), "entry price is required");
        assert_eq!(msg(risk(1.0, 10.0, 0.0, 2.0)), "stop price is required");
        assert_eq!(
            msg(risk(1.0, 10.0, 10.0, 2.0)),
            "stop price must be less than entry price"
        );
        assert_eq!(
            msg(risk(1.0, 10.0, 5.0, 0.0)),
            "risk/reward ratio must be greater than 0"
        );
    }

    #[test]
    fn balances_ranked_and_filtered() {
        let balances = vec![
            balance("LTC", "0.0", "0.0"),
            balance("BTC", "0.5", "0.5"),
            balance("ETH", "2.0", "0.0"),
        ];
        let ranked = ranked_balances(&balances).unwrap();
        let assets: Vec<&str> = ranked.iter().map(|(b, _)| b.asset.as_str()).collect();
        assert_eq!(assets, vec!["ETH", "BTC"]);
        assert_eq!(ranked[1].1, 1.0);
    }
}
