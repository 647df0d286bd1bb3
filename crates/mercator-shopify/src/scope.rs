//! The `shopify` scope.

use mercator_terminal::{Arity, CommandNode, CommandOutput, CommandScope, FlagSpec, Scope, ScopeFactory, ScopeMeta};
use mercator_types::config::ShopifyConfig;
use mercator_types::error::Result;
use mercator_types::style::info;

use crate::projection::{Projection, ProjectionInput};

pub const PREFIX: &str = "shopify";
pub const DESCRIPTION: &str = "Utilities for managing a Shopify store";

fn revenue(rates: ShopifyConfig) -> CommandNode {
    CommandNode::new("revenue", "Calculates estimated revenue based on projections")
        .arity(Arity::Exact(0))
        .flag(FlagSpec::float("cost", 1.0, "Product cost"))
        .flag(FlagSpec::float("price", 1.0, "Product sale price"))
        .flag(FlagSpec::float("goal", 1000.0, "Gross earnings goal"))
        .run(move |args| {
            let input = ProjectionInput {
                cost: args.float("cost")?,
                price: args.float("price")?,
                goal: args.float("goal")?,
            };
            let p = Projection::compute(input, &rates)?;
            log::debug!("revenue projection: {p:?}");
            Ok(CommandOutput::lines(vec![
                info("CPM", format!("${:.2}", rates.cpm)),
                info("CTR", format!("{:.2}%", rates.ctr * 100.0)),
                info("Conversion Rate", format!("{:.2}%", rates.conversion * 100.0)),
                String::new(),
                info("Gross Earnings Goal", format!("${:.2}", input.goal)),
                info("Product Total", format!("${:.2}", input.price)),
                info("Product Cost", format!("${:.2}", input.cost)),
                info("Revenue per Sale", format!("${:.2}", p.revenue_per_sale)),
                String::new(),
                info("Required Gross Sales", format!("{:.0}", p.sales)),
                info("Required Visitors", format!("{:.0}", p.visitors)),
                info("Required Ad Impressions", format!("{:.0}", p.impressions)),
                String::new(),
                info("Gross", format!("${:.2}", p.gross)),
                info("Total Product Cost", format!("${:.2}", p.product_expenses)),
                info("Required Marketing Budget", format!("${:.2}", p.marketing_budget)),
                info("Net Revenue", format!("${:.2}", p.net_revenue)),
                String::new(),
                info("Profit/Marketing Ratio", format!("{:.4}", p.profit_marketing_ratio)),
                info("Profit/Expenses Ratio", format!("{:.4}", p.profit_expenses_ratio)),
                info("Marketing Cost per Visitor", format!("${:.2}", p.cost_per_visitor)),
                info("Marketing Cost per Purchase", format!("${:.2}", p.cost_per_purchase)),
                info("Profit per Sale", format!("${:.2}", p.profit_per_sale)),
            ]))
        })
}

pub fn build_scope(rates: &ShopifyConfig) -> Result<CommandScope> {
    CommandScope::new(PREFIX, DESCRIPTION, vec![revenue(rates.clone())])
}

/// Builds the `shopify` scope with the configured advertising rates.
pub struct ShopifyScopeFactory {
    rates: ShopifyConfig,
}

impl ShopifyScopeFactory {
    pub fn new(rates: ShopifyConfig) -> Self {
        Self { rates }
    }
}

impl ScopeFactory for ShopifyScopeFactory {
    fn meta(&self) -> ScopeMeta {
        ScopeMeta {
            prefix: PREFIX.to_string(),
            description: DESCRIPTION.to_string(),
        }
    }

    fn build(&self) -> Result<Box<dyn Scope>> {
        Ok(build_scope(&self.rates)?.boxed())
    }
}
