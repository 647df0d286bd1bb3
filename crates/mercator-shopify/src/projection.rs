//! Monthly revenue projection for a single advertised product.

use mercator_types::config::ShopifyConfig;
use mercator_types::error::{MercatorError, Result};

/// What the store sells and what it wants to earn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    /// Cost of one product.
    pub cost: f64,
    /// Sale price of one product.
    pub price: f64,
    /// Gross earnings goal.
    pub goal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub revenue_per_sale: f64,
    pub sales: f64,
    pub visitors: f64,
    pub impressions: f64,
    pub gross: f64,
    pub product_expenses: f64,
    pub marketing_budget: f64,
    pub net_revenue: f64,
    pub profit_marketing_ratio: f64,
    pub profit_expenses_ratio: f64,
    pub cost_per_visitor: f64,
    pub cost_per_purchase: f64,
    pub profit_per_sale: f64,
}

impl Projection {
    /// Sales needed to pass the goal, and the traffic and ad spend they take.
    pub fn compute(input: ProjectionInput, rates: &ShopifyConfig) -> Result<Self> {
        if input.price <= 0.0 {
            return Err(MercatorError::failed("product price must be greater than 0"));
        }
        if rates.ctr <= 0.0 || rates.conversion <= 0.0 {
            return Err(MercatorError::failed(
                "click-through and conversion rates must be greater than 0",
            ));
        }

        let sales = (input.goal / input.price + 1.0).floor();
        let visitors = sales / rates.conversion;
        let impressions = visitors / rates.ctr;
        let gross = sales * input.price;
        let product_expenses = sales * input.cost;
        let marketing_budget = impressions / 1000.0 * rates.cpm;
        let net_revenue = gross - product_expenses - marketing_budget;
        let revenue_per_sale = input.price - input.cost;
        let cost_per_purchase = marketing_budget / sales;

        Ok(Self {
            revenue_per_sale,
            sales,
            visitors,
            impressions,
            gross,
            product_expenses,
            marketing_budget,
            net_revenue,
            profit_marketing_ratio: net_revenue / marketing_budget,
            profit_expenses_ratio: net_revenue / (marketing_budget + product_expenses),
            cost_per_visitor: marketing_budget / visitors,
            cost_per_purchase,
            profit_per_sale: revenue_per_sale - cost_per_purchase,
        })
    }
}
