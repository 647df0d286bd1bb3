//! Lookup tables over the exchange's symbol list, built once per scope.

use std::collections::{BTreeMap, HashMap};

use mercator_types::error::{MercatorError, Result};

use crate::client::SymbolInfo;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    by_symbol: HashMap<String, SymbolInfo>,
    by_base: BTreeMap<String, Vec<String>>,
    by_quote: BTreeMap<String, Vec<String>>,
    names: Vec<String>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<SymbolInfo>) -> Self {
        let mut table = Self::default();
        for info in symbols {
            let base = info.base_asset.trim();
            if !base.is_empty() {
                table
                    .by_base
                    .entry(base.to_string())
                    .or_default()
                    .push(info.symbol.clone());
            }
            let quote = info.quote_asset.trim();
            if !quote.is_empty() {
                table
                    .by_quote
                    .entry(quote.to_string())
                    .or_default()
                    .push(info.symbol.clone());
            }
            table.names.push(info.symbol.clone());
            table.by_symbol.insert(info.symbol.clone(), info);
        }
        table.names.sort();
        table.names.dedup();
        table
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Market details, or `unknown symbol: X`.
    pub fn get(&self, symbol: &str) -> Result<&SymbolInfo> {
        self.by_symbol
            .get(symbol)
            .ok_or_else(|| MercatorError::failed(format!("unknown symbol: {symbol}")))
    }

    /// All symbol names, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Distinct base assets, sorted.
    pub fn base_assets(&self) -> Vec<String> {
        self.by_base.keys().cloned().collect()
    }

    /// Distinct quote assets, sorted.
    pub fn quote_assets(&self) -> Vec<String> {
        self.by_quote.keys().cloned().collect()
    }

    /// Markets trading `asset` as their base, in listing order.
    pub fn markets_for_base(&self, asset: &str) -> Option<&[String]> {
        self.by_base.get(asset).map(Vec::as_slice)
    }

    /// Markets quoted in `asset`, in listing order.
    pub fn markets_for_quote(&self, asset: &str) -> Option<&[String]> {
        self.by_quote.get(asset).map(Vec::as_slice)
    }
}
