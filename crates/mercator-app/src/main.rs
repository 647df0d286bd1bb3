//! Mercator console entry point.
//!
//! Loads the configuration, prints the banner, and runs the line editor over
//! a root scope from which the `binance` and `shopify` scopes are entered.

mod banner;
mod repl;

use std::io;
use std::rc::Rc;

use anyhow::Result;

use mercator_exchange::BinanceScopeFactory;
use mercator_shopify::ShopifyScopeFactory;
use mercator_terminal::{Environment, ScopeFactory, root_scope};
use mercator_types::config::MercatorConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = MercatorConfig::load()?;
    log::info!("Starting {} console", config.title);

    if config.banner {
        banner::print(&mut io::stdout())?;
    }

    let factories: Vec<Rc<dyn ScopeFactory>> = vec![
        Rc::new(BinanceScopeFactory::new(config.binance.clone())),
        Rc::new(ShopifyScopeFactory::new(config.shopify.clone())),
    ];
    let root = root_scope(&config.title, factories)?;
    repl::run(Environment::new(root.boxed()))?;

    log::info!("Console closed");
    Ok(())
}
