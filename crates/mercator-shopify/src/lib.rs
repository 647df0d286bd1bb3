//! Storefront utilities: the `shopify` scope and its revenue projection.

pub mod projection;
mod scope;

pub use projection::{Projection, ProjectionInput};
pub use scope::{DESCRIPTION, PREFIX, ShopifyScopeFactory, build_scope};
