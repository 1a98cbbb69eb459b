//! Product catalog module.
//!
//! Contains the ranked product type, peripheral categories and the seed list.

mod category;
mod product;
mod seed;

pub use category::Category;
pub use product::Product;
pub use seed::seed_catalog;
