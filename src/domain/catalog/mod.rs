//! Catalog module - static dish, template and seasoning data.
//!
//! Dish templates define two required seasoning slots (A and B). The catalog
//! is configuration data: it is parsed from YAML once and never mutated.

mod catalog;
mod errors;
mod model;

pub use catalog::Catalog;
pub use errors::CatalogError;
pub use model::{Dish, DishTemplate, Seasoning, SeasoningOption, SlotClassification, SlotRequirement};
