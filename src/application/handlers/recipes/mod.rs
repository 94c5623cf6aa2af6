//! Recipe queries - read models for the web and mini-app surfaces.

mod get_recipe;
mod get_seasoning_options;

pub use get_recipe::{
    GetRecipeHandler, GetRecipeQuery, RecipeCommentView, RecipeSeasoningView, RecipeView,
};
pub use get_seasoning_options::{
    GetSeasoningOptionsHandler, GetSeasoningOptionsQuery, SeasoningOptionsView,
};
