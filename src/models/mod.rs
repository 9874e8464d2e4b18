//! Data models
//!
//! Value objects passed between the parser, matcher and nutrition stages.

mod food_item;
mod matched_ingredient;
mod nutrition;
mod recipe;

pub use food_item::{DataTypeTier, DatabaseFood, FoodCandidate, FoodPortion};
pub use matched_ingredient::{MatchSource, MatchedIngredient};
pub use nutrition::{Nutrient, NutrientProfile, NutrientUnit};
pub use recipe::{
    DishComponent, ParseIssue, ParsedIngredientLine, ParsedRecipe, SubRecipe, SubRecipeRef,
};
