//! Recipe text parsing
//!
//! Sanitizing, classifying and parsing pasted recipe text into ingredient
//! lines and sub-recipes.

pub mod classify;
pub mod ingredient_line;
pub mod quantity;
pub mod recipe;
pub mod sanitize;
pub mod specification;
pub mod sub_recipe;
pub mod taxonomy;
pub mod vocabulary;

pub use classify::{classify_line, should_skip, LineClass, SkipReason};
pub use ingredient_line::{parse_ingredient_line, MAX_PAREN_MERGE_ITERATIONS};
pub use quantity::parse_quantity;
pub use recipe::parse_recipe;
pub use sanitize::{sanitize, InputLimits};
pub use specification::{
    apply_specification, apply_specifications, pending_specifications, resolve_specification, search_text,
    IngredientLocation, PendingSpecification, SpecificationChoice,
};
pub use sub_recipe::{build_sub_recipe, detect_sub_recipe, SubRecipeDecision};
