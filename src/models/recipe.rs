//! Parsed recipe model
//!
//! Value objects produced by the recipe parser: ingredient lines, sub-recipes,
//! the final dish and the non-fatal issues collected along the way.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One parsed ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    /// Always in `(0, 1_000_000]`
    pub quantity: f64,
    pub unit: String,
    pub ingredient_name: String,
    pub original_line: String,
    #[serde(default)]
    pub needs_specification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_ingredient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification_prompt: Option<String>,
}

impl ParsedIngredientLine {
    /// Create a line that needs no specification
    pub fn new(quantity: f64, unit: &str, ingredient_name: &str, original_line: &str) -> Self {
        Self {
            quantity,
            unit: unit.to_string(),
            ingredient_name: ingredient_name.to_string(),
            original_line: original_line.to_string(),
            needs_specification: false,
            base_ingredient: None,
            specification_options: None,
            specification_prompt: None,
        }
    }
}

/// Placeholder in the parent dish for a sub-recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRecipeRef {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub original_line: String,
    /// Index into [`ParsedRecipe::sub_recipes`]
    pub sub_recipe_index: usize,
}

/// An entry of the final dish: a plain ingredient or a reference to a sub-recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DishComponent {
    Ingredient(ParsedIngredientLine),
    SubRecipe(SubRecipeRef),
}

impl DishComponent {
    pub fn is_sub_recipe(&self) -> bool {
        matches!(self, DishComponent::SubRecipe(_))
    }

    pub fn name(&self) -> &str {
        match self {
            DishComponent::Ingredient(line) => &line.ingredient_name,
            DishComponent::SubRecipe(sub) => &sub.name,
        }
    }

    pub fn original_line(&self) -> &str {
        match self {
            DishComponent::Ingredient(line) => &line.original_line,
            DishComponent::SubRecipe(sub) => &sub.original_line,
        }
    }
}

/// A named group of ingredients used by quantity in the final dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRecipe {
    pub name: String,
    pub ingredients: Vec<ParsedIngredientLine>,
    pub quantity_in_final_dish: f64,
    pub unit_in_final_dish: String,
}

/// Non-fatal problem found while parsing; parsing continues
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    #[error("Could not parse line '{line}': {reason}")]
    UnparseableLine { line: String, reason: String },

    #[error("Unbalanced parentheses in line '{line}', line skipped")]
    UnbalancedParentheses { line: String },

    #[error("Sub-recipe '{sub_recipe}' rejected: ingredient '{item}' has no explicit quantity")]
    AmbiguousSubRecipeQuantity { sub_recipe: String, item: String },

    #[error("Nested parentheses in sub-recipe '{sub_recipe}', only the outer list was interpreted")]
    NestedParentheses { sub_recipe: String, line: String },
}

/// Result of parsing a whole recipe text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub final_dish_name: String,
    pub final_dish_ingredients: Vec<DishComponent>,
    pub sub_recipes: Vec<SubRecipe>,
    pub errors: Vec<ParseIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_servings: Option<f64>,
}

impl ParsedRecipe {
    /// Human-readable error strings
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Plain ingredient lines of the final dish (sub-recipe placeholders excluded)
    pub fn plain_ingredients(&self) -> impl Iterator<Item = &ParsedIngredientLine> {
        self.final_dish_ingredients.iter().filter_map(|c| match c {
            DishComponent::Ingredient(line) => Some(line),
            DishComponent::SubRecipe(_) => None,
        })
    }

    /// Sub-recipe referenced by a placeholder
    pub fn sub_recipe(&self, reference: &SubRecipeRef) -> Option<&SubRecipe> {
        self.sub_recipes.get(reference.sub_recipe_index)
    }

    /// Total number of ingredient lines, including those inside sub-recipes
    pub fn ingredient_count(&self) -> usize {
        self.plain_ingredients().count()
            + self.sub_recipes.iter().map(|s| s.ingredients.len()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_component_serializes_with_kind_tag() {
        let component = DishComponent::Ingredient(ParsedIngredientLine::new(2.0, "cup", "flour", "2 cups flour"));
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["kind"], "ingredient");
        assert_eq!(json["ingredient_name"], "flour");
        assert!(json.get("base_ingredient").is_none());
    }

    #[test]
    fn test_parse_issue_messages() {
        let issue = ParseIssue::AmbiguousSubRecipeQuantity {
            sub_recipe: "salsa".to_string(),
            item: "cilantro".to_string(),
        };
        assert_eq!(
            issue.to_string(),
            "Sub-recipe 'salsa' rejected: ingredient 'cilantro' has no explicit quantity"
        );
    }

    #[test]
    fn test_ingredient_count_includes_sub_recipes() {
        let recipe = ParsedRecipe {
            final_dish_name: "Tacos".to_string(),
            final_dish_ingredients: vec![
                DishComponent::Ingredient(ParsedIngredientLine::new(8.0, "item", "tortillas", "8 tortillas")),
                DishComponent::SubRecipe(SubRecipeRef {
                    name: "salsa".to_string(),
                    quantity: 1.0,
                    unit: "cup".to_string(),
                    original_line: "1 cup salsa (2 tomato, 1 onion)".to_string(),
                    sub_recipe_index: 0,
                }),
            ],
            sub_recipes: vec![SubRecipe {
                name: "salsa".to_string(),
                ingredients: vec![
                    ParsedIngredientLine::new(2.0, "tomato", "tomato", "2 tomato"),
                    ParsedIngredientLine::new(1.0, "onion", "onion", "1 onion"),
                ],
                quantity_in_final_dish: 1.0,
                unit_in_final_dish: "cup".to_string(),
            }],
            errors: vec![],
            explicit_servings: None,
        };

        assert_eq!(recipe.ingredient_count(), 3);
        assert_eq!(recipe.plain_ingredients().count(), 1);
        assert!(recipe.final_dish_ingredients[1].is_sub_recipe());
    }
}
