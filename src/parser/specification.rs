//! Specification resolver
//!
//! Flags lines whose unit is a high-variation ingredient noun ("2 tomatoes")
//! so the caller can pick a variety before database matching, and applies
//! the caller's choices afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{DishComponent, ParsedIngredientLine, ParsedRecipe};
use crate::parser::taxonomy::{high_variation_entry, names_a_variety};
use crate::parser::vocabulary::is_preparation_word;

/// Variety used when the caller skips a specification
pub const DEFAULT_VARIETY: &str = "medium";

/// Flag a line that needs a size or variety choice
pub fn resolve_specification(mut line: ParsedIngredientLine) -> ParsedIngredientLine {
    let Some(entry) = high_variation_entry(&line.unit) else {
        return line;
    };
    if names_a_variety(entry, &line.ingredient_name) {
        return line;
    }

    let options: Vec<String> = entry.varieties.iter().map(|v| v.to_string()).collect();
    line.specification_prompt = Some(format!("What kind of {}? ({})", entry.base, options.join(", ")));
    line.needs_specification = true;
    line.base_ingredient = Some(entry.base.to_string());
    line.specification_options = Some(options);
    line
}

/// Resolve a flagged line with the caller's choice.
///
/// `Some(choice)` renames the ingredient to `"<choice> <name>"`; `None` falls
/// back to `"medium <base>"`. Lines that were not flagged are returned as is.
pub fn apply_specification(line: &ParsedIngredientLine, choice: Option<&str>) -> ParsedIngredientLine {
    if !line.needs_specification {
        return line.clone();
    }

    let base = line.base_ingredient.clone().unwrap_or_else(|| line.ingredient_name.clone());
    let ingredient_name = match choice.map(str::trim).filter(|c| !c.is_empty()) {
        Some(choice) => format!("{} {}", choice, line.ingredient_name),
        None => format!("{} {}", DEFAULT_VARIETY, base),
    };

    ParsedIngredientLine {
        ingredient_name,
        needs_specification: false,
        specification_options: None,
        specification_prompt: None,
        base_ingredient: Some(base),
        ..line.clone()
    }
}

/// Database search text for an ingredient name: lowercase, preparation words removed
pub fn search_text(ingredient_name: &str) -> String {
    let cleaned: String = ingredient_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '\'' || c.is_whitespace() { c } else { ' ' })
        .collect();

    let words: Vec<&str> = cleaned.split_whitespace().filter(|w| !is_preparation_word(w)).collect();
    if words.is_empty() {
        // Never return an empty query for a non-empty name
        return cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    }
    words.join(" ")
}

/// Where an ingredient line sits inside a parsed recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "in", rename_all = "snake_case")]
pub enum IngredientLocation {
    /// Index into `final_dish_ingredients`
    FinalDish { index: usize },
    /// Index into `sub_recipes[sub_recipe_index].ingredients`
    SubRecipe { sub_recipe_index: usize, ingredient_index: usize },
}

/// A line waiting for a specification choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSpecification {
    pub location: IngredientLocation,
    pub original_line: String,
    pub ingredient_name: String,
    pub base_ingredient: String,
    pub options: Vec<String>,
    pub prompt: String,
}

/// Caller's answer for one pending specification; `None` means skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationChoice {
    pub location: IngredientLocation,
    #[serde(default)]
    pub choice: Option<String>,
}

fn pending_for(location: IngredientLocation, line: &ParsedIngredientLine) -> Option<PendingSpecification> {
    if !line.needs_specification {
        return None;
    }
    Some(PendingSpecification {
        location,
        original_line: line.original_line.clone(),
        ingredient_name: line.ingredient_name.clone(),
        base_ingredient: line.base_ingredient.clone().unwrap_or_default(),
        options: line.specification_options.clone().unwrap_or_default(),
        prompt: line.specification_prompt.clone().unwrap_or_default(),
    })
}

/// Every flagged line of a recipe, final dish first, in document order
pub fn pending_specifications(recipe: &ParsedRecipe) -> Vec<PendingSpecification> {
    let mut pending = Vec::new();

    for (index, component) in recipe.final_dish_ingredients.iter().enumerate() {
        if let DishComponent::Ingredient(line) = component {
            pending.extend(pending_for(IngredientLocation::FinalDish { index }, line));
        }
    }
    for (sub_recipe_index, sub) in recipe.sub_recipes.iter().enumerate() {
        for (ingredient_index, line) in sub.ingredients.iter().enumerate() {
            let location = IngredientLocation::SubRecipe { sub_recipe_index, ingredient_index };
            pending.extend(pending_for(location, line));
        }
    }
    pending
}

fn line_at_mut(recipe: &mut ParsedRecipe, location: IngredientLocation) -> Option<&mut ParsedIngredientLine> {
    match location {
        IngredientLocation::FinalDish { index } => match recipe.final_dish_ingredients.get_mut(index)? {
            DishComponent::Ingredient(line) => Some(line),
            DishComponent::SubRecipe(_) => None,
        },
        IngredientLocation::SubRecipe { sub_recipe_index, ingredient_index } => recipe
            .sub_recipes
            .get_mut(sub_recipe_index)?
            .ingredients
            .get_mut(ingredient_index),
    }
}

/// Apply a batch of choices in place; returns how many lines were resolved.
///
/// Choices addressing a missing or unflagged line are ignored.
pub fn apply_specifications(recipe: &mut ParsedRecipe, choices: &[SpecificationChoice]) -> usize {
    let mut applied = 0;
    for choice in choices {
        let Some(line) = line_at_mut(recipe, choice.location) else {
            warn!(location = ?choice.location, "Specification choice for a missing ingredient ignored");
            continue;
        };
        if !line.needs_specification {
            continue;
        }
        *line = apply_specification(line, choice.choice.as_deref());
        debug!(name = %line.ingredient_name, "Applied specification");
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubRecipe;

    fn tomato_line() -> ParsedIngredientLine {
        resolve_specification(ParsedIngredientLine::new(2.0, "tomato", "tomatoes", "2 tomatoes"))
    }

    #[test]
    fn test_flags_high_variation_unit() {
        let line = tomato_line();
        assert!(line.needs_specification);
        assert_eq!(line.base_ingredient.as_deref(), Some("tomato"));
        assert!(line.specification_options.as_ref().unwrap().contains(&"roma".to_string()));
        assert!(line.specification_prompt.as_ref().unwrap().starts_with("What kind of tomato? (cherry, grape"));
    }

    #[test]
    fn test_named_variety_is_not_flagged() {
        let line = resolve_specification(ParsedIngredientLine::new(2.0, "tomato", "roma tomatoes", "2 roma tomatoes"));
        assert!(!line.needs_specification);

        let line = resolve_specification(ParsedIngredientLine::new(2.0, "cup", "flour", "2 cups flour"));
        assert!(!line.needs_specification);
        assert!(line.specification_prompt.is_none());
    }

    #[test]
    fn test_apply_choice_and_default() {
        let chosen = apply_specification(&tomato_line(), Some("cherry"));
        assert_eq!(chosen.ingredient_name, "cherry tomatoes");
        assert!(!chosen.needs_specification);
        assert!(chosen.specification_options.is_none());
        assert_eq!(chosen.quantity, 2.0);

        let skipped = apply_specification(&tomato_line(), None);
        assert_eq!(skipped.ingredient_name, "medium tomato");
    }

    #[test]
    fn test_search_text() {
        assert_eq!(search_text("Onion, finely chopped"), "onion");
        assert_eq!(search_text("boneless skinless chicken breast"), "boneless skinless chicken breast");
        assert_eq!(search_text("diced"), "diced");
    }

    #[test]
    fn test_batch_pending_and_apply() {
        let mut recipe = ParsedRecipe {
            final_dish_name: "Salad".to_string(),
            final_dish_ingredients: vec![
                DishComponent::Ingredient(tomato_line()),
                DishComponent::Ingredient(ParsedIngredientLine::new(1.0, "cup", "lettuce", "1 cup lettuce")),
            ],
            sub_recipes: vec![SubRecipe {
                name: "dressing".to_string(),
                ingredients: vec![resolve_specification(ParsedIngredientLine::new(
                    1.0, "onion", "onion", "1 onion",
                ))],
                quantity_in_final_dish: 2.0,
                unit_in_final_dish: "tbsp".to_string(),
            }],
            ..Default::default()
        };

        let pending = pending_specifications(&recipe);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].location, IngredientLocation::FinalDish { index: 0 });
        assert_eq!(
            pending[1].location,
            IngredientLocation::SubRecipe { sub_recipe_index: 0, ingredient_index: 0 }
        );

        let choices = vec![
            SpecificationChoice { location: pending[0].location, choice: Some("roma".to_string()) },
            SpecificationChoice { location: pending[1].location, choice: None },
            SpecificationChoice { location: IngredientLocation::FinalDish { index: 9 }, choice: None },
        ];
        assert_eq!(apply_specifications(&mut recipe, &choices), 2);
        assert_eq!(recipe.final_dish_ingredients[0].name(), "roma tomatoes");
        assert_eq!(recipe.sub_recipes[0].ingredients[0].ingredient_name, "medium onion");
        assert!(pending_specifications(&recipe).is_empty());
    }
}
