//! Recipe parser
//!
//! Runs the sanitizer, line classifier, sub-recipe detector and line parser
//! over a whole pasted recipe and collects everything into a [`ParsedRecipe`].

use tracing::{debug, info, warn};

use crate::error::ParseError;
use crate::models::{DishComponent, ParsedRecipe, SubRecipeRef};
use crate::parser::classify::{classify_line, is_title_candidate, servings_count, LineClass};
use crate::parser::ingredient_line::parse_ingredient_line;
use crate::parser::sanitize::{sanitize, InputLimits};
use crate::parser::sub_recipe::{build_sub_recipe, detect_sub_recipe, SubRecipeDecision};

/// Dish name used when no line qualifies as a title
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Parse raw recipe text.
///
/// Only oversized input fails. Problems with individual lines are recorded in
/// [`ParsedRecipe::errors`] and parsing continues with the next line.
pub fn parse_recipe(raw: &str, limits: &InputLimits) -> Result<ParsedRecipe, ParseError> {
    let text = sanitize(raw, limits)?;
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let title_index = lines.iter().position(|line| is_title_candidate(line));
    let title = title_index.map(|i| lines[i]).unwrap_or("");

    let mut recipe = ParsedRecipe {
        final_dish_name: if title.is_empty() { UNTITLED_RECIPE.to_string() } else { title.to_string() },
        ..Default::default()
    };

    let mut previous: Option<&str> = None;
    for (index, line) in lines.iter().copied().enumerate() {
        if line.is_empty() {
            continue;
        }
        if recipe.explicit_servings.is_none() {
            recipe.explicit_servings = servings_count(line);
        }
        if Some(index) == title_index {
            previous = Some(line);
            continue;
        }

        match classify_line(line, title, previous) {
            LineClass::Skip(reason) => debug!(line, ?reason, "Skipped line"),
            LineClass::Keep => parse_component(line, &mut recipe),
        }
        previous = Some(line);
    }

    info!(
        dish = %recipe.final_dish_name,
        ingredients = recipe.final_dish_ingredients.len(),
        sub_recipes = recipe.sub_recipes.len(),
        errors = recipe.errors.len(),
        "Parsed recipe"
    );
    Ok(recipe)
}

/// Parse one kept line into the final dish, recording any issue
fn parse_component(line: &str, recipe: &mut ParsedRecipe) {
    if let SubRecipeDecision::SubRecipe { prefix, items, nested_parentheses } = detect_sub_recipe(line) {
        match build_sub_recipe(line, &prefix, &items, nested_parentheses) {
            Ok(built) => {
                let sub_recipe_index = recipe.sub_recipes.len();
                recipe.final_dish_ingredients.push(DishComponent::SubRecipe(SubRecipeRef {
                    name: built.sub_recipe.name.clone(),
                    quantity: built.header.quantity,
                    unit: built.header.unit.clone(),
                    original_line: line.to_string(),
                    sub_recipe_index,
                }));
                recipe.sub_recipes.push(built.sub_recipe);
                recipe.errors.extend(built.warnings);
            }
            Err(issue) => {
                warn!(line, %issue, "Sub-recipe rejected");
                recipe.errors.push(issue);
            }
        }
        return;
    }

    match parse_ingredient_line(line) {
        Ok(parsed) => recipe.final_dish_ingredients.push(DishComponent::Ingredient(parsed)),
        Err(issue) => {
            warn!(line, %issue, "Ingredient line not parsed");
            recipe.errors.push(issue);
        }
    }
}
