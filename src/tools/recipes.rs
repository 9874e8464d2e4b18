//! Recipe tools
//!
//! Parsing pasted recipe text and resolving ambiguous ingredients.

use serde::Serialize;

use crate::models::ParsedRecipe;
use crate::parser::{
    apply_specifications, parse_recipe as parse_recipe_text, pending_specifications, InputLimits,
    PendingSpecification, SpecificationChoice,
};

/// Response for parse_recipe
#[derive(Debug, Serialize)]
pub struct ParseRecipeResponse {
    pub recipe: ParsedRecipe,
    pub ingredient_count: usize,
    pub sub_recipe_count: usize,
    pub pending_specifications: Vec<PendingSpecification>,
    /// Human-readable parse issues
    pub errors: Vec<String>,
}

/// Response for resolve_specifications
#[derive(Debug, Serialize)]
pub struct ResolveSpecificationsResponse {
    pub recipe: ParsedRecipe,
    pub applied: usize,
    /// Lines still waiting for a choice
    pub pending_specifications: Vec<PendingSpecification>,
}

/// Parse pasted recipe text
pub fn parse_recipe(text: &str, limits: &InputLimits) -> Result<ParseRecipeResponse, String> {
    let recipe = parse_recipe_text(text, limits).map_err(|e| e.to_string())?;

    Ok(ParseRecipeResponse {
        ingredient_count: recipe.ingredient_count(),
        sub_recipe_count: recipe.sub_recipes.len(),
        pending_specifications: pending_specifications(&recipe),
        errors: recipe.error_messages(),
        recipe,
    })
}

/// Apply specification choices to a parsed recipe
pub fn resolve_specifications(
    mut recipe: ParsedRecipe,
    choices: &[SpecificationChoice],
) -> Result<ResolveSpecificationsResponse, String> {
    let applied = apply_specifications(&mut recipe, choices);
    if applied == 0 && !choices.is_empty() {
        return Err("None of the choices matched a line that needs specification".to_string());
    }

    Ok(ResolveSpecificationsResponse {
        pending_specifications: pending_specifications(&recipe),
        applied,
        recipe,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::IngredientLocation;

    const SALSA: &str = "Chips and Salsa\n\
        1 cup salsa (2 tomato, 1 onion, 1 tbsp cilantro)\n\
        3 tomatoes\n\
        200g tortilla chips\n";

    #[test]
    fn test_parse_recipe_response() {
        let response = parse_recipe(SALSA, &InputLimits::default()).unwrap();
        assert_eq!(response.recipe.final_dish_name, "Chips and Salsa");
        assert_eq!(response.sub_recipe_count, 1);
        assert_eq!(response.ingredient_count, 5);
        assert!(response.errors.is_empty());
        // tomato and onion in the salsa, tomatoes in the dish
        assert_eq!(response.pending_specifications.len(), 3);
    }

    #[test]
    fn test_parse_recipe_too_large() {
        let limits = InputLimits { max_bytes: 10, max_lines: 500 };
        let err = parse_recipe(SALSA, &limits).unwrap_err();
        assert!(err.starts_with("Input too large"));
    }

    #[test]
    fn test_resolve_specifications() {
        let parsed = parse_recipe(SALSA, &InputLimits::default()).unwrap();
        let location = parsed
            .pending_specifications
            .iter()
            .find(|p| matches!(p.location, IngredientLocation::FinalDish { .. }))
            .unwrap()
            .location;

        let response = resolve_specifications(
            parsed.recipe,
            &[SpecificationChoice { location, choice: Some("roma".to_string()) }],
        )
        .unwrap();
        assert_eq!(response.applied, 1);
        assert_eq!(response.pending_specifications.len(), 2);

        let err = resolve_specifications(
            response.recipe,
            &[SpecificationChoice { location, choice: Some("roma".to_string()) }],
        )
        .unwrap_err();
        assert!(err.contains("None of the choices"));
    }
}
