//! Nutrition tools
//!
//! Aggregating a matched recipe into a nutrition report, and formatting labels.

use serde::{Deserialize, Serialize};

use crate::models::{DatabaseFood, DishComponent, MatchedIngredient, NutrientProfile, ParsedIngredientLine, ParsedRecipe};
use crate::nutrition::{
    aggregate_recipe, build_report, AggregationOptions, CustomConversion, IngredientContribution, NutritionLabel,
    NutritionReport, SubRecipeAggregate,
};
use crate::parser::IngredientLocation;

/// Food chosen for one ingredient line
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoodAssignment {
    pub location: IngredientLocation,
    #[serde(default)]
    pub food: Option<DatabaseFood>,
    /// Exclude the ingredient from nutrition
    #[serde(default)]
    pub skip: bool,
    /// The food was picked by the user rather than the ranking
    #[serde(default)]
    pub user_override: bool,
}

/// Everything calculate_nutrition needs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalculateNutritionRequest {
    pub recipe: ParsedRecipe,
    pub assignments: Vec<FoodAssignment>,
    pub serving_size_g: f64,
    #[serde(default)]
    pub final_weight_g: Option<f64>,
    #[serde(default)]
    pub custom_conversions: Vec<CustomConversion>,
    #[serde(default)]
    pub use_fallback_estimates: bool,
}

/// Response for calculate_nutrition
#[derive(Debug, Serialize)]
pub struct CalculateNutritionResponse {
    pub report: NutritionReport,
    pub sub_recipes: Vec<SubRecipeAggregate>,
    pub contributions: Vec<IngredientContribution>,
    /// Lines that had no assignment and were left out
    pub unassigned: Vec<String>,
}

/// Response for format_nutrition_label
#[derive(Debug, Serialize)]
pub struct FormatLabelResponse {
    pub label: NutritionLabel,
    pub text: String,
}

/// Pair one line with its assignment; missing assignments are skipped and reported
fn match_line(
    location: IngredientLocation,
    line: &ParsedIngredientLine,
    assignments: &[FoodAssignment],
    unassigned: &mut Vec<String>,
) -> MatchedIngredient {
    let id = line.ingredient_name.trim();
    let assignment = assignments.iter().find(|a| a.location == location);

    match assignment {
        Some(a) if a.skip => MatchedIngredient::skipped(id, line.clone()),
        Some(FoodAssignment { food: Some(food), user_override: true, .. }) => {
            MatchedIngredient::overridden(id, line.clone(), food.clone())
        }
        Some(FoodAssignment { food: Some(food), .. }) => MatchedIngredient::automatic(id, line.clone(), food.clone()),
        _ => {
            unassigned.push(line.original_line.clone());
            MatchedIngredient::skipped(id, line.clone())
        }
    }
}

/// Aggregate a parsed, matched recipe into a nutrition report
pub fn calculate_nutrition(request: &CalculateNutritionRequest) -> Result<CalculateNutritionResponse, String> {
    let recipe = &request.recipe;
    let mut unassigned = Vec::new();

    let mut final_dish = Vec::new();
    for (index, component) in recipe.final_dish_ingredients.iter().enumerate() {
        if let DishComponent::Ingredient(line) = component {
            final_dish.push(match_line(
                IngredientLocation::FinalDish { index },
                line,
                &request.assignments,
                &mut unassigned,
            ));
        }
    }

    let sub_recipes: Vec<Vec<MatchedIngredient>> = recipe
        .sub_recipes
        .iter()
        .enumerate()
        .map(|(sub_recipe_index, sub)| {
            sub.ingredients
                .iter()
                .enumerate()
                .map(|(ingredient_index, line)| {
                    let location = IngredientLocation::SubRecipe { sub_recipe_index, ingredient_index };
                    match_line(location, line, &request.assignments, &mut unassigned)
                })
                .collect()
        })
        .collect();

    let options = AggregationOptions {
        custom_conversions: request.custom_conversions.iter().cloned().collect(),
        use_fallback_estimates: request.use_fallback_estimates,
    };

    let aggregate = aggregate_recipe(recipe, &final_dish, &sub_recipes, &options).map_err(|e| e.to_string())?;
    let report = build_report(
        &recipe.final_dish_name,
        &aggregate.final_dish,
        request.final_weight_g,
        request.serving_size_g,
    )
    .map_err(|e| e.to_string())?;

    if !unassigned.is_empty() {
        tracing::warn!("{} ingredient(s) had no food assignment and were left out", unassigned.len());
    }

    Ok(CalculateNutritionResponse {
        report,
        sub_recipes: aggregate.sub_recipes,
        contributions: aggregate.final_dish.contributions,
        unassigned,
    })
}

/// Round a per-serving profile into label rows and text
pub fn format_nutrition_label(
    per_serving: &NutrientProfile,
    serving_size_g: Option<f64>,
    servings_per_container: Option<f64>,
) -> FormatLabelResponse {
    let label = NutritionLabel::from_profile(per_serving);
    let text = label.render_text(serving_size_g, servings_per_container);
    FormatLabelResponse { label, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataTypeTier, FoodPortion, Nutrient};
    use crate::parser::{parse_recipe, InputLimits};

    fn food(id: &str, profile: NutrientProfile, portions: Vec<FoodPortion>) -> Option<DatabaseFood> {
        Some(DatabaseFood {
            id: id.to_string(),
            description: id.to_string(),
            data_type: DataTypeTier::SrLegacy,
            nutrients_per_100g: profile,
            portions,
        })
    }

    fn assign(location: IngredientLocation, food: Option<DatabaseFood>) -> FoodAssignment {
        FoodAssignment { location, food, skip: false, user_override: false }
    }

    #[test]
    fn test_calculate_nutrition_end_to_end() {
        let recipe = parse_recipe("Rice Bowl\n200 g rice\n100 g chicken breast\n1 tbsp soy sauce\n", &InputLimits::default())
            .unwrap();
        assert_eq!(recipe.final_dish_ingredients.len(), 3);

        let request = CalculateNutritionRequest {
            recipe,
            assignments: vec![
                assign(IngredientLocation::FinalDish { index: 0 }, food("rice", NutrientProfile { calories: 130.0, ..Default::default() }, vec![])),
                assign(
                    IngredientLocation::FinalDish { index: 1 },
                    food("chicken", NutrientProfile { calories: 160.0, protein: 30.0, ..Default::default() }, vec![]),
                ),
                FoodAssignment { location: IngredientLocation::FinalDish { index: 2 }, food: None, skip: true, user_override: false },
            ],
            serving_size_g: 150.0,
            final_weight_g: None,
            custom_conversions: Vec::new(),
            use_fallback_estimates: false,
        };

        let response = calculate_nutrition(&request).unwrap();
        let report = &response.report;
        assert_eq!(report.dish_name, "Rice Bowl");
        assert_eq!(report.raw_weight_g, 300.0);
        assert_eq!(report.servings_per_container, 2.0);
        // (200 * 1.3 + 100 * 1.6) / 300 g = 140 kcal per 100 g
        assert!((report.per_100g.calories - 140.0).abs() < 1e-9);
        assert!((report.per_serving.calories - 210.0).abs() < 1e-9);
        assert_eq!(report.label.row(Nutrient::Protein).unwrap().display, "15 g");
        assert!(response.unassigned.is_empty());
        assert_eq!(response.contributions.len(), 2);
    }

    #[test]
    fn test_unassigned_lines_are_reported() {
        let recipe = parse_recipe("Toast\n2 slices bread\n10 g butter\n", &InputLimits::default()).unwrap();
        let request = CalculateNutritionRequest {
            recipe,
            assignments: vec![assign(
                IngredientLocation::FinalDish { index: 1 },
                food("butter", NutrientProfile { calories: 717.0, total_fat: 81.0, ..Default::default() }, vec![]),
            )],
            serving_size_g: 10.0,
            final_weight_g: None,
            custom_conversions: Vec::new(),
            use_fallback_estimates: false,
        };

        let response = calculate_nutrition(&request).unwrap();
        assert_eq!(response.unassigned, vec!["2 slices bread".to_string()]);
        assert_eq!(response.report.raw_weight_g, 10.0);
    }

    #[test]
    fn test_errors_become_messages() {
        let recipe = parse_recipe("Mystery\n1 scoop protein powder\n", &InputLimits::default()).unwrap();
        let request = CalculateNutritionRequest {
            recipe,
            assignments: vec![assign(IngredientLocation::FinalDish { index: 0 }, food("powder", NutrientProfile::zero(), vec![]))],
            serving_size_g: 30.0,
            final_weight_g: None,
            custom_conversions: Vec::new(),
            use_fallback_estimates: false,
        };
        let err = calculate_nutrition(&request).unwrap_err();
        assert!(err.contains("Unknown unit"));

        // the unit was not recognized, so the whole text is the ingredient name
        let request = CalculateNutritionRequest {
            custom_conversions: vec![CustomConversion {
                ingredient_id: "scoop protein powder".to_string(),
                unit: "item".to_string(),
                grams_per_unit: 30.0,
            }],
            ..request
        };
        let response = calculate_nutrition(&request).unwrap();
        assert_eq!(response.report.raw_weight_g, 30.0);
    }

    #[test]
    fn test_format_label() {
        let response = format_nutrition_label(&NutrientProfile { calories: 96.0, ..Default::default() }, Some(30.0), None);
        assert_eq!(response.label.rows.len(), Nutrient::ALL.len());
        assert!(response.text.contains("Calories 100\n"));
        assert!(response.text.contains("Serving size 30 g\n"));
    }
}
