//! Nutrient aggregation
//!
//! Converts each matched ingredient to grams, scales its per-100 g profile to
//! that weight, sums everything and re-bases the total onto 100 g of the whole.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::converter::{grams_for, grams_or_estimate, ConversionTier, CustomConversions};
use crate::error::{NutritionError, NutritionResult};
use crate::models::{
    DataTypeTier, DatabaseFood, DishComponent, FoodPortion, MatchedIngredient, Nutrient, NutrientProfile, ParsedIngredientLine,
    ParsedRecipe,
};

/// Options for one aggregation call
#[derive(Debug, Clone, Default)]
pub struct AggregationOptions {
    pub custom_conversions: CustomConversions,
    /// Estimate grams for unknown units instead of failing
    pub use_fallback_estimates: bool,
}

/// Data-quality finding; never aborts aggregation
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    #[error("{nutrient:?} was negative ({value}), clamped to 0")]
    NegativeClamped { nutrient: Nutrient, value: f64 },

    #[error("{nutrient:?} is implausibly high: {value} per 100 g (ceiling {ceiling})")]
    ExceedsCeiling { nutrient: Nutrient, value: f64, ceiling: f64 },

    #[error("Saturated fat ({saturated} g) exceeds total fat ({total} g)")]
    SaturatedExceedsTotalFat { saturated: f64, total: f64 },

    #[error("Added sugars ({added} g) exceed total sugars ({total} g)")]
    AddedExceedsTotalSugars { added: f64, total: f64 },

    #[error("Weight of '{ingredient}' estimated at {grams} g ({unit} has no known conversion)")]
    EstimatedWeight { ingredient: String, unit: String, grams: f64 },
}

/// Weight one ingredient added to the total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientContribution {
    pub ingredient_id: String,
    pub grams: f64,
    pub tier: ConversionTier,
}

/// Per-100 g profile of a list of ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub profile: NutrientProfile,
    pub total_weight_g: f64,
    pub contributions: Vec<IngredientContribution>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Clamp negatives to 0 and flag implausible or inconsistent values
pub fn check_profile(profile: &mut NutrientProfile) -> Vec<DataQualityWarning> {
    let mut warnings = Vec::new();

    for nutrient in Nutrient::ALL {
        let value = profile.get(nutrient);
        if value < 0.0 || value.is_nan() {
            warn!(?nutrient, value, "Negative nutrient value clamped to 0");
            *profile.get_mut(nutrient) = 0.0;
            warnings.push(DataQualityWarning::NegativeClamped { nutrient, value });
            continue;
        }
        if let Some(ceiling) = nutrient.plausibility_ceiling() {
            if value > ceiling {
                warn!(?nutrient, value, ceiling, "Nutrient value above plausibility ceiling");
                warnings.push(DataQualityWarning::ExceedsCeiling { nutrient, value, ceiling });
            }
        }
    }

    if profile.saturated_fat > profile.total_fat {
        warn!(saturated = profile.saturated_fat, total = profile.total_fat, "Saturated fat exceeds total fat");
        warnings.push(DataQualityWarning::SaturatedExceedsTotalFat {
            saturated: profile.saturated_fat,
            total: profile.total_fat,
        });
    }
    if profile.added_sugars > profile.total_sugars {
        warn!(added = profile.added_sugars, total = profile.total_sugars, "Added sugars exceed total sugars");
        warnings.push(DataQualityWarning::AddedExceedsTotalSugars {
            added: profile.added_sugars,
            total: profile.total_sugars,
        });
    }

    warnings
}

/// Aggregate matched ingredients into a per-100 g profile.
///
/// Skipped ingredients add neither nutrients nor weight. Fails with
/// [`NutritionError::ZeroWeight`] when nothing weighs anything, and with
/// [`NutritionError::Conversion`] for an unknown unit unless fallback
/// estimates are enabled.
pub fn aggregate(ingredients: &[MatchedIngredient], options: &AggregationOptions) -> NutritionResult<AggregateResult> {
    let mut sum = NutrientProfile::zero();
    let mut total_weight_g = 0.0;
    let mut contributions = Vec::with_capacity(ingredients.len());
    let mut warnings = Vec::new();

    for ingredient in ingredients {
        let Some(food) = ingredient.food() else {
            debug!(ingredient = %ingredient.ingredient_id, "Skipped ingredient excluded from aggregation");
            continue;
        };

        let line = &ingredient.line;
        let custom = Some(&options.custom_conversions);
        let portions = Some(food.portions.as_slice());
        let conversion = if options.use_fallback_estimates {
            grams_or_estimate(line.quantity, &line.unit, &ingredient.ingredient_id, custom, portions)
        } else {
            grams_for(line.quantity, &line.unit, &ingredient.ingredient_id, custom, portions)?
        };

        if conversion.tier == ConversionTier::Estimated {
            warnings.push(DataQualityWarning::EstimatedWeight {
                ingredient: ingredient.ingredient_id.clone(),
                unit: line.unit.clone(),
                grams: conversion.grams,
            });
        }

        sum = sum.add(&food.nutrients_per_100g.scale(conversion.grams / 100.0));
        total_weight_g += conversion.grams;
        contributions.push(IngredientContribution {
            ingredient_id: ingredient.ingredient_id.clone(),
            grams: conversion.grams,
            tier: conversion.tier,
        });
    }

    if total_weight_g <= 0.0 || !total_weight_g.is_finite() {
        return Err(NutritionError::ZeroWeight);
    }

    let mut profile = sum.scale(100.0 / total_weight_g);
    warnings.extend(check_profile(&mut profile));

    debug!(total_weight_g, ingredients = contributions.len(), "Aggregated ingredients");
    Ok(AggregateResult {
        profile,
        total_weight_g,
        contributions,
        warnings,
    })
}

/// Aggregate result for one named sub-recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRecipeAggregate {
    pub name: String,
    pub result: AggregateResult,
}

/// Aggregates for every sub-recipe and for the final dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeAggregate {
    pub sub_recipes: Vec<SubRecipeAggregate>,
    pub final_dish: AggregateResult,
}

/// Measure names under which a sub-recipe's whole batch is listed
const WHOLE_BATCH_MEASURES: &str = "batch recipe serving";

/// Matched ingredient standing in for a sub-recipe in its parent dish.
///
/// The pseudo-food carries one portion weighing the whole sub-recipe, so a
/// header without a unit ("1 salsa (...)") converts to its raw weight.
pub fn sub_recipe_ingredient(
    name: &str,
    quantity: f64,
    unit: &str,
    original_line: &str,
    result: &AggregateResult,
) -> MatchedIngredient {
    let food = DatabaseFood {
        id: format!("recipe:{}", name),
        description: name.to_string(),
        data_type: DataTypeTier::Recipe,
        nutrients_per_100g: result.profile.clone(),
        portions: vec![FoodPortion {
            modifier: "item".to_string(),
            measure_name: WHOLE_BATCH_MEASURES.to_string(),
            gram_weight: result.total_weight_g,
            amount: 1.0,
        }],
    };
    let line = ParsedIngredientLine::new(quantity, unit, name, original_line);
    MatchedIngredient::automatic(name, line, food)
}

/// Aggregate a parsed recipe.
///
/// `final_dish` holds the matches for the plain ingredients of the dish, in
/// line order, and `sub_recipes[i]` those for `recipe.sub_recipes[i]`. Each
/// sub-recipe is aggregated first and enters the dish as a single pseudo-food
/// at the position of its line.
pub fn aggregate_recipe(
    recipe: &ParsedRecipe,
    final_dish: &[MatchedIngredient],
    sub_recipes: &[Vec<MatchedIngredient>],
    options: &AggregationOptions,
) -> NutritionResult<RecipeAggregate> {
    let mut sub_results = Vec::with_capacity(recipe.sub_recipes.len());
    for (index, sub) in recipe.sub_recipes.iter().enumerate() {
        let matches = sub_recipes.get(index).map(Vec::as_slice).unwrap_or_default();
        let result = aggregate(matches, options)?;
        sub_results.push(SubRecipeAggregate { name: sub.name.clone(), result });
    }

    let mut plain = final_dish.iter();
    let mut dish: Vec<MatchedIngredient> = Vec::with_capacity(recipe.final_dish_ingredients.len());
    for component in &recipe.final_dish_ingredients {
        match component {
            DishComponent::Ingredient(_) => dish.extend(plain.next().cloned()),
            DishComponent::SubRecipe(reference) => {
                let Some(sub) = sub_results.get(reference.sub_recipe_index) else {
                    warn!(sub_recipe = %reference.name, "Sub-recipe reference without a sub-recipe ignored");
                    continue;
                };
                dish.push(sub_recipe_ingredient(
                    &reference.name,
                    reference.quantity,
                    &reference.unit,
                    &reference.original_line,
                    &sub.result,
                ));
            }
        }
    }
    // Matches beyond the recipe's own lines still count
    dish.extend(plain.cloned());

    let final_dish = aggregate(&dish, options)?;
    Ok(RecipeAggregate {
        sub_recipes: sub_results,
        final_dish,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubRecipe, SubRecipeRef};

    fn food(id: &str, profile: NutrientProfile) -> DatabaseFood {
        DatabaseFood {
            id: id.to_string(),
            description: id.to_string(),
            data_type: DataTypeTier::SrLegacy,
            nutrients_per_100g: profile,
            portions: Vec::new(),
        }
    }

    fn grams(id: &str, quantity: f64, profile: NutrientProfile) -> MatchedIngredient {
        let line = ParsedIngredientLine::new(quantity, "g", id, &format!("{}g {}", quantity, id));
        MatchedIngredient::automatic(id, line, food(id, profile))
    }

    #[test]
    fn test_single_100g_ingredient_is_identity() {
        let profile = NutrientProfile {
            calories: 364.0,
            total_fat: 1.0,
            saturated_fat: 0.2,
            protein: 10.3,
            sodium: 2.0,
            ..Default::default()
        };
        let result = aggregate(&[grams("flour", 100.0, profile.clone())], &AggregationOptions::default()).unwrap();
        assert_eq!(result.profile, profile);
        assert_eq!(result.total_weight_g, 100.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_weighted_average() {
        let a = NutrientProfile { calories: 100.0, ..Default::default() };
        let b = NutrientProfile { calories: 400.0, ..Default::default() };
        let result =
            aggregate(&[grams("a", 300.0, a), grams("b", 100.0, b)], &AggregationOptions::default()).unwrap();
        assert!((result.profile.calories - 175.0).abs() < 1e-9);
        assert_eq!(result.total_weight_g, 400.0);
    }

    #[test]
    fn test_skipped_ingredients_add_no_weight() {
        let a = NutrientProfile { calories: 100.0, ..Default::default() };
        let mut skipped = grams("b", 900.0, NutrientProfile { calories: 900.0, ..Default::default() });
        skipped.skip();
        let result = aggregate(&[grams("a", 100.0, a), skipped], &AggregationOptions::default()).unwrap();
        assert_eq!(result.profile.calories, 100.0);
        assert_eq!(result.total_weight_g, 100.0);
    }

    #[test]
    fn test_zero_weight() {
        let options = AggregationOptions::default();
        assert_eq!(aggregate(&[], &options), Err(NutritionError::ZeroWeight));

        let mut skipped = grams("a", 100.0, NutrientProfile::zero());
        skipped.skip();
        assert_eq!(aggregate(&[skipped], &options), Err(NutritionError::ZeroWeight));
    }

    #[test]
    fn test_unknown_unit_fails_without_fallback() {
        let line = ParsedIngredientLine::new(1.0, "scoop", "protein powder", "1 scoop protein powder");
        let matched = MatchedIngredient::automatic("protein", line, food("protein", NutrientProfile::zero()));

        let err = aggregate(&[matched.clone()], &AggregationOptions::default()).unwrap_err();
        assert!(matches!(err, NutritionError::Conversion(_)));

        let options = AggregationOptions { use_fallback_estimates: true, ..Default::default() };
        let result = aggregate(&[matched], &options).unwrap();
        assert_eq!(result.total_weight_g, 50.0);
        assert_eq!(result.contributions[0].tier, ConversionTier::Estimated);
        assert!(matches!(result.warnings[0], DataQualityWarning::EstimatedWeight { .. }));
    }

    #[test]
    fn test_negative_values_clamped_and_inconsistencies_flagged() {
        let bad = NutrientProfile {
            calories: -20.0,
            total_fat: 1.0,
            saturated_fat: 3.0,
            total_sugars: 1.0,
            added_sugars: 2.0,
            sodium: 200_000.0,
            ..Default::default()
        };
        let result = aggregate(&[grams("bad", 100.0, bad)], &AggregationOptions::default()).unwrap();
        assert_eq!(result.profile.calories, 0.0);
        assert!(result.profile.iter().all(|(_, v)| v >= 0.0));

        let w = &result.warnings;
        assert!(w.iter().any(|w| matches!(w, DataQualityWarning::NegativeClamped { nutrient: Nutrient::Calories, .. })));
        assert!(w.iter().any(|w| matches!(w, DataQualityWarning::ExceedsCeiling { nutrient: Nutrient::Sodium, .. })));
        assert!(w.iter().any(|w| matches!(w, DataQualityWarning::SaturatedExceedsTotalFat { .. })));
        assert!(w.iter().any(|w| matches!(w, DataQualityWarning::AddedExceedsTotalSugars { .. })));
    }

    #[test]
    fn test_aggregate_recipe_feeds_sub_recipe_profile() {
        let recipe = ParsedRecipe {
            final_dish_name: "Rice bowl".to_string(),
            final_dish_ingredients: vec![
                DishComponent::Ingredient(ParsedIngredientLine::new(100.0, "g", "rice", "100g rice")),
                DishComponent::SubRecipe(SubRecipeRef {
                    name: "sauce".to_string(),
                    quantity: 100.0,
                    unit: "g".to_string(),
                    original_line: "100g sauce (50g oil, 50g water)".to_string(),
                    sub_recipe_index: 0,
                }),
            ],
            sub_recipes: vec![SubRecipe {
                name: "sauce".to_string(),
                ingredients: vec![],
                quantity_in_final_dish: 100.0,
                unit_in_final_dish: "g".to_string(),
            }],
            ..Default::default()
        };

        let rice = grams("rice", 100.0, NutrientProfile { calories: 130.0, ..Default::default() });
        let sauce = vec![
            grams("oil", 50.0, NutrientProfile { calories: 884.0, total_fat: 100.0, ..Default::default() }),
            grams("water", 50.0, NutrientProfile::zero()),
        ];

        let result = aggregate_recipe(&recipe, &[rice], &[sauce], &AggregationOptions::default()).unwrap();
        assert_eq!(result.sub_recipes[0].name, "sauce");
        assert!((result.sub_recipes[0].result.profile.calories - 442.0).abs() < 1e-9);
        assert_eq!(result.final_dish.total_weight_g, 200.0);
        assert!((result.final_dish.profile.calories - 286.0).abs() < 1e-9);
        assert!((result.final_dish.profile.total_fat - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_unitless_sub_recipe_uses_its_raw_weight() {
        let recipe = crate::parser::parse_recipe(
            "Chips and Salsa\n1 salsa (200 g tomato, 100 g onion)\n100 g chips\n",
            &crate::parser::InputLimits::default(),
        )
        .unwrap();
        assert_eq!(recipe.sub_recipes.len(), 1);
        assert_eq!(recipe.sub_recipes[0].unit_in_final_dish, "item");

        let chips = grams("chips", 100.0, NutrientProfile { calories: 500.0, ..Default::default() });
        let salsa = vec![
            grams("tomato", 200.0, NutrientProfile { calories: 18.0, ..Default::default() }),
            grams("onion", 100.0, NutrientProfile { calories: 40.0, ..Default::default() }),
        ];

        let result = aggregate_recipe(&recipe, &[chips], &[salsa], &AggregationOptions::default()).unwrap();
        assert_eq!(result.final_dish.total_weight_g, 400.0);

        // contributions follow the recipe's line order
        let contributions = &result.final_dish.contributions;
        assert_eq!(contributions[0].ingredient_id, "salsa");
        assert_eq!(contributions[0].grams, 300.0);
        assert_eq!(contributions[0].tier, ConversionTier::Portion);
        assert_eq!(contributions[1].ingredient_id, "chips");
    }

    #[test]
    fn test_sub_recipe_servings_count_whole_batches() {
        let sub = aggregate(
            &[grams("oil", 50.0, NutrientProfile::zero()), grams("water", 70.0, NutrientProfile::zero())],
            &AggregationOptions::default(),
        )
        .unwrap();
        let matched = sub_recipe_ingredient("dressing", 2.0, "servings", "2 servings dressing (...)", &sub);
        let result = aggregate(&[matched], &AggregationOptions::default()).unwrap();
        assert_eq!(result.total_weight_g, 240.0);
    }
}
