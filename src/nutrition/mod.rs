//! Nutrition calculation module
//!
//! Unit conversion, aggregation, yield adjustment, serving scaling and label rounding.

pub mod aggregate;
pub mod converter;
pub mod report;
pub mod rounding;
pub mod scaling;
pub mod units;

pub use aggregate::{
    aggregate, aggregate_recipe, check_profile, AggregateResult, AggregationOptions, DataQualityWarning,
    IngredientContribution, RecipeAggregate, SubRecipeAggregate,
};
pub use converter::{
    estimate_grams, grams_for, grams_or_estimate, ConversionTier, CustomConversion, CustomConversions, GramConversion,
};
pub use report::{build_report, NutritionReport};
pub use rounding::{
    percent_daily_value, round_calories, round_carbohydrate, round_cholesterol, round_fat, round_nutrient,
    round_saturated_fat, round_sodium, LabelRow, NutritionLabel, RoundedAmount, RoundingRule,
};
pub use scaling::{adjust_for_yield, scale_to_serving, servings_per_container, yield_multiplier};
pub use units::{categorize_unit, grams_per_unit, ml_per_unit, normalize_unit, UnitCategory};
