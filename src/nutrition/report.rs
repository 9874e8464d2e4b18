//! Nutrition report
//!
//! The serializable record handed to persistence: per-100 g values after yield
//! adjustment, the per-serving profile and the rounded label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{AggregateResult, DataQualityWarning};
use super::rounding::NutritionLabel;
use super::scaling::{adjust_for_yield, scale_to_serving, servings_per_container, yield_multiplier};
use crate::error::NutritionResult;
use crate::models::NutrientProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionReport {
    pub dish_name: String,
    /// Sum of raw ingredient weights
    pub raw_weight_g: f64,
    /// Weight after cooking; equals the raw weight when not measured
    pub final_weight_g: f64,
    pub yield_multiplier: f64,
    /// Per 100 g of the finished dish
    pub per_100g: NutrientProfile,
    pub serving_size_g: f64,
    pub servings_per_container: f64,
    pub per_serving: NutrientProfile,
    pub label: NutritionLabel,
    pub warnings: Vec<DataQualityWarning>,
    pub generated_at: DateTime<Utc>,
}

/// Build a report from an aggregate.
///
/// `final_weight_g` is the cooked weight; `None` means no yield change.
pub fn build_report(
    dish_name: &str,
    aggregate: &AggregateResult,
    final_weight_g: Option<f64>,
    serving_size_g: f64,
) -> NutritionResult<NutritionReport> {
    let raw_weight_g = aggregate.total_weight_g;
    let final_weight_g = final_weight_g.unwrap_or(raw_weight_g);
    let multiplier = yield_multiplier(raw_weight_g, final_weight_g)?;

    let per_100g = adjust_for_yield(&aggregate.profile, multiplier)?;
    let per_serving = scale_to_serving(&per_100g, serving_size_g)?;
    let servings = servings_per_container(final_weight_g, serving_size_g)?;
    let label = NutritionLabel::from_profile(&per_serving);

    tracing::info!(
        dish = dish_name,
        raw_weight_g,
        final_weight_g,
        serving_size_g,
        servings,
        "Built nutrition report"
    );

    Ok(NutritionReport {
        dish_name: dish_name.to_string(),
        raw_weight_g,
        final_weight_g,
        yield_multiplier: multiplier,
        per_100g,
        serving_size_g,
        servings_per_container: servings,
        per_serving,
        label,
        warnings: aggregate.warnings.clone(),
        generated_at: Utc::now(),
    })
}

impl NutritionReport {
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n", self.dish_name);
        out.push_str(&self.label.render_text(Some(self.serving_size_g), Some(self.servings_per_container)));
        for warning in &self.warnings {
            out.push_str(&format!("! {}\n", warning));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NutritionError;
    use crate::models::Nutrient;

    fn aggregate_of(profile: NutrientProfile, total_weight_g: f64) -> AggregateResult {
        AggregateResult {
            profile,
            total_weight_g,
            contributions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_report_applies_yield_then_serving() {
        let profile = NutrientProfile { calories: 200.0, sodium: 400.0, ..Default::default() };
        let report = build_report("Stew", &aggregate_of(profile, 1000.0), Some(800.0), 200.0).unwrap();

        assert!((report.yield_multiplier - 0.8).abs() < 1e-12);
        assert!((report.per_100g.calories - 250.0).abs() < 1e-9);
        assert!((report.per_serving.calories - 500.0).abs() < 1e-9);
        assert_eq!(report.servings_per_container, 4.0);
        assert_eq!(report.label.row(Nutrient::Calories).unwrap().display, "500");
        assert_eq!(report.label.row(Nutrient::Sodium).unwrap().display, "1000 mg");
    }

    #[test]
    fn test_report_without_final_weight() {
        let profile = NutrientProfile { calories: 100.0, ..Default::default() };
        let report = build_report("Salad", &aggregate_of(profile, 300.0), None, 150.0).unwrap();
        assert_eq!(report.yield_multiplier, 1.0);
        assert_eq!(report.servings_per_container, 2.0);
        assert!(report.render_text().starts_with("Salad\nNutrition Facts\n"));
    }

    #[test]
    fn test_report_errors() {
        let agg = aggregate_of(NutrientProfile::zero(), 100.0);
        assert!(matches!(build_report("x", &agg, Some(250.0), 50.0), Err(NutritionError::InvalidYield(_))));
        assert_eq!(build_report("x", &agg, None, 0.0), Err(NutritionError::InvalidServingSize(0.0)));
    }
}
