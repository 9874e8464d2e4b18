//! Yield adjustment and serving scaling

use crate::error::{NutritionError, NutritionResult};
use crate::models::NutrientProfile;

/// Largest accepted final/raw weight ratio
pub const MAX_YIELD_MULTIPLIER: f64 = 2.0;

/// Final weight over raw weight.
///
/// Fails with `ZeroWeight` when the raw weight is not positive and with
/// `InvalidYield` when the ratio is outside `(0, 2]`.
pub fn yield_multiplier(raw_weight_g: f64, final_weight_g: f64) -> NutritionResult<f64> {
    if raw_weight_g <= 0.0 || !raw_weight_g.is_finite() {
        return Err(NutritionError::ZeroWeight);
    }
    let multiplier = final_weight_g / raw_weight_g;
    validate_yield(multiplier)?;
    Ok(multiplier)
}

fn validate_yield(multiplier: f64) -> NutritionResult<()> {
    if !multiplier.is_finite() || multiplier <= 0.0 || multiplier > MAX_YIELD_MULTIPLIER {
        return Err(NutritionError::InvalidYield(multiplier));
    }
    Ok(())
}

/// Re-base a per-100 g raw profile onto 100 g of the cooked dish.
///
/// Water loss (multiplier < 1) concentrates every nutrient by `1 / multiplier`.
pub fn adjust_for_yield(profile: &NutrientProfile, multiplier: f64) -> NutritionResult<NutrientProfile> {
    validate_yield(multiplier)?;
    Ok(profile.scale(1.0 / multiplier))
}

fn validate_serving(serving_g: f64) -> NutritionResult<()> {
    if !serving_g.is_finite() || serving_g <= 0.0 {
        return Err(NutritionError::InvalidServingSize(serving_g));
    }
    Ok(())
}

/// Scale a per-100 g profile to one serving
pub fn scale_to_serving(profile: &NutrientProfile, serving_g: f64) -> NutritionResult<NutrientProfile> {
    validate_serving(serving_g)?;
    Ok(profile.scale(serving_g / 100.0))
}

/// Servings in a container, rounded to one decimal
pub fn servings_per_container(total_weight_g: f64, serving_g: f64) -> NutritionResult<f64> {
    validate_serving(serving_g)?;
    Ok((total_weight_g / serving_g * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NutrientProfile {
        NutrientProfile {
            calories: 200.0,
            total_fat: 8.0,
            sodium: 350.0,
            protein: 12.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_yield_concentrates() {
        let cooked = adjust_for_yield(&sample(), 0.8).unwrap();
        assert!((cooked.calories - 250.0).abs() < 1e-9);
        assert!((cooked.sodium - 437.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_yield() {
        assert_eq!(adjust_for_yield(&sample(), 0.0), Err(NutritionError::InvalidYield(0.0)));
        assert_eq!(adjust_for_yield(&sample(), 2.5), Err(NutritionError::InvalidYield(2.5)));
        assert_eq!(adjust_for_yield(&sample(), -1.0), Err(NutritionError::InvalidYield(-1.0)));
        assert!(adjust_for_yield(&sample(), f64::NAN).is_err());
        assert!(adjust_for_yield(&sample(), 2.0).is_ok());
    }

    #[test]
    fn test_yield_multiplier() {
        assert_eq!(yield_multiplier(1000.0, 800.0), Ok(0.8));
        assert_eq!(yield_multiplier(0.0, 800.0), Err(NutritionError::ZeroWeight));
        assert!(matches!(yield_multiplier(100.0, 300.0), Err(NutritionError::InvalidYield(_))));
    }

    #[test]
    fn test_serving_scaling() {
        let serving = scale_to_serving(&sample(), 50.0).unwrap();
        assert_eq!(serving.calories, 100.0);
        assert_eq!(serving.protein, 6.25);

        assert_eq!(scale_to_serving(&sample(), 0.0), Err(NutritionError::InvalidServingSize(0.0)));
    }

    #[test]
    fn test_servings_per_container() {
        assert_eq!(servings_per_container(1000.0, 150.0), Ok(6.7));
        assert_eq!(servings_per_container(500.0, 250.0), Ok(2.0));
        assert!(servings_per_container(500.0, -1.0).is_err());
    }
}
