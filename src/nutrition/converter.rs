//! Unit conversion to grams
//!
//! Conversion priority:
//! - Tier 0: the unit already is grams
//! - Tier 1: caller-supplied custom conversion for the ingredient
//! - Tier 2: portion data from the food database record
//! - Tier 3: the static unit table
//! - Tier 4: `UnknownUnit`
//!
//! [`estimate_grams`] is a separate low-confidence path for callers that would
//! rather guess than fail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::units::{grams_per_unit, is_gram_unit, lookup_unit, normalize_unit, UnitCategory, WATER_G_PER_ML};
use crate::error::ConversionError;
use crate::models::FoodPortion;

/// Grams per pinch (1/16 tsp of salt)
pub const PINCH_GRAMS: f64 = 0.36;
/// Grams per dash (1/8 tsp)
pub const DASH_GRAMS: f64 = 0.6;
/// Grams per smidgen (1/32 tsp)
pub const SMIDGEN_GRAMS: f64 = 0.18;
/// Grams per drop
pub const DROP_GRAMS: f64 = 0.05;
/// Flat estimate for units nothing else knows
pub const UNKNOWN_UNIT_GRAMS: f64 = 50.0;

/// Which rule produced a gram weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionTier {
    Grams,
    Custom,
    Portion,
    UnitTable,
    /// Fallback estimate, not one of the conversion tiers
    Estimated,
}

/// A quantity converted to grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GramConversion {
    pub grams: f64,
    pub tier: ConversionTier,
}

/// One caller-supplied conversion: grams per unit of an ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomConversion {
    pub ingredient_id: String,
    pub unit: String,
    pub grams_per_unit: f64,
}

/// Caller-supplied conversions keyed by `(ingredient id, normalized unit)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomConversions {
    grams: HashMap<(String, String), f64>,
}

impl CustomConversions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register grams per unit; non-positive or non-finite weights are ignored
    pub fn insert(&mut self, ingredient_id: &str, unit: &str, grams_per_unit: f64) {
        if grams_per_unit.is_finite() && grams_per_unit > 0.0 {
            self.grams
                .insert((ingredient_id.trim().to_string(), normalize_unit(unit)), grams_per_unit);
        }
    }

    pub fn get(&self, ingredient_id: &str, unit: &str) -> Option<f64> {
        self.grams
            .get(&(ingredient_id.trim().to_string(), normalize_unit(unit)))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }
}

impl FromIterator<CustomConversion> for CustomConversions {
    fn from_iter<I: IntoIterator<Item = CustomConversion>>(iter: I) -> Self {
        let mut conversions = CustomConversions::new();
        for c in iter {
            conversions.insert(&c.ingredient_id, &c.unit, c.grams_per_unit);
        }
        conversions
    }
}

/// Spellings of a unit worth looking for in portion descriptions
fn portion_search_terms(unit: &str) -> Vec<String> {
    let cleaned = unit.trim().trim_end_matches('.').to_lowercase();
    let mut terms = vec![normalize_unit(unit), cleaned];

    if let Some(def) = lookup_unit(unit) {
        terms.extend(def.aliases.iter().filter(|a| a.len() >= 2).map(|a| a.to_string()));
        // Whole produce is usually listed as "medium" or "whole"
        if def.category == UnitCategory::Count && (def.ingredient_noun || def.canonical == "item") {
            terms.push("medium".to_string());
            terms.push("whole".to_string());
        }
    }
    terms.retain(|t| !t.is_empty());
    terms.dedup();
    terms
}

/// Lowercase text padded with spaces, punctuation blanked, for whole-word search
fn padded_words(text: &str) -> String {
    let blanked: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == ' ' { c } else { ' ' })
        .collect();
    format!(" {} ", blanked)
}

/// Grams per unit from the first portion whose modifier or measure name mentions the unit
pub fn portion_grams_per_unit(unit: &str, portions: &[FoodPortion]) -> Option<f64> {
    let described: Vec<(String, &FoodPortion)> = portions
        .iter()
        .filter(|p| p.gram_weight > 0.0)
        .map(|p| (padded_words(&format!("{} {}", p.modifier, p.measure_name)), p))
        .collect();

    for term in portion_search_terms(unit) {
        let needle = format!(" {} ", term);
        if let Some((_, portion)) = described.iter().find(|(text, _)| text.contains(&needle)) {
            return Some(portion.grams_per_unit());
        }
    }
    None
}

/// Convert a quantity to grams through the conversion tiers
pub fn grams_for(
    quantity: f64,
    unit: &str,
    ingredient_id: &str,
    custom: Option<&CustomConversions>,
    portions: Option<&[FoodPortion]>,
) -> Result<GramConversion, ConversionError> {
    if is_gram_unit(unit) {
        return Ok(GramConversion { grams: quantity, tier: ConversionTier::Grams });
    }

    if let Some(per_unit) = custom.and_then(|c| c.get(ingredient_id, unit)) {
        return Ok(GramConversion { grams: quantity * per_unit, tier: ConversionTier::Custom });
    }

    if let Some(per_unit) = portions.and_then(|p| portion_grams_per_unit(unit, p)) {
        return Ok(GramConversion { grams: quantity * per_unit, tier: ConversionTier::Portion });
    }

    if let Some(per_unit) = grams_per_unit(unit) {
        return Ok(GramConversion { grams: quantity * per_unit, tier: ConversionTier::UnitTable });
    }

    Err(ConversionError::UnknownUnit {
        ingredient: ingredient_id.to_string(),
        unit: unit.to_string(),
    })
}

/// Low-confidence gram estimate that never fails
pub fn estimate_grams(quantity: f64, unit: &str) -> f64 {
    let canonical = normalize_unit(unit);
    let per_unit = match canonical.as_str() {
        "pinch" => Some(PINCH_GRAMS),
        "dash" => Some(DASH_GRAMS),
        "smidgen" => Some(SMIDGEN_GRAMS),
        "drop" => Some(DROP_GRAMS),
        _ => lookup_unit(unit).and_then(|def| match def.category {
            // Table volumes are stored in ml; assume water
            UnitCategory::Volume => def.grams.map(|ml| ml * WATER_G_PER_ML),
            _ => def.grams,
        }),
    };

    match per_unit {
        Some(grams) => quantity * grams,
        None => {
            tracing::warn!(
                "Unit estimate fallback: '{}' has no known weight. Assuming {} g per unit.",
                unit,
                UNKNOWN_UNIT_GRAMS
            );
            quantity * UNKNOWN_UNIT_GRAMS
        }
    }
}

/// Run the conversion tiers and fall back to [`estimate_grams`] when they fail
pub fn grams_or_estimate(
    quantity: f64,
    unit: &str,
    ingredient_id: &str,
    custom: Option<&CustomConversions>,
    portions: Option<&[FoodPortion]>,
) -> GramConversion {
    match grams_for(quantity, unit, ingredient_id, custom, portions) {
        Ok(conversion) => conversion,
        Err(err) => {
            tracing::warn!("{}; using estimate", err);
            GramConversion {
                grams: estimate_grams(quantity, unit),
                tier: ConversionTier::Estimated,
            }
        }
    }
}
