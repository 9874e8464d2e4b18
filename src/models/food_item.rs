//! Database food model
//!
//! Records returned by the external food database collaborator.

use serde::{Deserialize, Serialize};

use super::NutrientProfile;

/// Data source tier of a database record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DataTypeTier {
    Foundation,
    #[serde(rename = "SR Legacy")]
    SrLegacy,
    #[serde(rename = "Survey (FNDDS)")]
    Survey,
    Branded,
    Experimental,
    /// Profile computed locally from a sub-recipe
    Recipe,
    #[default]
    Other,
}

impl DataTypeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataTypeTier::Foundation => "Foundation",
            DataTypeTier::SrLegacy => "SR Legacy",
            DataTypeTier::Survey => "Survey (FNDDS)",
            DataTypeTier::Branded => "Branded",
            DataTypeTier::Experimental => "Experimental",
            DataTypeTier::Recipe => "Recipe",
            DataTypeTier::Other => "Other",
        }
    }

    /// Parse the database's data-type label; unknown labels map to `Other`
    pub fn from_label(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "foundation" => DataTypeTier::Foundation,
            "sr legacy" | "sr_legacy" | "srlegacy" => DataTypeTier::SrLegacy,
            "survey (fndds)" | "survey" | "fndds" => DataTypeTier::Survey,
            "branded" => DataTypeTier::Branded,
            "experimental" => DataTypeTier::Experimental,
            "recipe" => DataTypeTier::Recipe,
            _ => DataTypeTier::Other,
        }
    }
}

/// A household measure with its gram weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPortion {
    #[serde(default)]
    pub modifier: String,
    #[serde(default)]
    pub measure_name: String,
    pub gram_weight: f64,
    /// Number of measures the gram weight refers to
    #[serde(default = "default_amount")]
    pub amount: f64,
}

fn default_amount() -> f64 {
    1.0
}

impl FoodPortion {
    /// Grams for a single measure
    pub fn grams_per_unit(&self) -> f64 {
        if self.amount > 0.0 {
            self.gram_weight / self.amount
        } else {
            self.gram_weight
        }
    }
}

/// A food record from the external database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseFood {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub data_type: DataTypeTier,
    #[serde(default)]
    pub nutrients_per_100g: NutrientProfile,
    #[serde(default)]
    pub portions: Vec<FoodPortion>,
}

/// The part of a database record the match scorer looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCandidate {
    #[serde(default)]
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub data_type: DataTypeTier,
}

impl From<&DatabaseFood> for FoodCandidate {
    fn from(food: &DatabaseFood) -> Self {
        Self {
            id: food.id.clone(),
            description: food.description.clone(),
            data_type: food.data_type,
        }
    }
}
