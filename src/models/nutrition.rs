//! Shared nutrient profile data structure
//!
//! Used for database foods, sub-recipes, whole dishes and servings.
//! Values are per 100 g of the referent unless a caller re-bases them.

use serde::{Deserialize, Serialize};

/// Measurement unit of a nutrient amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientUnit {
    Kcal,
    Grams,
    Milligrams,
    Micrograms,
}

impl NutrientUnit {
    /// Label suffix for this unit
    pub fn symbol(&self) -> &'static str {
        match self {
            NutrientUnit::Kcal => "",
            NutrientUnit::Grams => "g",
            NutrientUnit::Milligrams => "mg",
            NutrientUnit::Micrograms => "mcg",
        }
    }
}

/// Every nutrient tracked by a [`NutrientProfile`], in label order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    TotalFat,
    SaturatedFat,
    TransFat,
    MonounsaturatedFat,
    PolyunsaturatedFat,
    Cholesterol,
    Sodium,
    TotalCarbohydrate,
    DietaryFiber,
    TotalSugars,
    AddedSugars,
    Protein,
    VitaminD,
    Calcium,
    Iron,
    Potassium,
    VitaminA,
    VitaminC,
    VitaminE,
    VitaminK,
    Thiamin,
    Riboflavin,
    Niacin,
    VitaminB6,
    Folate,
    VitaminB12,
    Magnesium,
    Zinc,
}

impl Nutrient {
    /// All nutrients in label order
    pub const ALL: [Nutrient; 29] = [
        Nutrient::Calories,
        Nutrient::TotalFat,
        Nutrient::SaturatedFat,
        Nutrient::TransFat,
        Nutrient::MonounsaturatedFat,
        Nutrient::PolyunsaturatedFat,
        Nutrient::Cholesterol,
        Nutrient::Sodium,
        Nutrient::TotalCarbohydrate,
        Nutrient::DietaryFiber,
        Nutrient::TotalSugars,
        Nutrient::AddedSugars,
        Nutrient::Protein,
        Nutrient::VitaminD,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Potassium,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::Thiamin,
        Nutrient::Riboflavin,
        Nutrient::Niacin,
        Nutrient::VitaminB6,
        Nutrient::Folate,
        Nutrient::VitaminB12,
        Nutrient::Magnesium,
        Nutrient::Zinc,
    ];

    /// Label display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::TotalFat => "Total Fat",
            Nutrient::SaturatedFat => "Saturated Fat",
            Nutrient::TransFat => "Trans Fat",
            Nutrient::MonounsaturatedFat => "Monounsaturated Fat",
            Nutrient::PolyunsaturatedFat => "Polyunsaturated Fat",
            Nutrient::Cholesterol => "Cholesterol",
            Nutrient::Sodium => "Sodium",
            Nutrient::TotalCarbohydrate => "Total Carbohydrate",
            Nutrient::DietaryFiber => "Dietary Fiber",
            Nutrient::TotalSugars => "Total Sugars",
            Nutrient::AddedSugars => "Added Sugars",
            Nutrient::Protein => "Protein",
            Nutrient::VitaminD => "Vitamin D",
            Nutrient::Calcium => "Calcium",
            Nutrient::Iron => "Iron",
            Nutrient::Potassium => "Potassium",
            Nutrient::VitaminA => "Vitamin A",
            Nutrient::VitaminC => "Vitamin C",
            Nutrient::VitaminE => "Vitamin E",
            Nutrient::VitaminK => "Vitamin K",
            Nutrient::Thiamin => "Thiamin",
            Nutrient::Riboflavin => "Riboflavin",
            Nutrient::Niacin => "Niacin",
            Nutrient::VitaminB6 => "Vitamin B6",
            Nutrient::Folate => "Folate",
            Nutrient::VitaminB12 => "Vitamin B12",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Zinc => "Zinc",
        }
    }

    /// Unit the amount is stored in
    pub fn unit(&self) -> NutrientUnit {
        match self {
            Nutrient::Calories => NutrientUnit::Kcal,
            Nutrient::TotalFat
            | Nutrient::SaturatedFat
            | Nutrient::TransFat
            | Nutrient::MonounsaturatedFat
            | Nutrient::PolyunsaturatedFat
            | Nutrient::TotalCarbohydrate
            | Nutrient::DietaryFiber
            | Nutrient::TotalSugars
            | Nutrient::AddedSugars
            | Nutrient::Protein => NutrientUnit::Grams,
            Nutrient::VitaminD
            | Nutrient::VitaminA
            | Nutrient::VitaminK
            | Nutrient::Folate
            | Nutrient::VitaminB12 => NutrientUnit::Micrograms,
            _ => NutrientUnit::Milligrams,
        }
    }

    /// FDA reference daily value, if the nutrient has one
    pub fn daily_value(&self) -> Option<f64> {
        match self {
            Nutrient::Calories
            | Nutrient::TransFat
            | Nutrient::MonounsaturatedFat
            | Nutrient::PolyunsaturatedFat
            | Nutrient::TotalSugars => None,
            Nutrient::TotalFat => Some(78.0),
            Nutrient::SaturatedFat => Some(20.0),
            Nutrient::Cholesterol => Some(300.0),
            Nutrient::Sodium => Some(2300.0),
            Nutrient::TotalCarbohydrate => Some(275.0),
            Nutrient::DietaryFiber => Some(28.0),
            Nutrient::AddedSugars => Some(50.0),
            Nutrient::Protein => Some(50.0),
            Nutrient::VitaminD => Some(20.0),
            Nutrient::Calcium => Some(1300.0),
            Nutrient::Iron => Some(18.0),
            Nutrient::Potassium => Some(4700.0),
            Nutrient::VitaminA => Some(900.0),
            Nutrient::VitaminC => Some(90.0),
            Nutrient::VitaminE => Some(15.0),
            Nutrient::VitaminK => Some(120.0),
            Nutrient::Thiamin => Some(1.2),
            Nutrient::Riboflavin => Some(1.3),
            Nutrient::Niacin => Some(16.0),
            Nutrient::VitaminB6 => Some(1.7),
            Nutrient::Folate => Some(400.0),
            Nutrient::VitaminB12 => Some(2.4),
            Nutrient::Magnesium => Some(420.0),
            Nutrient::Zinc => Some(11.0),
        }
    }

    /// Whether this nutrient is a vitamin or mineral (affects % DV rounding)
    pub fn is_micronutrient(&self) -> bool {
        matches!(
            self,
            Nutrient::VitaminD
                | Nutrient::Calcium
                | Nutrient::Iron
                | Nutrient::Potassium
                | Nutrient::VitaminA
                | Nutrient::VitaminC
                | Nutrient::VitaminE
                | Nutrient::VitaminK
                | Nutrient::Thiamin
                | Nutrient::Riboflavin
                | Nutrient::Niacin
                | Nutrient::VitaminB6
                | Nutrient::Folate
                | Nutrient::VitaminB12
                | Nutrient::Magnesium
                | Nutrient::Zinc
        )
    }

    /// Data-quality ceiling per 100 g; values above are flagged, not clamped
    pub fn plausibility_ceiling(&self) -> Option<f64> {
        match self {
            Nutrient::Calories => Some(9000.0),
            Nutrient::TotalFat | Nutrient::Protein | Nutrient::TotalCarbohydrate => Some(100.0),
            Nutrient::Sodium => Some(100_000.0),
            Nutrient::Cholesterol => Some(3000.0),
            _ => None,
        }
    }
}

/// Nutritional information, one field per [`Nutrient`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientProfile {
    pub calories: f64,
    pub total_fat: f64,                // grams
    pub saturated_fat: f64,            // grams
    pub trans_fat: f64,                // grams
    pub monounsaturated_fat: f64,      // grams
    pub polyunsaturated_fat: f64,      // grams
    pub cholesterol: f64,              // milligrams
    pub sodium: f64,                   // milligrams
    pub total_carbohydrate: f64,       // grams
    pub dietary_fiber: f64,            // grams
    pub total_sugars: f64,             // grams
    pub added_sugars: f64,             // grams
    pub protein: f64,                  // grams
    pub vitamin_d: f64,                // micrograms
    pub calcium: f64,                  // milligrams
    pub iron: f64,                     // milligrams
    pub potassium: f64,                // milligrams
    pub vitamin_a: f64,                // micrograms RAE
    pub vitamin_c: f64,                // milligrams
    pub vitamin_e: f64,                // milligrams
    pub vitamin_k: f64,                // micrograms
    pub thiamin: f64,                  // milligrams
    pub riboflavin: f64,               // milligrams
    pub niacin: f64,                   // milligrams
    pub vitamin_b6: f64,               // milligrams
    pub folate: f64,                   // micrograms DFE
    pub vitamin_b12: f64,              // micrograms
    pub magnesium: f64,                // milligrams
    pub zinc: f64,                     // milligrams
}

impl NutrientProfile {
    /// Create a new profile with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a profile by evaluating `f` for every nutrient
    pub fn from_fn(mut f: impl FnMut(Nutrient) -> f64) -> Self {
        let mut profile = Self::zero();
        for nutrient in Nutrient::ALL {
            *profile.get_mut(nutrient) = f(nutrient);
        }
        profile
    }

    /// Read one nutrient
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::TotalFat => self.total_fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::TransFat => self.trans_fat,
            Nutrient::MonounsaturatedFat => self.monounsaturated_fat,
            Nutrient::PolyunsaturatedFat => self.polyunsaturated_fat,
            Nutrient::Cholesterol => self.cholesterol,
            Nutrient::Sodium => self.sodium,
            Nutrient::TotalCarbohydrate => self.total_carbohydrate,
            Nutrient::DietaryFiber => self.dietary_fiber,
            Nutrient::TotalSugars => self.total_sugars,
            Nutrient::AddedSugars => self.added_sugars,
            Nutrient::Protein => self.protein,
            Nutrient::VitaminD => self.vitamin_d,
            Nutrient::Calcium => self.calcium,
            Nutrient::Iron => self.iron,
            Nutrient::Potassium => self.potassium,
            Nutrient::VitaminA => self.vitamin_a,
            Nutrient::VitaminC => self.vitamin_c,
            Nutrient::VitaminE => self.vitamin_e,
            Nutrient::VitaminK => self.vitamin_k,
            Nutrient::Thiamin => self.thiamin,
            Nutrient::Riboflavin => self.riboflavin,
            Nutrient::Niacin => self.niacin,
            Nutrient::VitaminB6 => self.vitamin_b6,
            Nutrient::Folate => self.folate,
            Nutrient::VitaminB12 => self.vitamin_b12,
            Nutrient::Magnesium => self.magnesium,
            Nutrient::Zinc => self.zinc,
        }
    }

    /// Mutable access to one nutrient
    pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut f64 {
        match nutrient {
            Nutrient::Calories => &mut self.calories,
            Nutrient::TotalFat => &mut self.total_fat,
            Nutrient::SaturatedFat => &mut self.saturated_fat,
            Nutrient::TransFat => &mut self.trans_fat,
            Nutrient::MonounsaturatedFat => &mut self.monounsaturated_fat,
            Nutrient::PolyunsaturatedFat => &mut self.polyunsaturated_fat,
            Nutrient::Cholesterol => &mut self.cholesterol,
            Nutrient::Sodium => &mut self.sodium,
            Nutrient::TotalCarbohydrate => &mut self.total_carbohydrate,
            Nutrient::DietaryFiber => &mut self.dietary_fiber,
            Nutrient::TotalSugars => &mut self.total_sugars,
            Nutrient::AddedSugars => &mut self.added_sugars,
            Nutrient::Protein => &mut self.protein,
            Nutrient::VitaminD => &mut self.vitamin_d,
            Nutrient::Calcium => &mut self.calcium,
            Nutrient::Iron => &mut self.iron,
            Nutrient::Potassium => &mut self.potassium,
            Nutrient::VitaminA => &mut self.vitamin_a,
            Nutrient::VitaminC => &mut self.vitamin_c,
            Nutrient::VitaminE => &mut self.vitamin_e,
            Nutrient::VitaminK => &mut self.vitamin_k,
            Nutrient::Thiamin => &mut self.thiamin,
            Nutrient::Riboflavin => &mut self.riboflavin,
            Nutrient::Niacin => &mut self.niacin,
            Nutrient::VitaminB6 => &mut self.vitamin_b6,
            Nutrient::Folate => &mut self.folate,
            Nutrient::VitaminB12 => &mut self.vitamin_b12,
            Nutrient::Magnesium => &mut self.magnesium,
            Nutrient::Zinc => &mut self.zinc,
        }
    }

    /// Iterate `(nutrient, value)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::ALL.into_iter().map(move |n| (n, self.get(n)))
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self::from_fn(|n| self.get(n) * multiplier)
    }

    /// Add another profile to this one
    pub fn add(&self, other: &NutrientProfile) -> Self {
        Self::from_fn(|n| self.get(n) + other.get(n))
    }
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, multiplier: f64) -> NutrientProfile {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_cover_every_nutrient() {
        let profile = NutrientProfile::from_fn(|n| Nutrient::ALL.iter().position(|m| *m == n).unwrap() as f64);
        for (i, nutrient) in Nutrient::ALL.iter().enumerate() {
            assert_eq!(profile.get(*nutrient), i as f64);
        }
    }

    #[test]
    fn test_scale_and_sum() {
        let a = NutrientProfile { calories: 100.0, protein: 10.0, ..Default::default() };
        let b = NutrientProfile { calories: 50.0, sodium: 200.0, ..Default::default() };

        let total: NutrientProfile = vec![a.clone(), b].into_iter().sum();
        assert_eq!(total.calories, 150.0);
        assert_eq!(total.sodium, 200.0);

        let half = a * 0.5;
        assert_eq!(half.calories, 50.0);
        assert_eq!(half.protein, 5.0);
    }

    #[test]
    fn test_daily_values() {
        assert_eq!(Nutrient::TotalFat.daily_value(), Some(78.0));
        assert_eq!(Nutrient::Sodium.daily_value(), Some(2300.0));
        assert_eq!(Nutrient::Potassium.daily_value(), Some(4700.0));
        assert_eq!(Nutrient::Calories.daily_value(), None);
        assert_eq!(Nutrient::TotalSugars.daily_value(), None);
    }

    #[test]
    fn test_deserialize_partial_profile() {
        let profile: NutrientProfile =
            serde_json::from_str(r#"{"calories": 364.0, "total_fat": 1.0}"#).unwrap();
        assert_eq!(profile.calories, 364.0);
        assert_eq!(profile.total_fat, 1.0);
        assert_eq!(profile.sodium, 0.0);
    }
}
