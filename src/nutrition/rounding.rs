//! Regulatory rounding
//!
//! FDA-style display rules for label amounts and percent daily values. The
//! output strings are part of the label contract and must stay bit-exact.

use serde::{Deserialize, Serialize};

use crate::models::{Nutrient, NutrientProfile};

/// Display rule family for a nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    Calories,
    /// Total, trans, mono- and polyunsaturated fat
    Fat,
    SaturatedFat,
    Cholesterol,
    /// Sodium and potassium
    Sodium,
    /// Carbohydrate, fiber, sugars and protein
    Carbohydrate,
    /// Other vitamins and minerals
    Micronutrient,
}

/// A rounded amount: the number shown and its display string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedAmount {
    pub value: f64,
    pub display: String,
}

impl RoundedAmount {
    fn new(value: f64, display: String) -> Self {
        Self { value, display }
    }
}

fn round_to(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// "2.5" for halves, "3" for whole numbers
fn format_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

impl RoundingRule {
    pub fn for_nutrient(nutrient: Nutrient) -> Self {
        match nutrient {
            Nutrient::Calories => RoundingRule::Calories,
            Nutrient::TotalFat | Nutrient::TransFat | Nutrient::MonounsaturatedFat | Nutrient::PolyunsaturatedFat => {
                RoundingRule::Fat
            }
            Nutrient::SaturatedFat => RoundingRule::SaturatedFat,
            Nutrient::Cholesterol => RoundingRule::Cholesterol,
            Nutrient::Sodium | Nutrient::Potassium => RoundingRule::Sodium,
            Nutrient::TotalCarbohydrate
            | Nutrient::DietaryFiber
            | Nutrient::TotalSugars
            | Nutrient::AddedSugars
            | Nutrient::Protein => RoundingRule::Carbohydrate,
            _ => RoundingRule::Micronutrient,
        }
    }

    /// Round `value` for display; `unit` is the label suffix ("g", "mg", "mcg")
    pub fn apply(&self, value: f64, unit: &str) -> RoundedAmount {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let zero = || RoundedAmount::new(0.0, format!("0 {}", unit));

        match self {
            RoundingRule::Calories => {
                let rounded = if value < 5.0 {
                    0.0
                } else if value <= 50.0 {
                    round_to(value, 5.0)
                } else {
                    round_to(value, 10.0)
                };
                RoundedAmount::new(rounded, format!("{:.0}", rounded))
            }
            RoundingRule::Fat => {
                if value < 0.5 {
                    zero()
                } else {
                    let rounded = if value < 5.0 { round_to(value, 0.5) } else { value.round() };
                    RoundedAmount::new(rounded, format!("{} {}", format_number(rounded), unit))
                }
            }
            RoundingRule::SaturatedFat => {
                if value < 0.5 {
                    zero()
                } else if value < 1.0 {
                    RoundedAmount::new(value, format!("Less than 1 {}", unit))
                } else {
                    let rounded = round_to(value, 0.5);
                    RoundedAmount::new(rounded, format!("{} {}", format_number(rounded), unit))
                }
            }
            RoundingRule::Cholesterol => {
                if value < 2.0 {
                    zero()
                } else if value <= 5.0 {
                    RoundedAmount::new(value, format!("Less than 5 {}", unit))
                } else {
                    let rounded = round_to(value, 5.0);
                    RoundedAmount::new(rounded, format!("{:.0} {}", rounded, unit))
                }
            }
            RoundingRule::Sodium => {
                if value < 5.0 {
                    zero()
                } else {
                    let rounded = if value <= 140.0 { round_to(value, 5.0) } else { round_to(value, 10.0) };
                    RoundedAmount::new(rounded, format!("{:.0} {}", rounded, unit))
                }
            }
            RoundingRule::Carbohydrate => {
                if value < 0.5 {
                    zero()
                } else if value < 1.0 {
                    RoundedAmount::new(value, format!("Less than 1 {}", unit))
                } else {
                    let rounded = value.round();
                    RoundedAmount::new(rounded, format!("{:.0} {}", rounded, unit))
                }
            }
            RoundingRule::Micronutrient => {
                if value < 10.0 {
                    let rounded = (value * 10.0).round() / 10.0;
                    if rounded == 0.0 {
                        zero()
                    } else {
                        RoundedAmount::new(rounded, format!("{:.1} {}", rounded, unit))
                    }
                } else {
                    let rounded = value.round();
                    RoundedAmount::new(rounded, format!("{:.0} {}", rounded, unit))
                }
            }
        }
    }
}

/// Round one nutrient amount for the label
pub fn round_nutrient(nutrient: Nutrient, value: f64) -> RoundedAmount {
    RoundingRule::for_nutrient(nutrient).apply(value, nutrient.unit().symbol())
}

pub fn round_calories(value: f64) -> String {
    round_nutrient(Nutrient::Calories, value).display
}

pub fn round_fat(value: f64) -> String {
    round_nutrient(Nutrient::TotalFat, value).display
}

pub fn round_saturated_fat(value: f64) -> String {
    round_nutrient(Nutrient::SaturatedFat, value).display
}

pub fn round_cholesterol(value: f64) -> String {
    round_nutrient(Nutrient::Cholesterol, value).display
}

pub fn round_sodium(value: f64) -> String {
    round_nutrient(Nutrient::Sodium, value).display
}

pub fn round_carbohydrate(value: f64) -> String {
    round_nutrient(Nutrient::TotalCarbohydrate, value).display
}

/// Percent daily value for a raw amount, or `None` when the nutrient has no DV.
///
/// Amounts that display as zero always show "0%".
pub fn percent_daily_value(nutrient: Nutrient, value: f64) -> Option<String> {
    let daily_value = nutrient.daily_value()?;
    if round_nutrient(nutrient, value).value == 0.0 {
        return Some("0%".to_string());
    }

    let percent = value.max(0.0) / daily_value * 100.0;
    let rounded = if !nutrient.is_micronutrient() {
        percent.round()
    } else if percent < 2.0 {
        0.0
    } else if percent <= 10.0 {
        round_to(percent, 2.0)
    } else if percent <= 50.0 {
        round_to(percent, 5.0)
    } else {
        round_to(percent, 10.0)
    };
    Some(format!("{:.0}%", rounded))
}

/// One line of a nutrition label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRow {
    pub nutrient: Nutrient,
    pub name: String,
    /// Unrounded amount per serving
    pub amount: f64,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_daily_value: Option<String>,
}

/// Rounded label rows in label order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionLabel {
    pub rows: Vec<LabelRow>,
}

impl NutritionLabel {
    /// Build the label from a per-serving profile
    pub fn from_profile(per_serving: &NutrientProfile) -> Self {
        let rows = per_serving
            .iter()
            .map(|(nutrient, amount)| LabelRow {
                nutrient,
                name: nutrient.display_name().to_string(),
                amount,
                display: round_nutrient(nutrient, amount).display,
                percent_daily_value: percent_daily_value(nutrient, amount),
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, nutrient: Nutrient) -> Option<&LabelRow> {
        self.rows.iter().find(|row| row.nutrient == nutrient)
    }

    /// Plain-text rendering, one nutrient per line
    pub fn render_text(&self, serving_size_g: Option<f64>, servings_per_container: Option<f64>) -> String {
        let mut out = String::from("Nutrition Facts\n");
        if let Some(servings) = servings_per_container {
            out.push_str(&format!("{} servings per container\n", format_number(servings)));
        }
        if let Some(grams) = serving_size_g {
            out.push_str(&format!("Serving size {} g\n", format_number(grams)));
        }
        for row in &self.rows {
            let line = match (&row.percent_daily_value, row.nutrient) {
                (_, Nutrient::Calories) => format!("Calories {}", row.display),
                (Some(pct), _) => format!("{} {} {}", row.name, row.display, pct),
                (None, _) => format!("{} {}", row.name, row.display),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sodium_rounding() {
        assert_eq!(round_sodium(3.0), "0 mg");
        assert_eq!(round_sodium(100.0), "100 mg");
        assert_eq!(round_sodium(102.0), "100 mg");
        assert_eq!(round_sodium(138.0), "140 mg");
        assert_eq!(round_sodium(250.0), "250 mg");
        assert_eq!(round_sodium(254.0), "250 mg");
    }

    #[test]
    fn test_calorie_rounding() {
        assert_eq!(round_calories(4.9), "0");
        assert_eq!(round_calories(47.0), "45");
        assert_eq!(round_calories(50.0), "50");
        assert_eq!(round_calories(134.0), "130");
        assert_eq!(round_calories(136.0), "140");
    }

    #[test]
    fn test_fat_rounding() {
        assert_eq!(round_fat(0.4), "0 g");
        assert_eq!(round_fat(2.3), "2.5 g");
        assert_eq!(round_fat(3.0), "3 g");
        assert_eq!(round_fat(7.6), "8 g");

        assert_eq!(round_saturated_fat(0.3), "0 g");
        assert_eq!(round_saturated_fat(0.7), "Less than 1 g");
        assert_eq!(round_saturated_fat(1.2), "1 g");
        assert_eq!(round_saturated_fat(1.3), "1.5 g");
    }

    #[test]
    fn test_cholesterol_and_carbohydrate() {
        assert_eq!(round_cholesterol(1.0), "0 mg");
        assert_eq!(round_cholesterol(4.0), "Less than 5 mg");
        assert_eq!(round_cholesterol(23.0), "25 mg");

        assert_eq!(round_carbohydrate(0.2), "0 g");
        assert_eq!(round_carbohydrate(0.8), "Less than 1 g");
        assert_eq!(round_carbohydrate(12.4), "12 g");
    }

    #[test]
    fn test_micronutrients() {
        assert_eq!(round_nutrient(Nutrient::Iron, 2.34).display, "2.3 mg");
        assert_eq!(round_nutrient(Nutrient::Calcium, 126.4).display, "126 mg");
        assert_eq!(round_nutrient(Nutrient::VitaminD, 0.01).display, "0 mcg");
    }

    #[test]
    fn test_percent_daily_value() {
        assert_eq!(percent_daily_value(Nutrient::TotalFat, 7.8).as_deref(), Some("10%"));
        assert_eq!(percent_daily_value(Nutrient::Sodium, 3.0).as_deref(), Some("0%"));
        assert_eq!(percent_daily_value(Nutrient::Sodium, 460.0).as_deref(), Some("20%"));
        assert_eq!(percent_daily_value(Nutrient::Calories, 200.0), None);
        assert_eq!(percent_daily_value(Nutrient::TotalSugars, 12.0), None);

        // vitamins and minerals use stepped rounding
        assert_eq!(percent_daily_value(Nutrient::Iron, 0.2).as_deref(), Some("0%"));
        assert_eq!(percent_daily_value(Nutrient::Iron, 1.1).as_deref(), Some("6%"));
        assert_eq!(percent_daily_value(Nutrient::Calcium, 390.0).as_deref(), Some("30%"));
        assert_eq!(percent_daily_value(Nutrient::VitaminC, 72.0).as_deref(), Some("80%"));
    }

    #[test]
    fn test_label_rows_follow_label_order() {
        let per_serving = NutrientProfile {
            calories: 230.0,
            total_fat: 8.0,
            sodium: 160.0,
            ..Default::default()
        };
        let label = NutritionLabel::from_profile(&per_serving);
        assert_eq!(label.rows.len(), 29);
        assert_eq!(label.rows[0].nutrient, Nutrient::Calories);
        assert_eq!(label.row(Nutrient::Sodium).unwrap().display, "160 mg");
        assert_eq!(label.row(Nutrient::Sodium).unwrap().percent_daily_value.as_deref(), Some("7%"));

        let text = label.render_text(Some(55.0), Some(8.0));
        assert!(text.starts_with("Nutrition Facts\n8 servings per container\nServing size 55 g\nCalories 230\n"));
        assert!(text.contains("Total Fat 8 g 10%\n"));
    }
}
