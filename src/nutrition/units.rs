//! Unit table and conversion constants
//!
//! Static registry of unit names and aliases with their gram equivalence and
//! category. Volume units are converted at the density of water.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Category of a measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Weight/mass units (g, oz, lb, kg)
    Weight,
    /// Volume units (ml, tbsp, cup, etc.)
    Volume,
    /// Count/discrete units (item, slice, can) and ingredient nouns (tomato, egg)
    Count,
    /// Small or vague amounts (pinch, dash, handful)
    Other,
}

/// One row of the unit table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    /// Canonical name used after parsing
    pub canonical: &'static str,
    /// Lowercase spellings recognized in recipe text (canonical included)
    pub aliases: &'static [&'static str],
    pub category: UnitCategory,
    /// Grams per one unit, when the table knows it
    pub grams: Option<f64>,
    /// True for nouns like "tomato" that are both the unit and the ingredient
    pub ingredient_noun: bool,
}

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

/// Grams per milliliter of water
pub const WATER_G_PER_ML: f64 = 1.0;

// ============================================================================
// Unit Table
// ============================================================================

const fn measure(
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: UnitCategory,
    grams: Option<f64>,
) -> UnitDef {
    UnitDef { canonical, aliases, category, grams, ingredient_noun: false }
}

const fn noun(canonical: &'static str, aliases: &'static [&'static str], grams: f64) -> UnitDef {
    UnitDef {
        canonical,
        aliases,
        category: UnitCategory::Count,
        grams: Some(grams),
        ingredient_noun: true,
    }
}

use UnitCategory::{Count, Other, Volume, Weight};

pub static UNIT_TABLE: &[UnitDef] = &[
    // Weight
    measure("g", &["g", "gr", "gm", "gram", "grams", "gramme", "grammes"], Weight, Some(1.0)),
    measure("mg", &["mg", "milligram", "milligrams"], Weight, Some(G_PER_MG)),
    measure("kg", &["kg", "kilo", "kilos", "kilogram", "kilograms"], Weight, Some(G_PER_KG)),
    measure("oz", &["oz", "ounce", "ounces"], Weight, Some(G_PER_OZ)),
    measure("lb", &["lb", "lbs", "pound", "pounds"], Weight, Some(G_PER_LB)),
    // Volume (water density)
    measure("ml", &["ml", "milliliter", "milliliters", "millilitre", "millilitres"], Volume, Some(1.0)),
    measure("cl", &["cl", "centiliter", "centiliters"], Volume, Some(10.0)),
    measure("dl", &["dl", "deciliter", "deciliters"], Volume, Some(100.0)),
    measure("l", &["l", "liter", "liters", "litre", "litres"], Volume, Some(ML_PER_LITER)),
    measure("tsp", &["tsp", "tsps", "teaspoon", "teaspoons"], Volume, Some(ML_PER_TSP)),
    measure("tbsp", &["tbsp", "tbsps", "tbs", "tbl", "tablespoon", "tablespoons"], Volume, Some(ML_PER_TBSP)),
    measure("fl oz", &["fl oz", "fl. oz", "floz", "fluid ounce", "fluid ounces"], Volume, Some(ML_PER_FL_OZ)),
    measure("cup", &["cup", "cups", "c"], Volume, Some(ML_PER_CUP)),
    measure("pint", &["pint", "pints", "pt"], Volume, Some(ML_PER_PINT)),
    measure("quart", &["quart", "quarts", "qt"], Volume, Some(ML_PER_QUART)),
    measure("gallon", &["gallon", "gallons", "gal"], Volume, Some(ML_PER_GALLON)),
    // Count
    measure("item", &["item", "items", "each", "ea"], Count, None),
    measure("piece", &["piece", "pieces", "pc", "pcs"], Count, None),
    measure("slice", &["slice", "slices"], Count, None),
    measure("clove", &["clove", "cloves"], Count, Some(3.0)),
    measure("can", &["can", "cans", "tin", "tins"], Count, None),
    measure("package", &["package", "packages", "pkg", "packet", "packets"], Count, None),
    measure("jar", &["jar", "jars"], Count, None),
    measure("bottle", &["bottle", "bottles"], Count, None),
    measure("box", &["box", "boxes"], Count, None),
    measure("bag", &["bag", "bags"], Count, None),
    measure("bunch", &["bunch", "bunches"], Count, None),
    measure("sprig", &["sprig", "sprigs"], Count, None),
    measure("stalk", &["stalk", "stalks"], Count, None),
    measure("head", &["head", "heads"], Count, None),
    measure("stick", &["stick", "sticks"], Count, None),
    measure("dozen", &["dozen", "doz"], Count, None),
    // Small or vague amounts
    measure("pinch", &["pinch", "pinches"], Other, None),
    measure("dash", &["dash", "dashes"], Other, None),
    measure("smidgen", &["smidgen", "smidgens"], Other, None),
    measure("drop", &["drop", "drops"], Other, None),
    measure("handful", &["handful", "handfuls"], Other, None),
    measure("serving", &["serving", "servings"], Other, None),
    // Ingredient nouns (medium item weights)
    noun("tomato", &["tomato", "tomatoes"], 123.0),
    noun("onion", &["onion", "onions"], 110.0),
    noun("potato", &["potato", "potatoes"], 213.0),
    noun("sweet potato", &["sweet potato", "sweet potatoes"], 130.0),
    noun("bell pepper", &["bell pepper", "bell peppers"], 119.0),
    noun("pepper", &["pepper", "peppers"], 119.0),
    noun("apple", &["apple", "apples"], 182.0),
    noun("banana", &["banana", "bananas"], 118.0),
    noun("carrot", &["carrot", "carrots"], 61.0),
    noun("egg", &["egg", "eggs"], 50.0),
    noun("lemon", &["lemon", "lemons"], 58.0),
    noun("lime", &["lime", "limes"], 67.0),
    noun("orange", &["orange", "oranges"], 131.0),
    noun("avocado", &["avocado", "avocados", "avocadoes"], 201.0),
    noun("cucumber", &["cucumber", "cucumbers"], 301.0),
    noun("zucchini", &["zucchini", "zucchinis"], 196.0),
    noun("squash", &["squash", "squashes"], 196.0),
    noun("jalapeno", &["jalapeno", "jalapenos", "jalapeño", "jalapeños"], 14.0),
    noun("shallot", &["shallot", "shallots"], 25.0),
    noun("peach", &["peach", "peaches"], 150.0),
    noun("pear", &["pear", "pears"], 178.0),
    noun("mushroom", &["mushroom", "mushrooms"], 18.0),
];

/// Alias → table row
static UNIT_INDEX: LazyLock<HashMap<&'static str, &'static UnitDef>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for def in UNIT_TABLE {
        for alias in def.aliases {
            map.entry(*alias).or_insert(def);
        }
    }
    map
});

/// All aliases sorted longest first, so "fluid ounces" matches before "fl"
pub static ALIASES_LONGEST_FIRST: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut aliases: Vec<&'static str> = UNIT_INDEX.keys().copied().collect();
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    aliases
});

// ============================================================================
// Unit Recognition
// ============================================================================

/// Lowercase, trim and drop a trailing period ("Tbsp." → "tbsp")
fn clean(unit: &str) -> String {
    let lower = unit.trim().to_lowercase();
    lower.trim_end_matches('.').trim().to_string()
}

/// Find the table row for a unit spelling
pub fn lookup_unit(unit: &str) -> Option<&'static UnitDef> {
    UNIT_INDEX.get(clean(unit).as_str()).copied()
}

/// Canonical unit name, or the cleaned input when the table does not know it
pub fn normalize_unit(unit: &str) -> String {
    match lookup_unit(unit) {
        Some(def) => def.canonical.to_string(),
        None => clean(unit),
    }
}

/// Grams per one unit from the static table
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    lookup_unit(unit).and_then(|def| def.grams)
}

/// Milliliters per one volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    lookup_unit(unit)
        .filter(|def| def.category == UnitCategory::Volume)
        .and_then(|def| def.grams)
        .map(|g| g / WATER_G_PER_ML)
}

/// Determine the category of a unit string; unknown units are `Other`
pub fn categorize_unit(unit: &str) -> UnitCategory {
    lookup_unit(unit).map(|def| def.category).unwrap_or(UnitCategory::Other)
}

/// True for measurement keywords (cup, g, pinch), false for ingredient nouns
pub fn is_measurement_unit(word: &str) -> bool {
    lookup_unit(word).map(|def| !def.ingredient_noun).unwrap_or(false)
}

/// True when the unit already denotes grams
pub fn is_gram_unit(unit: &str) -> bool {
    matches!(clean(unit).as_str(), "g" | "gram" | "grams")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_weight_units() {
        assert_eq!(categorize_unit("g"), UnitCategory::Weight);
        assert_eq!(categorize_unit("gram"), UnitCategory::Weight);
        assert_eq!(categorize_unit("oz"), UnitCategory::Weight);
        assert_eq!(categorize_unit("lb"), UnitCategory::Weight);
        assert_eq!(categorize_unit("kg"), UnitCategory::Weight);
    }

    #[test]
    fn test_categorize_volume_units() {
        assert_eq!(categorize_unit("ml"), UnitCategory::Volume);
        assert_eq!(categorize_unit("Tbsp."), UnitCategory::Volume);
        assert_eq!(categorize_unit("cups"), UnitCategory::Volume);
        assert_eq!(categorize_unit("fl oz"), UnitCategory::Volume);
    }

    #[test]
    fn test_categorize_count_and_other_units() {
        assert_eq!(categorize_unit("each"), UnitCategory::Count);
        assert_eq!(categorize_unit("tomatoes"), UnitCategory::Count);
        assert_eq!(categorize_unit("pinch"), UnitCategory::Other);
        assert_eq!(categorize_unit("scoop"), UnitCategory::Other);
    }

    #[test]
    fn test_grams_per_unit() {
        assert_eq!(grams_per_unit("g"), Some(1.0));
        assert_eq!(grams_per_unit("ounces"), Some(G_PER_OZ));
        assert_eq!(grams_per_unit("lb"), Some(G_PER_LB));
        assert_eq!(grams_per_unit("cup"), Some(ML_PER_CUP));
        assert_eq!(grams_per_unit("tomato"), Some(123.0));
        assert_eq!(grams_per_unit("item"), None);
        assert_eq!(grams_per_unit("pinch"), None);
        assert_eq!(grams_per_unit("scoop"), None);
    }

    #[test]
    fn test_ml_per_unit() {
        assert_eq!(ml_per_unit("ml"), Some(1.0));
        assert_eq!(ml_per_unit("tbsp"), Some(ML_PER_TBSP));
        assert_eq!(ml_per_unit("g"), None);
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("Tablespoons"), "tbsp");
        assert_eq!(normalize_unit("cloves"), "clove");
        assert_eq!(normalize_unit("Scoop."), "scoop");
    }

    #[test]
    fn test_measurement_vs_ingredient_noun() {
        assert!(is_measurement_unit("cup"));
        assert!(is_measurement_unit("pinch"));
        assert!(!is_measurement_unit("tomato"));
        assert!(!is_measurement_unit("flour"));
    }

    #[test]
    fn test_aliases_longest_first() {
        let aliases = &*ALIASES_LONGEST_FIRST;
        let pos_long = aliases.iter().position(|a| *a == "fluid ounces").unwrap();
        let pos_short = aliases.iter().position(|a| *a == "oz").unwrap();
        assert!(pos_long < pos_short);
    }
}
