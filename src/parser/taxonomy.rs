//! Ingredient taxonomy
//!
//! Ingredient nouns whose weight and nutrition vary enough by size or variety
//! that the caller must pick one before matching.

use crate::nutrition::units::normalize_unit;

/// A high-variation ingredient and its candidate varieties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxonomyEntry {
    /// Canonical unit name the entry is keyed by
    pub base: &'static str,
    pub varieties: &'static [&'static str],
}

pub static HIGH_VARIATION: &[TaxonomyEntry] = &[
    TaxonomyEntry {
        base: "tomato",
        varieties: &["cherry", "grape", "roma", "plum", "beefsteak", "heirloom", "small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "onion",
        varieties: &["yellow", "white", "red", "sweet", "vidalia", "small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "potato",
        varieties: &["russet", "yukon gold", "red", "fingerling", "new", "small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "sweet potato",
        varieties: &["small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "pepper",
        varieties: &["bell", "red bell", "green bell", "jalapeno", "serrano", "poblano", "habanero"],
    },
    TaxonomyEntry {
        base: "bell pepper",
        varieties: &["red", "green", "yellow", "orange", "small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "apple",
        varieties: &["gala", "fuji", "granny smith", "honeycrisp", "red delicious", "small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "egg",
        varieties: &["medium", "large", "extra-large", "jumbo"],
    },
    TaxonomyEntry {
        base: "carrot",
        varieties: &["baby", "small", "medium", "large"],
    },
    TaxonomyEntry {
        base: "squash",
        varieties: &["butternut", "acorn", "spaghetti", "yellow", "summer"],
    },
];

/// Find the taxonomy entry for a parsed unit ("tomatoes" → tomato)
pub fn high_variation_entry(unit: &str) -> Option<&'static TaxonomyEntry> {
    let canonical = normalize_unit(unit);
    HIGH_VARIATION.iter().find(|entry| entry.base == canonical)
}

/// True when any of the entry's varieties already appears in the name as whole words
pub fn names_a_variety(entry: &TaxonomyEntry, ingredient_name: &str) -> bool {
    let padded = format!(" {} ", ingredient_name.to_lowercase().replace([',', '(', ')'], " "));
    entry
        .varieties
        .iter()
        .any(|variety| padded.contains(&format!(" {} ", variety)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_plural_unit() {
        let entry = high_variation_entry("tomatoes").unwrap();
        assert_eq!(entry.base, "tomato");
        assert!(high_variation_entry("cup").is_none());
        assert!(high_variation_entry("lemon").is_none());
    }

    #[test]
    fn test_names_a_variety() {
        let entry = high_variation_entry("tomato").unwrap();
        assert!(names_a_variety(entry, "roma tomatoes"));
        assert!(names_a_variety(entry, "Large tomato, diced"));
        assert!(!names_a_variety(entry, "tomato"));
        // "grape" must match as a word, not inside "grapefruit"
        assert!(!names_a_variety(entry, "grapefruit tomato"));
    }
}
