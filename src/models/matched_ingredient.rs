//! Matched ingredient model
//!
//! A parsed ingredient paired with the database record chosen for it.

use serde::{Deserialize, Serialize};

use super::{DatabaseFood, ParsedIngredientLine};

/// How the database record was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Top candidate of the match scorer
    Automatic,
    /// Chosen explicitly by the caller
    Override,
    /// Explicitly excluded; contributes no nutrition
    Skipped,
}

/// An ingredient line with its resolved food (or `None` when skipped)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedIngredient {
    /// Key for custom unit conversions
    pub ingredient_id: String,
    pub line: ParsedIngredientLine,
    food: Option<DatabaseFood>,
    source: MatchSource,
}

impl MatchedIngredient {
    /// Pair a line with the scorer's pick
    pub fn automatic(ingredient_id: &str, line: ParsedIngredientLine, food: DatabaseFood) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            line,
            food: Some(food),
            source: MatchSource::Automatic,
        }
    }

    /// Pair a line with a caller-chosen food
    pub fn overridden(ingredient_id: &str, line: ParsedIngredientLine, food: DatabaseFood) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            line,
            food: Some(food),
            source: MatchSource::Override,
        }
    }

    /// A line that was explicitly skipped
    pub fn skipped(ingredient_id: &str, line: ParsedIngredientLine) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            line,
            food: None,
            source: MatchSource::Skipped,
        }
    }

    pub fn food(&self) -> Option<&DatabaseFood> {
        self.food.as_ref()
    }

    pub fn source(&self) -> MatchSource {
        self.source
    }

    /// Store a new automatic match.
    ///
    /// Returns false and leaves the ingredient untouched when the caller already
    /// overrode or skipped it.
    pub fn accept_automatic(&mut self, food: DatabaseFood) -> bool {
        if self.source != MatchSource::Automatic {
            return false;
        }
        self.food = Some(food);
        true
    }

    /// Replace the match with a caller-chosen food
    pub fn override_with(&mut self, food: DatabaseFood) {
        self.food = Some(food);
        self.source = MatchSource::Override;
    }

    /// Exclude the ingredient from nutrition
    pub fn skip(&mut self) {
        self.food = None;
        self.source = MatchSource::Skipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataTypeTier, NutrientProfile};

    fn food(id: &str) -> DatabaseFood {
        DatabaseFood {
            id: id.to_string(),
            description: format!("food {}", id),
            data_type: DataTypeTier::Foundation,
            nutrients_per_100g: NutrientProfile::zero(),
            portions: vec![],
        }
    }

    #[test]
    fn test_automatic_never_replaces_override() {
        let line = ParsedIngredientLine::new(1.0, "cup", "flour", "1 cup flour");
        let mut matched = MatchedIngredient::automatic("flour", line, food("1"));

        matched.override_with(food("2"));
        assert!(!matched.accept_automatic(food("3")));
        assert_eq!(matched.food().unwrap().id, "2");
        assert_eq!(matched.source(), MatchSource::Override);
    }

    #[test]
    fn test_skip_clears_food() {
        let line = ParsedIngredientLine::new(1.0, "pinch", "salt", "1 pinch salt");
        let mut matched = MatchedIngredient::automatic("salt", line, food("1"));
        matched.skip();
        assert!(matched.food().is_none());
        assert!(!matched.accept_automatic(food("4")));
    }
}
