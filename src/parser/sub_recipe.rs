//! Sub-recipe detection
//!
//! Decides whether a trailing parenthetical is a nested ingredient list
//! (`1 cup salsa (2 tomato, 1 onion, 1 tbsp cilantro)`) or a description
//! (`1 chicken breast (boneless, skinless)`). Items are classified by an
//! ordered rule table; the first rule that answers wins.

use serde::Serialize;
use tracing::debug;

use crate::models::{ParseIssue, ParsedIngredientLine, SubRecipe};
use crate::nutrition::units::is_measurement_unit;
use crate::parser::ingredient_line::parse_ingredient_line;
use crate::parser::quantity::has_leading_quantity;
use crate::parser::vocabulary::{is_body_part, is_descriptor_word, is_food_noun, starts_with_informational_prefix};

/// Longest single word still treated as a descriptor
const SHORT_WORD_MAX_CHARS: usize = 12;

/// Why a line is not a sub-recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotSubRecipeReason {
    /// No parenthetical closing the line, or nothing before it
    NoTrailingGroup,
    /// Starts with "about", "optional", "such as", ...
    InformationalPrefix,
    /// A single amount or size phrase
    MeasurementPhrase,
    /// At least as many descriptors as ingredients
    DescriptorList,
    /// Several items but fewer than two look like ingredients
    TooFewIngredients,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SubRecipeDecision {
    NotSubRecipe { reason: NotSubRecipeReason },
    SubRecipe {
        /// Text before the group, e.g. "1 cup salsa"
        prefix: String,
        items: Vec<String>,
        nested_parentheses: bool,
    },
}

impl SubRecipeDecision {
    fn no(reason: NotSubRecipeReason) -> Self {
        SubRecipeDecision::NotSubRecipe { reason }
    }

    pub fn is_sub_recipe(&self) -> bool {
        matches!(self, SubRecipeDecision::SubRecipe { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Ingredient,
    Descriptor,
    Neither,
}

struct ItemRule {
    name: &'static str,
    classify: fn(&str, &[&str]) -> Option<ItemKind>,
}

fn has_digit(item: &str, _words: &[&str]) -> Option<ItemKind> {
    item.chars().any(|c| c.is_ascii_digit()).then_some(ItemKind::Ingredient)
}

fn has_unit_keyword(_item: &str, words: &[&str]) -> Option<ItemKind> {
    words.iter().any(|w| is_measurement_unit(w)).then_some(ItemKind::Ingredient)
}

fn plain_food_noun(_item: &str, words: &[&str]) -> Option<ItemKind> {
    let has_food = words.iter().any(|w| is_food_noun(w));
    let has_descriptor = words.iter().any(|w| is_descriptor_word(w));
    (has_food && !has_descriptor).then_some(ItemKind::Ingredient)
}

fn descriptor_vocabulary(_item: &str, words: &[&str]) -> Option<ItemKind> {
    words
        .iter()
        .all(|w| is_descriptor_word(w) || is_body_part(w))
        .then_some(ItemKind::Descriptor)
}

fn short_non_food_word(item: &str, words: &[&str]) -> Option<ItemKind> {
    (words.len() == 1 && item.chars().count() <= SHORT_WORD_MAX_CHARS && !is_food_noun(words[0]))
        .then_some(ItemKind::Descriptor)
}

/// Item classification, applied in order
const ITEM_RULES: &[ItemRule] = &[
    ItemRule { name: "has_digit", classify: has_digit },
    ItemRule { name: "has_unit_keyword", classify: has_unit_keyword },
    ItemRule { name: "plain_food_noun", classify: plain_food_noun },
    ItemRule { name: "descriptor_vocabulary", classify: descriptor_vocabulary },
    ItemRule { name: "short_non_food_word", classify: short_non_food_word },
];

fn classify_item(item: &str) -> ItemKind {
    let words: Vec<&str> = item.split_whitespace().collect();
    if words.is_empty() {
        return ItemKind::Neither;
    }
    for rule in ITEM_RULES {
        if let Some(kind) = (rule.classify)(item, &words) {
            debug!(item, rule = rule.name, ?kind, "Classified parenthetical item");
            return kind;
        }
    }
    ItemKind::Neither
}

/// Single item that only states an amount or size ("about 2 cups", "14 oz", "large")
fn is_measurement_phrase(item: &str) -> bool {
    let words: Vec<&str> = item.split_whitespace().collect();
    let numbers = words.iter().filter(|w| w.chars().any(|c| c.is_ascii_digit())).count();
    words.iter().any(|w| is_measurement_unit(w)) || numbers >= 2 || words.len() <= 2
}

/// Split a trailing `( … )` that closes the line: (prefix, inner)
fn split_trailing_group(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end();
    if !line.ends_with(')') {
        return None;
    }
    let mut depth = 0usize;
    for (idx, c) in line.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some((&line[..idx], &line[idx + 1..line.len() - 1]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not inside nested parentheses
fn split_top_level_commas(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Decide whether a line carries a sub-recipe
pub fn detect_sub_recipe(line: &str) -> SubRecipeDecision {
    let Some((prefix, inner)) = split_trailing_group(line) else {
        return SubRecipeDecision::no(NotSubRecipeReason::NoTrailingGroup);
    };
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return SubRecipeDecision::no(NotSubRecipeReason::NoTrailingGroup);
    }

    if starts_with_informational_prefix(inner) {
        return SubRecipeDecision::no(NotSubRecipeReason::InformationalPrefix);
    }

    let items = split_top_level_commas(inner);
    if items.is_empty() {
        return SubRecipeDecision::no(NotSubRecipeReason::NoTrailingGroup);
    }
    if items.len() == 1 && is_measurement_phrase(&items[0]) {
        return SubRecipeDecision::no(NotSubRecipeReason::MeasurementPhrase);
    }

    let kinds: Vec<ItemKind> = items.iter().map(|item| classify_item(item)).collect();
    let ingredients = kinds.iter().filter(|k| **k == ItemKind::Ingredient).count();
    let descriptors = kinds.iter().filter(|k| **k == ItemKind::Descriptor).count();

    if descriptors >= ingredients {
        return SubRecipeDecision::no(NotSubRecipeReason::DescriptorList);
    }
    if ingredients < 2 && items.len() >= 2 {
        return SubRecipeDecision::no(NotSubRecipeReason::TooFewIngredients);
    }

    SubRecipeDecision::SubRecipe {
        prefix: prefix.to_string(),
        nested_parentheses: inner.contains('('),
        items,
    }
}

/// An accepted sub-recipe and the warnings raised while building it
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSubRecipe {
    pub sub_recipe: SubRecipe,
    /// Header parsed from the prefix ("1 cup salsa")
    pub header: ParsedIngredientLine,
    pub warnings: Vec<ParseIssue>,
}

/// Parse an accepted sub-recipe.
///
/// Every item must start with an explicit quantity; otherwise the whole group
/// is rejected with [`ParseIssue::AmbiguousSubRecipeQuantity`].
pub fn build_sub_recipe(
    original_line: &str,
    prefix: &str,
    items: &[String],
    nested_parentheses: bool,
) -> Result<BuiltSubRecipe, ParseIssue> {
    let header = parse_ingredient_line(prefix)?;
    let name = header.ingredient_name.clone();

    let mut ingredients = Vec::with_capacity(items.len());
    for item in items {
        if !has_leading_quantity(item) {
            debug!(sub_recipe = %name, item = %item, "Sub-recipe rejected, item without quantity");
            return Err(ParseIssue::AmbiguousSubRecipeQuantity {
                sub_recipe: name,
                item: item.clone(),
            });
        }
        ingredients.push(parse_ingredient_line(item)?);
    }

    let mut warnings = Vec::new();
    if nested_parentheses {
        warnings.push(ParseIssue::NestedParentheses {
            sub_recipe: name.clone(),
            line: original_line.trim().to_string(),
        });
    }

    Ok(BuiltSubRecipe {
        sub_recipe: SubRecipe {
            name,
            ingredients,
            quantity_in_final_dish: header.quantity,
            unit_in_final_dish: header.unit.clone(),
        },
        header,
        warnings,
    })
}
