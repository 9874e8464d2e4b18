//! External match scorer
//!
//! Ranks food database candidates for a query with an ordered table of
//! scoring rules. Every rule adds or subtracts points; the highest total wins
//! and ties keep database order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DataTypeTier, FoodCandidate};

/// Points per query word found in the description
pub const QUERY_TERM_POINTS: i32 = 25;
/// Points per generic term found in the description
pub const GENERIC_TERM_POINTS: i32 = 30;
pub const CANONICAL_PRIMARY_POINTS: i32 = 300;
pub const CANONICAL_SECONDARY_POINTS: i32 = 100;
pub const SPECIALTY_PENALTY: i32 = -60;
pub const CATEGORY_MISMATCH_PENALTY: i32 = -70;
pub const SHORT_DESCRIPTION_CHARS: usize = 30;
pub const LONG_DESCRIPTION_CHARS: usize = 60;

/// Terms that mark the plain, everyday version of a food
pub const GENERIC_TERMS: &[&str] = &["enriched", "all purpose", "standard", "generic", "plain", "regular"];

/// Terms that mark a specialty variant the query has to ask for explicitly
pub const SPECIALTY_TERMS: &[&str] = &[
    "almond", "coconut", "cassava", "tapioca", "oat", "rice", "chickpea", "buckwheat", "spelt", "rye",
    "gluten free", "organic", "whole grain", "whole wheat", "00", "tipo", "dried", "powder", "dehydrated",
    "self rising", "semolina", "durum", "sorghum", "millet", "quinoa", "teff", "corn", "potato", "soy",
    "arrowroot", "amaranth", "sprouted", "unbleached", "freeze dried", "instant",
];

/// Prepared-food categories that rarely answer a single-ingredient query
pub const MISMATCH_CATEGORIES: &[&str] = &[
    "sauce", "soup", "dressing", "bread", "cake", "cookie", "cookies", "muffin", "pie", "pizza", "sandwich",
    "salad", "casserole", "snack", "cereal", "candy", "beverage", "drink", "smoothie", "pudding", "gravy",
];

/// Bare category queries and the description terms of their canonical record
pub struct CanonicalCategory {
    pub category: &'static str,
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
}

pub const CANONICAL_CATEGORIES: &[CanonicalCategory] = &[
    CanonicalCategory { category: "flour", primary: &["all purpose"], secondary: &["wheat", "white", "enriched"] },
    CanonicalCategory { category: "sugar", primary: &["granulated"], secondary: &["white", "sugars"] },
    CanonicalCategory { category: "salt", primary: &["table"], secondary: &["iodized"] },
    CanonicalCategory { category: "milk", primary: &["whole"], secondary: &["fluid", "milkfat"] },
    CanonicalCategory { category: "butter", primary: &["salted"], secondary: &["stick"] },
    CanonicalCategory { category: "rice", primary: &["white"], secondary: &["long grain", "enriched"] },
    CanonicalCategory { category: "egg", primary: &["whole"], secondary: &["raw", "fresh"] },
];

/// Lowercase, punctuation and hyphens blanked, padded with spaces for whole-word search
fn padded(text: &str) -> String {
    let words: Vec<String> = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    format!(" {} ", words.join(" "))
}

fn has_term(padded_text: &str, term: &str) -> bool {
    let needle = padded(term);
    !needle.trim().is_empty() && padded_text.contains(&needle)
}

/// A word, its singular or its plural appears in the description
fn has_word_form(padded_text: &str, word: &str) -> bool {
    let singular = word
        .strip_suffix("es")
        .filter(|s| s.ends_with('o') || s.ends_with("ch") || s.ends_with("sh"))
        .or_else(|| word.strip_suffix('s'))
        .filter(|s| s.len() > 1);

    has_term(padded_text, word)
        || singular.is_some_and(|s| has_term(padded_text, s))
        || has_term(padded_text, &format!("{}s", word))
        || has_term(padded_text, &format!("{}es", word))
}

/// Everything a rule may look at for one candidate
pub struct ScoringContext<'a> {
    /// Padded, normalized query
    pub query: &'a str,
    pub query_words: &'a [String],
    /// Padded, normalized description
    pub description: String,
    pub description_len: usize,
    pub data_type: DataTypeTier,
}

/// A named scoring rule
pub struct ScoringRule {
    pub name: &'static str,
    pub evaluate: fn(&ScoringContext) -> i32,
}

fn query_terms(ctx: &ScoringContext) -> i32 {
    ctx.query_words
        .iter()
        .filter(|w| has_word_form(&ctx.description, w))
        .count() as i32
        * QUERY_TERM_POINTS
}

fn generic_terms(ctx: &ScoringContext) -> i32 {
    GENERIC_TERMS.iter().filter(|t| has_term(&ctx.description, t)).count() as i32 * GENERIC_TERM_POINTS
}

fn canonical_category(ctx: &ScoringContext) -> i32 {
    let query = ctx.query.trim();
    let Some(category) = CANONICAL_CATEGORIES
        .iter()
        .find(|c| query == c.category || query.strip_suffix('s') == Some(c.category))
    else {
        return 0;
    };

    let primary = category.primary.iter().filter(|t| has_term(&ctx.description, t)).count() as i32;
    let secondary = category.secondary.iter().filter(|t| has_term(&ctx.description, t)).count() as i32;
    primary * CANONICAL_PRIMARY_POINTS + secondary * CANONICAL_SECONDARY_POINTS
}

fn specialty_penalty(ctx: &ScoringContext) -> i32 {
    SPECIALTY_TERMS
        .iter()
        .filter(|t| has_term(&ctx.description, t) && !has_term(ctx.query, t))
        .count() as i32
        * SPECIALTY_PENALTY
}

fn category_mismatch(ctx: &ScoringContext) -> i32 {
    if MISMATCH_CATEGORIES
        .iter()
        .any(|t| has_term(&ctx.description, t) && !has_term(ctx.query, t))
    {
        CATEGORY_MISMATCH_PENALTY
    } else {
        0
    }
}

fn data_tier(ctx: &ScoringContext) -> i32 {
    match ctx.data_type {
        DataTypeTier::Foundation => 150,
        DataTypeTier::SrLegacy => 120,
        DataTypeTier::Branded => -80,
        _ => 0,
    }
}

fn description_length(ctx: &ScoringContext) -> i32 {
    if ctx.description_len < SHORT_DESCRIPTION_CHARS {
        20
    } else if ctx.description_len > LONG_DESCRIPTION_CHARS {
        -20
    } else {
        0
    }
}

/// Rules in evaluation order
pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule { name: "query_terms", evaluate: query_terms },
    ScoringRule { name: "generic_terms", evaluate: generic_terms },
    ScoringRule { name: "canonical_category", evaluate: canonical_category },
    ScoringRule { name: "specialty_penalty", evaluate: specialty_penalty },
    ScoringRule { name: "category_mismatch", evaluate: category_mismatch },
    ScoringRule { name: "data_tier", evaluate: data_tier },
    ScoringRule { name: "description_length", evaluate: description_length },
];

/// Points one rule gave one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleScore {
    pub rule: String,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: FoodCandidate,
    pub score: i32,
    /// Non-zero rule contributions
    pub breakdown: Vec<RuleScore>,
}

/// Ranked candidates with the winner and a readable audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub best: Option<ScoredCandidate>,
    pub ranked: Vec<ScoredCandidate>,
    pub trail: Vec<String>,
}

fn score_one(query: &str, query_words: &[String], candidate: &FoodCandidate) -> ScoredCandidate {
    let ctx = ScoringContext {
        query,
        query_words,
        description: padded(&candidate.description),
        description_len: candidate.description.trim().chars().count(),
        data_type: candidate.data_type,
    };

    let mut score = 0;
    let mut breakdown = Vec::new();
    for rule in SCORING_RULES {
        let points = (rule.evaluate)(&ctx);
        if points != 0 {
            breakdown.push(RuleScore { rule: rule.name.to_string(), points });
        }
        score += points;
    }

    ScoredCandidate { candidate: candidate.clone(), score, breakdown }
}

/// Score and rank candidates for a query
pub fn score_candidates(query: &str, candidates: &[FoodCandidate]) -> MatchDecision {
    let normalized = padded(query);
    let query_words: Vec<String> = normalized
        .split_whitespace()
        .filter(|w| w.len() > 1)
        .map(str::to_string)
        .collect();

    let mut ranked: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|c| score_one(&normalized, &query_words, c))
        .collect();
    // stable: equal scores keep database order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let trail = ranked
        .iter()
        .map(|s| {
            let parts: Vec<String> = s.breakdown.iter().map(|r| format!("{} {:+}", r.rule, r.points)).collect();
            format!("{} [{}] = {} ({})", s.candidate.description, s.candidate.data_type.as_str(), s.score, parts.join(", "))
        })
        .collect();

    let best = ranked.first().cloned();
    if let Some(best) = &best {
        debug!(query, winner = %best.candidate.description, score = best.score, "Selected database match");
    }

    MatchDecision { best, ranked, trail }
}
