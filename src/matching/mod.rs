//! Food database matching
//!
//! Scoring of database candidates and the async lookup of ingredients.

pub mod client;
pub mod resolve;
pub mod scorer;

pub use client::{FdcClient, FoodDatabase, InMemoryFoodDatabase, SearchResponse};
pub use resolve::{resolve_ingredient, resolve_ingredients, IngredientQuery, ResolvedIngredient};
pub use scorer::{score_candidates, MatchDecision, RuleScore, ScoredCandidate, ScoringRule, SCORING_RULES};
