//! Concurrent ingredient resolution
//!
//! One lookup task per ingredient: search the database, score the hits, and
//! fetch the full record of the winner when the search hit carries no portions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::client::FoodDatabase;
use super::scorer::{score_candidates, MatchDecision};
use crate::error::FoodDatabaseError;
use crate::models::{DatabaseFood, FoodCandidate, MatchedIngredient, ParsedIngredientLine};
use crate::parser::search_text;

/// An ingredient to look up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientQuery {
    pub ingredient_id: String,
    pub line: ParsedIngredientLine,
}

/// Lookup outcome for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIngredient {
    pub query: String,
    pub decision: MatchDecision,
    /// Skipped when the search returned nothing
    pub matched: MatchedIngredient,
}

/// Look up one ingredient
pub async fn resolve_ingredient(
    database: &dyn FoodDatabase,
    ingredient: IngredientQuery,
    limit: usize,
) -> Result<ResolvedIngredient, FoodDatabaseError> {
    let query = search_text(&ingredient.line.ingredient_name);
    let page = database.search(&query, limit).await?;

    let candidates: Vec<FoodCandidate> = page.results.iter().map(FoodCandidate::from).collect();
    let decision = score_candidates(&query, &candidates);

    let best_food: Option<DatabaseFood> = decision
        .best
        .as_ref()
        .and_then(|best| page.results.iter().find(|f| f.id == best.candidate.id))
        .cloned();

    let matched = match best_food {
        Some(food) => {
            let food = if food.portions.is_empty() {
                match database.get_by_id(&food.id).await {
                    Ok(full) => full,
                    Err(e) => {
                        warn!(id = %food.id, error = %e, "Could not fetch full record; using search hit");
                        food
                    }
                }
            } else {
                food
            };
            MatchedIngredient::automatic(&ingredient.ingredient_id, ingredient.line, food)
        }
        None => {
            debug!(query = %query, "No database candidates");
            MatchedIngredient::skipped(&ingredient.ingredient_id, ingredient.line)
        }
    };

    Ok(ResolvedIngredient { query, decision, matched })
}

/// Resolve every ingredient concurrently; output order follows input order
pub async fn resolve_ingredients(
    database: Arc<dyn FoodDatabase>,
    ingredients: Vec<IngredientQuery>,
    limit: usize,
) -> Vec<Result<ResolvedIngredient, FoodDatabaseError>> {
    let count = ingredients.len();
    let mut tasks = JoinSet::new();
    for (index, ingredient) in ingredients.into_iter().enumerate() {
        let database = Arc::clone(&database);
        tasks.spawn(async move { (index, resolve_ingredient(database.as_ref(), ingredient, limit).await) });
    }

    let mut slots: Vec<Option<Result<ResolvedIngredient, FoodDatabaseError>>> = (0..count).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => warn!(error = %e, "Ingredient lookup task failed"),
        }
    }

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(FoodDatabaseError::Task("lookup did not complete".to_string()))))
        .collect()
}
