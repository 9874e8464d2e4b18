//! Food matching tools
//!
//! Database search with automatic ranking, and ranking of caller-supplied candidates.

use serde::Serialize;

use crate::matching::{score_candidates, FoodDatabase, MatchDecision};
use crate::models::{DatabaseFood, FoodCandidate};
use crate::parser::search_text;

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    /// Query actually sent to the database
    pub query: String,
    pub total_hits: u64,
    /// Best-ranked record with nutrients and portions
    pub best: Option<DatabaseFood>,
    pub decision: MatchDecision,
}

/// Response for rank_food_candidates
#[derive(Debug, Serialize)]
pub struct RankCandidatesResponse {
    pub query: String,
    pub decision: MatchDecision,
}

/// Rank candidates the caller already has
pub fn rank_food_candidates(query: &str, candidates: &[FoodCandidate]) -> Result<RankCandidatesResponse, String> {
    if query.trim().is_empty() {
        return Err("Query cannot be empty".to_string());
    }
    let query = search_text(query);
    Ok(RankCandidatesResponse {
        decision: score_candidates(&query, candidates),
        query,
    })
}

/// Search the food database for an ingredient and rank the hits
pub async fn search_foods(
    database: &dyn FoodDatabase,
    ingredient_name: &str,
    limit: usize,
) -> Result<SearchFoodsResponse, String> {
    if ingredient_name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }

    let query = search_text(ingredient_name);
    let page = database.search(&query, limit).await.map_err(|e| e.to_string())?;

    let candidates: Vec<FoodCandidate> = page.results.iter().map(FoodCandidate::from).collect();
    let decision = score_candidates(&query, &candidates);

    let best = match decision.best.as_ref() {
        Some(best) => match database.get_by_id(&best.candidate.id).await {
            Ok(full) => Some(full),
            Err(e) => {
                tracing::warn!("Full record for {} unavailable ({}); returning search hit", best.candidate.id, e);
                page.results.iter().find(|f| f.id == best.candidate.id).cloned()
            }
        },
        None => None,
    };

    Ok(SearchFoodsResponse {
        query,
        total_hits: page.total_hits,
        best,
        decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::InMemoryFoodDatabase;
    use crate::models::{DataTypeTier, NutrientProfile};

    fn candidate(id: &str, description: &str, data_type: DataTypeTier) -> FoodCandidate {
        FoodCandidate {
            id: id.to_string(),
            description: description.to_string(),
            data_type,
        }
    }

    #[test]
    fn test_rank_food_candidates() {
        let response = rank_food_candidates(
            "Flour, sifted",
            &[
                candidate("1", "Flour, tipo 00", DataTypeTier::Branded),
                candidate("2", "Wheat flour, white, all-purpose, enriched, bleached", DataTypeTier::SrLegacy),
            ],
        )
        .unwrap();
        assert_eq!(response.query, "flour");
        assert_eq!(response.decision.best.unwrap().candidate.id, "2");

        assert!(rank_food_candidates("  ", &[]).is_err());
    }

    #[tokio::test]
    async fn test_search_foods() {
        let food = |id: &str, description: &str| DatabaseFood {
            id: id.to_string(),
            description: description.to_string(),
            data_type: DataTypeTier::SrLegacy,
            nutrients_per_100g: NutrientProfile { calories: 40.0, ..Default::default() },
            portions: Vec::new(),
        };
        let db = InMemoryFoodDatabase::new(vec![food("11282", "Onions, raw"), food("11283", "Onion soup, dry mix")]);

        let response = search_foods(&db, "onion, diced", 10).await.unwrap();
        assert_eq!(response.query, "onion");
        assert_eq!(response.total_hits, 2);
        assert_eq!(response.best.unwrap().id, "11282");
        assert_eq!(response.decision.ranked.len(), 2);
    }
}
