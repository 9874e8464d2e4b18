//! Nutrilabel MCP Server Implementation
//!
//! Exposes the recipe-to-label workflow as MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::matching::FoodDatabase;
use crate::models::{FoodCandidate, NutrientProfile, ParsedRecipe};
use crate::parser::SpecificationChoice;
use crate::tools::foods;
use crate::tools::nutrition::{self, CalculateNutritionRequest};
use crate::tools::recipes;
use crate::tools::status::StatusTracker;

/// Nutrilabel MCP Service
#[derive(Clone)]
pub struct NutrilabelService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    config: Config,
    database: Arc<dyn FoodDatabase>,
    tool_router: ToolRouter<NutrilabelService>,
}

impl NutrilabelService {
    pub fn new(config: Config, database: Arc<dyn FoodDatabase>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.food_database_configured(),
                &config.fdc_base_url,
            ))),
            config,
            database,
            tool_router: Self::tool_router(),
        }
    }
}

/// Decode a structured argument that was passed through as raw JSON
fn from_json<T: DeserializeOwned>(field: &str, value: serde_json::Value) -> Result<T, McpError> {
    serde_json::from_value(value)
        .map_err(|e| McpError::invalid_params(format!("Invalid '{}': {}", field, e), None))
}

fn to_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRecipeParams {
    /// Recipe text exactly as pasted (HTML, bullets and Unicode fractions are fine)
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveSpecificationsParams {
    /// The `recipe` object returned by parse_recipe
    pub recipe: serde_json::Value,
    /// Choices, e.g. [{"location": {"in": "final_dish", "index": 2}, "choice": "roma"}].
    /// A null choice means "don't know".
    pub choices: serde_json::Value,
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Ingredient name as it appears in the recipe
    pub ingredient_name: String,
    /// Candidates to request (defaults to NUTRILABEL_SEARCH_LIMIT)
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RankFoodCandidatesParams {
    /// Ingredient name to rank against
    pub query: String,
    /// Candidates: [{"id": "...", "description": "...", "data_type": "SR Legacy"}]
    pub candidates: serde_json::Value,
}

// ============================================================================
// Nutrition Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateNutritionParams {
    /// The (specified) `recipe` object from parse_recipe or resolve_specifications
    pub recipe: serde_json::Value,
    /// One entry per ingredient location: {"location": ..., "food": {...}} or {"location": ..., "skip": true}
    pub assignments: serde_json::Value,
    /// Grams per serving
    pub serving_size_g: f64,
    /// Weight of the finished dish in grams, if weighed
    pub final_weight_g: Option<f64>,
    /// [{"ingredient_id": "flour", "unit": "cup", "grams_per_unit": 125}]
    #[serde(default)]
    pub custom_conversions: Option<serde_json::Value>,
    /// Estimate weights for unknown units instead of failing
    #[serde(default)]
    pub use_fallback_estimates: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FormatNutritionLabelParams {
    /// Per-serving nutrient profile (e.g. report.per_serving from calculate_nutrition)
    pub per_serving: serde_json::Value,
    pub serving_size_g: Option<f64>,
    pub servings_per_container: Option<f64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutrilabelService {
    // --- Status ---

    #[tool(description = "Get the current status of the nutrilabel service including build info, food database configuration, and process information")]
    async fn nutrilabel_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for turning a recipe into a nutrition label. Call this before starting, or when unsure how to use the recipe tools.")]
    fn recipe_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECIPE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECIPE_INSTRUCTIONS)]))
    }

    // --- Recipes ---

    #[tool(description = "Parse pasted recipe text into a dish name, ingredient lines and sub-recipes. Returns lines that need a variety chosen and lines that could not be parsed.")]
    fn parse_recipe(&self, Parameters(p): Parameters<ParseRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::parse_recipe(&p.text, &self.config.input_limits)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Apply the user's variety choices (e.g. roma tomato) to a parsed recipe")]
    fn resolve_specifications(
        &self,
        Parameters(p): Parameters<ResolveSpecificationsParams>,
    ) -> Result<CallToolResult, McpError> {
        let recipe: ParsedRecipe = from_json("recipe", p.recipe)?;
        let choices: Vec<SpecificationChoice> = from_json("choices", p.choices)?;
        let result = recipes::resolve_specifications(recipe, &choices).map_err(|e| McpError::invalid_params(e, None))?;
        to_result(&result)
    }

    // --- Foods ---

    #[tool(description = "Search the food database for an ingredient. Candidates are ranked automatically and the best one is returned with nutrients and portions.")]
    async fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        if !self.config.food_database_configured() {
            return Err(McpError::internal_error(
                "Food database is not configured (set NUTRILABEL_FDC_API_KEY)",
                None,
            ));
        }
        let limit = p.limit.filter(|l| *l > 0).unwrap_or(self.config.search_limit);
        let result = foods::search_foods(self.database.as_ref(), &p.ingredient_name, limit)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Rank food candidates you already have against an ingredient name, without calling the database")]
    fn rank_food_candidates(
        &self,
        Parameters(p): Parameters<RankFoodCandidatesParams>,
    ) -> Result<CallToolResult, McpError> {
        let candidates: Vec<FoodCandidate> = from_json("candidates", p.candidates)?;
        let result = foods::rank_food_candidates(&p.query, &candidates).map_err(|e| McpError::invalid_params(e, None))?;
        to_result(&result)
    }

    // --- Nutrition ---

    #[tool(description = "Calculate nutrition for a matched recipe: per 100 g, per serving, yield adjustment, data-quality warnings and rounded label rows")]
    fn calculate_nutrition(
        &self,
        Parameters(p): Parameters<CalculateNutritionParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = CalculateNutritionRequest {
            recipe: from_json("recipe", p.recipe)?,
            assignments: from_json("assignments", p.assignments)?,
            serving_size_g: p.serving_size_g,
            final_weight_g: p.final_weight_g,
            custom_conversions: match p.custom_conversions {
                Some(value) => from_json("custom_conversions", value)?,
                None => Vec::new(),
            },
            use_fallback_estimates: p.use_fallback_estimates,
        };
        let result = nutrition::calculate_nutrition(&request).map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Round a per-serving nutrient profile into FDA label rows with % Daily Value, plus a plain-text label")]
    fn format_nutrition_label(
        &self,
        Parameters(p): Parameters<FormatNutritionLabelParams>,
    ) -> Result<CallToolResult, McpError> {
        let per_serving: NutrientProfile = from_json("per_serving", p.per_serving)?;
        let result = nutrition::format_nutrition_label(&per_serving, p.serving_size_g, p.servings_per_container);
        to_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilabelService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilabel".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilabel".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilabel - recipe text to nutrition facts label. \
                 IMPORTANT: Call recipe_instructions first. \
                 Workflow: parse_recipe -> resolve_specifications (if pending) -> \
                 search_foods or rank_food_candidates per ingredient -> calculate_nutrition. \
                 format_nutrition_label renders any per-serving profile. \
                 nutrilabel_status reports build and food database configuration."
                    .into(),
            ),
        }
    }
}
