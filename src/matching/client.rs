//! Food database collaborator
//!
//! [`FoodDatabase`] is the seam the matcher talks to. [`FdcClient`] implements it
//! against USDA FoodData Central; [`InMemoryFoodDatabase`] serves a fixed list of
//! records for tests and offline use.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FoodDatabaseError;
use crate::models::{DataTypeTier, DatabaseFood, FoodPortion, Nutrient, NutrientProfile};

/// FoodData Central page size ceiling
pub const MAX_PAGE_SIZE: usize = 200;

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<DatabaseFood>,
    pub total_hits: u64,
}

#[async_trait]
pub trait FoodDatabase: Send + Sync {
    /// Search by free text, at most `limit` records
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, FoodDatabaseError>;

    /// Full record, including portions
    async fn get_by_id(&self, id: &str) -> Result<DatabaseFood, FoodDatabaseError>;
}

/// FoodData Central nutrient number for each tracked nutrient
pub fn fdc_nutrient_number(nutrient: Nutrient) -> &'static str {
    match nutrient {
        Nutrient::Calories => "208",
        Nutrient::TotalFat => "204",
        Nutrient::SaturatedFat => "606",
        Nutrient::TransFat => "605",
        Nutrient::MonounsaturatedFat => "645",
        Nutrient::PolyunsaturatedFat => "646",
        Nutrient::Cholesterol => "601",
        Nutrient::Sodium => "307",
        Nutrient::TotalCarbohydrate => "205",
        Nutrient::DietaryFiber => "291",
        Nutrient::TotalSugars => "269",
        Nutrient::AddedSugars => "539",
        Nutrient::Protein => "203",
        Nutrient::VitaminD => "328",
        Nutrient::Calcium => "301",
        Nutrient::Iron => "303",
        Nutrient::Potassium => "306",
        Nutrient::VitaminA => "320",
        Nutrient::VitaminC => "401",
        Nutrient::VitaminE => "323",
        Nutrient::VitaminK => "430",
        Nutrient::Thiamin => "404",
        Nutrient::Riboflavin => "405",
        Nutrient::Niacin => "406",
        Nutrient::VitaminB6 => "415",
        Nutrient::Folate => "435",
        Nutrient::VitaminB12 => "418",
        Nutrient::Magnesium => "304",
        Nutrient::Zinc => "309",
    }
}

/// Atwater energy numbers used by Foundation foods that lack "208"
const ENERGY_FALLBACK_NUMBERS: &[&str] = &["958", "957"];

// FoodData Central wire format. Search hits and detail records share most
// fields but spell nutrient values differently.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcSearchPage {
    #[serde(default)]
    foods: Vec<FdcFood>,
    #[serde(default)]
    total_hits: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcFood {
    fdc_id: u64,
    description: String,
    data_type: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FdcNutrientValue>,
    #[serde(default)]
    food_portions: Vec<FdcPortion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcNutrientValue {
    // search hits
    nutrient_number: Option<String>,
    value: Option<f64>,
    // detail records
    nutrient: Option<FdcNutrientInfo>,
    amount: Option<f64>,
}

impl FdcNutrientValue {
    fn number(&self) -> Option<&str> {
        self.nutrient_number
            .as_deref()
            .or_else(|| self.nutrient.as_ref().and_then(|n| n.number.as_deref()))
    }

    fn amount(&self) -> Option<f64> {
        self.value.or(self.amount)
    }
}

#[derive(Debug, Deserialize)]
struct FdcNutrientInfo {
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcPortion {
    modifier: Option<String>,
    portion_description: Option<String>,
    measure_unit: Option<FdcMeasureUnit>,
    gram_weight: Option<f64>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FdcMeasureUnit {
    name: Option<String>,
}

fn nutrient_profile(values: &[FdcNutrientValue]) -> NutrientProfile {
    let find = |number: &str| {
        values
            .iter()
            .find(|v| v.number() == Some(number))
            .and_then(FdcNutrientValue::amount)
    };

    let mut profile = NutrientProfile::from_fn(|n| find(fdc_nutrient_number(n)).unwrap_or(0.0));
    if find(fdc_nutrient_number(Nutrient::Calories)).is_none() {
        if let Some(kcal) = ENERGY_FALLBACK_NUMBERS.iter().find_map(|n| find(*n)) {
            profile.calories = kcal;
        }
    }
    profile
}

fn food_portion(portion: &FdcPortion) -> Option<FoodPortion> {
    let gram_weight = portion.gram_weight.filter(|g| *g > 0.0)?;
    let measure_name = portion
        .measure_unit
        .as_ref()
        .and_then(|m| m.name.clone())
        .filter(|name| !name.eq_ignore_ascii_case("undetermined"))
        .or_else(|| portion.portion_description.clone())
        .unwrap_or_default();

    Some(FoodPortion {
        modifier: portion.modifier.clone().unwrap_or_default(),
        measure_name,
        gram_weight,
        amount: portion.amount.filter(|a| *a > 0.0).unwrap_or(1.0),
    })
}

impl From<FdcFood> for DatabaseFood {
    fn from(food: FdcFood) -> Self {
        DatabaseFood {
            id: food.fdc_id.to_string(),
            description: food.description,
            data_type: food
                .data_type
                .as_deref()
                .map(DataTypeTier::from_label)
                .unwrap_or_default(),
            nutrients_per_100g: nutrient_profile(&food.food_nutrients),
            portions: food.food_portions.iter().filter_map(food_portion).collect(),
        }
    }
}

/// USDA FoodData Central client
pub struct FdcClient {
    api_key: Option<String>,
    base_url: String,
    http_client: reqwest::Client,
}

impl FdcClient {
    pub fn new(api_key: Option<String>, base_url: &str, timeout: Duration) -> Result<Self, FoodDatabaseError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FoodDatabaseError> {
        Self::new(
            config.fdc_api_key.clone(),
            &config.fdc_base_url,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, FoodDatabaseError> {
        self.api_key.as_deref().ok_or(FoodDatabaseError::NotConfigured)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FoodDatabaseError> {
        let response = self.http_client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FoodDatabaseError::Status { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FoodDatabaseError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FoodDatabase for FdcClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, FoodDatabaseError> {
        let api_key = self.api_key()?;
        let page_size = limit.clamp(1, MAX_PAGE_SIZE);
        debug!(query, page_size, "FoodData Central search");

        let url = format!("{}/foods/search", self.base_url);
        let page: FdcSearchPage = self
            .get_json(
                &url,
                &[
                    ("query", query.to_string()),
                    ("pageSize", page_size.to_string()),
                    ("api_key", api_key.to_string()),
                ],
            )
            .await?;

        let results: Vec<DatabaseFood> = page.foods.into_iter().map(DatabaseFood::from).collect();
        info!(query, hits = page.total_hits, returned = results.len(), "FoodData Central search complete");
        Ok(SearchResponse {
            results,
            total_hits: page.total_hits,
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<DatabaseFood, FoodDatabaseError> {
        let api_key = self.api_key()?;
        let fdc_id: u64 = id
            .trim()
            .parse()
            .map_err(|_| FoodDatabaseError::NotFound(id.to_string()))?;
        debug!(fdc_id, "FoodData Central lookup");

        let url = format!("{}/food/{}", self.base_url, fdc_id);
        match self.get_json::<FdcFood>(&url, &[("api_key", api_key.to_string())]).await {
            Ok(food) => Ok(food.into()),
            Err(FoodDatabaseError::Status { status: 404, .. }) => Err(FoodDatabaseError::NotFound(id.to_string())),
            Err(e) => Err(e),
        }
    }
}

/// Fixed list of records, searched by word overlap
#[derive(Debug, Clone, Default)]
pub struct InMemoryFoodDatabase {
    foods: Vec<DatabaseFood>,
}

impl InMemoryFoodDatabase {
    pub fn new(foods: Vec<DatabaseFood>) -> Self {
        Self { foods }
    }
}

#[async_trait]
impl FoodDatabase for InMemoryFoodDatabase {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, FoodDatabaseError> {
        let words: Vec<String> = query.split_whitespace().map(|w| w.to_lowercase()).collect();
        let hits: Vec<DatabaseFood> = self
            .foods
            .iter()
            .filter(|food| {
                let description = food.description.to_lowercase();
                words.iter().any(|w| description.contains(w.trim_end_matches('s')))
            })
            .cloned()
            .collect();

        Ok(SearchResponse {
            total_hits: hits.len() as u64,
            results: hits.into_iter().take(limit).collect(),
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<DatabaseFood, FoodDatabaseError> {
        self.foods
            .iter()
            .find(|food| food.id == id)
            .cloned()
            .ok_or_else(|| FoodDatabaseError::NotFound(id.to_string()))
    }
}
