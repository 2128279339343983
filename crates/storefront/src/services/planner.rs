//! Meal-planner service client.
//!
//! The planner is an opaque external service: it accepts a dish
//! description, a serving count, and an appetite level, and answers with
//! a list of `(productId, quantity)` pairs. The storefront resolves
//! those against the catalog and fills the cart; everything about how
//! the list is produced stays on the other side of this client.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use freshmart_core::ProductId;

use crate::config::MealPlannerConfig;

/// Planner endpoint path.
const PLAN_MEAL_PATH: &str = "/api/ai/plan-meal";

/// Cached plans per (dish, servings, appetite); repeat requests for the
/// same dish are common when shoppers tweak a dialog and resubmit.
const PLAN_CACHE_CAPACITY: u64 = 256;
const PLAN_CACHE_TTL: Duration = Duration::from_secs(600);

/// Errors that can occur when interacting with the planner service.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error response.
    #[error("planner error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the client or parse a response.
    #[error("planner client error: {0}")]
    Parse(String),
}

/// Appetite level forwarded to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Appetite {
    Light,
    #[default]
    Normal,
    Heavy,
}

impl Appetite {
    /// Wire value expected by the planner service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Normal => "normal",
            Self::Heavy => "heavy",
        }
    }

    /// Parse a form value, defaulting to `Normal` for anything else.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        match value {
            "light" => Self::Light,
            "heavy" => Self::Heavy,
            _ => Self::Normal,
        }
    }
}

/// One planned ingredient: a product reference and how many units the
/// planner thinks the dish needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlannedItem {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// May be zero or negative in degenerate planner output; consumers
    /// treat anything below 1 as 1.
    #[serde(default)]
    pub quantity: i64,
}

/// Request body for the plan-meal endpoint.
#[derive(Serialize)]
struct PlanMealRequest<'a> {
    dish: &'a str,
    servings: u32,
    appetite: &'a str,
}

/// Response body from the plan-meal endpoint.
#[derive(Deserialize)]
struct PlanMealResponse {
    #[serde(default)]
    items: Vec<PlannedItem>,
}

type PlanKey = (String, u32, Appetite);

/// Meal-planner API client.
#[derive(Clone)]
pub struct MealPlannerClient {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<PlanKey, Arc<Vec<PlannedItem>>>,
}

impl MealPlannerClient {
    /// Create a new planner client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &MealPlannerConfig) -> Result<Self, PlannerError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key.expose_secret());
            let mut value = HeaderValue::from_str(&auth_value)
                .map_err(|e| PlannerError::Parse(format!("Invalid API key format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            cache: Cache::builder()
                .max_capacity(PLAN_CACHE_CAPACITY)
                .time_to_live(PLAN_CACHE_TTL)
                .build(),
        })
    }

    /// Ask the planner for the ingredient list of `dish`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers with
    /// a non-success status.
    pub async fn plan_meal(
        &self,
        dish: &str,
        servings: u32,
        appetite: Appetite,
    ) -> Result<Arc<Vec<PlannedItem>>, PlannerError> {
        let key = (dish.trim().to_lowercase(), servings, appetite);
        if let Some(items) = self.cache.get(&key).await {
            return Ok(items);
        }

        let items = Arc::new(self.fetch_plan(dish, servings, appetite).await?);
        self.cache.insert(key, items.clone()).await;
        Ok(items)
    }

    async fn fetch_plan(
        &self,
        dish: &str,
        servings: u32,
        appetite: Appetite,
    ) -> Result<Vec<PlannedItem>, PlannerError> {
        let url = format!("{}{PLAN_MEAL_PATH}", self.base_url);
        let body = PlanMealRequest {
            dish,
            servings,
            appetite: appetite.as_str(),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlannerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let plan: PlanMealResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::Parse(e.to_string()))?;
        Ok(plan.items)
    }
}
