use dotenv::dotenv;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::env;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::endpoints::{
    ComplexSearchResponse, IngredientSuggestion, Provider, RawRecipe, RecipeHit, RecipeSuggestion,
    SearchEndpoint, INFORMATION_BULK_PATH, INGREDIENT_AUTOCOMPLETE_PATH, RECIPE_AUTOCOMPLETE_PATH,
};
use crate::config::{GENERIC_ERROR_MESSAGE, TIMEOUT_MESSAGE};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl ApiConnectionError {
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiConnectionError::Timeout { .. } => true,
            ApiConnectionError::NetworkError(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// The message shown to the user: timeouts are called out, everything
    /// else gets the generic fallback.
    pub fn user_message(&self) -> &'static str {
        if self.is_timeout() {
            TIMEOUT_MESSAGE
        } else {
            GENERIC_ERROR_MESSAGE
        }
    }
}

/// Races `request` against a timer. The losing request future is dropped, so
/// its result can never be observed.
pub async fn with_timeout<T>(
    operation: &'static str,
    after: Duration,
    request: impl Future<Output = Result<T, ApiConnectionError>>,
) -> Result<T, ApiConnectionError> {
    match tokio::time::timeout(after, request).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{operation} timed out after {after:?}");
            Err(ApiConnectionError::Timeout { operation, after })
        }
    }
}

/// The operations consumed from the recipe/nutrition provider.
#[allow(async_fn_in_trait)]
pub trait RecipeProvider {
    /// Identifier search. `params` are endpoint query parameters, excluding the key.
    async fn search_ids(
        &self,
        endpoint: SearchEndpoint,
        params: &[(&'static str, String)],
    ) -> Result<Vec<u64>, ApiConnectionError>;

    /// Full details, including nutrition, for each id.
    async fn recipe_details(&self, ids: &[u64]) -> Result<Vec<RawRecipe>, ApiConnectionError>;

    async fn autocomplete_ingredients(
        &self,
        partial: &str,
        number: u32,
    ) -> Result<Vec<IngredientSuggestion>, ApiConnectionError>;

    async fn autocomplete_recipes(
        &self,
        partial: &str,
        number: u32,
    ) -> Result<Vec<RecipeSuggestion>, ApiConnectionError>;
}

impl Provider {
    pub fn spoonacular(api_key_env_var_name: &str, base_url: &str) -> Self {
        dotenv().ok();
        Self::Spoonacular {
            api_key_env_var: api_key_env_var_name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiConnectionError> {
        match self {
            Provider::Spoonacular {
                api_key_env_var,
                base_url,
                client,
            } => {
                dotenv().ok();
                let actual_api_key = env::var(api_key_env_var)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let url = format!("{base_url}{path}");
                tracing::debug!("GET {url} {params:?}");

                let response = client
                    .get(&url)
                    .query(params)
                    .query(&[("apiKey", actual_api_key.as_str())])
                    .send()
                    .await?;

                if response.status().is_success() {
                    let body = response.text().await?;
                    Ok(serde_json::from_str(&body)?)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}

impl RecipeProvider for Provider {
    async fn search_ids(
        &self,
        endpoint: SearchEndpoint,
        params: &[(&'static str, String)],
    ) -> Result<Vec<u64>, ApiConnectionError> {
        let hits: Vec<RecipeHit> = match endpoint {
            SearchEndpoint::FindByIngredients => self.get_json(endpoint.path(), params).await?,
            SearchEndpoint::ComplexSearch => {
                self.get_json::<ComplexSearchResponse>(endpoint.path(), params)
                    .await?
                    .results
            }
        };
        Ok(hits.into_iter().map(|hit| hit.id).collect())
    }

    async fn recipe_details(&self, ids: &[u64]) -> Result<Vec<RawRecipe>, ApiConnectionError> {
        let ids = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let params = [("ids", ids), ("includeNutrition", "true".to_string())];
        self.get_json(INFORMATION_BULK_PATH, &params).await
    }

    async fn autocomplete_ingredients(
        &self,
        partial: &str,
        number: u32,
    ) -> Result<Vec<IngredientSuggestion>, ApiConnectionError> {
        let params = [("query", partial.to_string()), ("number", number.to_string())];
        self.get_json(INGREDIENT_AUTOCOMPLETE_PATH, &params).await
    }

    async fn autocomplete_recipes(
        &self,
        partial: &str,
        number: u32,
    ) -> Result<Vec<RecipeSuggestion>, ApiConnectionError> {
        let params = [("query", partial.to_string()), ("number", number.to_string())];
        self.get_json(RECIPE_AUTOCOMPLETE_PATH, &params).await
    }
}
