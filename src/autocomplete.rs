//! Suggestions from the provider, and recognition of typed ingredients.

use thiserror::Error;

use crate::api_connection::{with_timeout, ApiConnectionError, RecipeProvider};
use crate::config::Config;
use crate::pantry::{Pantry, PantryError};
use crate::utils::normalize_ingredient_name;

const SUGGESTION_COUNT: u32 = 5;
const MIN_PARTIAL_LEN: usize = 2;
// Wider net when checking whether a name is recognised at all.
const VALIDATION_SUGGESTION_COUNT: u32 = 10;

#[derive(Debug, Error)]
pub enum IngredientCheckError {
    #[error(transparent)]
    Invalid(#[from] PantryError),
    #[error(transparent)]
    Api(#[from] ApiConnectionError),
}

fn long_enough(partial: &str) -> bool {
    partial.trim().chars().count() >= MIN_PARTIAL_LEN
}

pub async fn suggest_ingredients<P: RecipeProvider>(
    provider: &P,
    partial: &str,
    config: &Config,
) -> Result<Vec<String>, ApiConnectionError> {
    if !long_enough(partial) {
        return Ok(Vec::new());
    }
    let suggestions = with_timeout(
        "ingredient autocomplete",
        config.timeouts.autocomplete,
        provider.autocomplete_ingredients(partial.trim(), SUGGESTION_COUNT),
    )
    .await?;
    Ok(suggestions.into_iter().map(|s| s.name).collect())
}

pub async fn suggest_recipes<P: RecipeProvider>(
    provider: &P,
    partial: &str,
    config: &Config,
) -> Result<Vec<(u64, String)>, ApiConnectionError> {
    if !long_enough(partial) {
        return Ok(Vec::new());
    }
    let suggestions = with_timeout(
        "recipe autocomplete",
        config.timeouts.autocomplete,
        provider.autocomplete_recipes(partial.trim(), SUGGESTION_COUNT),
    )
    .await?;
    Ok(suggestions.into_iter().map(|s| (s.id, s.title)).collect())
}

/// Runs the local pantry rules, then asks the provider whether the name is a
/// known ingredient. Returns the normalised name; the pantry is not modified.
pub async fn check_pantry_ingredient<P: RecipeProvider>(
    pantry: &Pantry,
    provider: &P,
    raw: &str,
    config: &Config,
) -> Result<String, IngredientCheckError> {
    let normalized = pantry.check_can_add(raw)?;
    let suggestions = with_timeout(
        "ingredient validation",
        config.timeouts.ingredient_validation,
        provider.autocomplete_ingredients(&normalized, VALIDATION_SUGGESTION_COUNT),
    )
    .await?;

    let recognised = suggestions
        .iter()
        .any(|suggestion| normalize_ingredient_name(&suggestion.name) == normalized);
    if !recognised {
        return Err(PantryError::Unrecognized(normalized).into());
    }
    Ok(normalized)
}
