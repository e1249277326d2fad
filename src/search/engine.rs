use std::collections::HashSet;

use super::convert::convert_raw_recipe;
use super::query::SearchRequest;
use super::validation::recipe_id;
use crate::api_connection::{with_timeout, ApiConnectionError, RecipeProvider};
use crate::config::Config;
use crate::recipe::{Measure, Recipe};
use crate::state::{AppState, BrowsingSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// This many recipes were stored in the results collection.
    Found(usize),
    NoResults,
}

/// Keeps the first occurrence of each id, in order.
pub fn dedup_ids(ids: Vec<u64>) -> Vec<u64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Runs an identifier search, fetches details and stores the converted
/// recipes in the collection matching the request. Previous results are
/// cleared up front, so a failed or empty search never leaves stale results.
pub async fn run_search<P: RecipeProvider>(
    state: &mut AppState,
    provider: &P,
    request: &SearchRequest,
    config: &Config,
) -> Result<SearchOutcome, ApiConnectionError> {
    let target = request.results_source();
    state.collection_mut(target).clear();

    let params = request.query_params(config);
    let ids = with_timeout(
        "recipe search",
        config.timeouts.id_search,
        provider.search_ids(request.endpoint(), &params),
    )
    .await?;
    let ids = dedup_ids(ids);
    tracing::debug!("Identifier search returned {} unique ids", ids.len());
    if ids.is_empty() {
        return Ok(SearchOutcome::NoResults);
    }

    let raw_recipes = with_timeout(
        "recipe details",
        config.timeouts.detail_fetch,
        provider.recipe_details(&ids),
    )
    .await?;

    let mut recipes: Vec<Recipe> = Vec::with_capacity(raw_recipes.len());
    for raw in &raw_recipes {
        let cached = recipe_id(raw).and_then(|id| state.book_entry(id)).cloned();
        let recipe = match cached {
            Some(book_copy) => book_copy,
            None => match convert_raw_recipe(raw, &state.daily_values) {
                Ok(recipe) => recipe,
                Err(reason) => {
                    tracing::debug!("Dropping recipe {:?}: {reason}", raw.id);
                    continue;
                }
            },
        };
        if recipes.iter().any(|existing| existing.id == recipe.id) {
            continue;
        }
        recipes.push(recipe);
    }

    // Keep the order the identifier search ranked them in.
    recipes.sort_by_key(|recipe| ids.iter().position(|id| *id == recipe.id).unwrap_or(usize::MAX));

    for recipe in &mut recipes {
        annotate(state, target, recipe);
    }
    if target == BrowsingSource::IngredientSearch {
        recipes.sort_by_key(|recipe| recipe.num_missing_ingredients.value_or(u32::MAX));
    }

    if recipes.is_empty() {
        tracing::info!("Search produced no usable recipes");
        return Ok(SearchOutcome::NoResults);
    }
    let count = recipes.len();
    *state.collection_mut(target) = recipes;
    tracing::info!("Stored {count} recipes in {target}");
    Ok(SearchOutcome::Found(count))
}

/// Availability against the current pantry and the bookmark flag.
fn annotate(state: &AppState, target: BrowsingSource, recipe: &mut Recipe) {
    state.pantry.annotate(recipe);
    if target == BrowsingSource::BrowseSearch && state.pantry.is_empty() {
        recipe.num_missing_ingredients = Measure::NotApplicable;
    }
    recipe.is_bookmarked = state.book_entry(recipe.id).is_some();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup_ids(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
