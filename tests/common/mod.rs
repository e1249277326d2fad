#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::time::Duration;

use chrono::NaiveDate;
use meal_planner::api_connection::endpoints::{IngredientSuggestion, RecipeSuggestion};
use meal_planner::api_connection::{ApiConnectionError, RawRecipe, RecipeProvider, SearchEndpoint};
use meal_planner::app::App;
use meal_planner::config::Config;
use meal_planner::storage::{MemoryStorage, Storage};
use serde_json::json;

/// In-process stand-in for the recipe API.
#[derive(Default)]
pub struct FakeProvider {
    pub hits: RefCell<Vec<u64>>,
    pub details: Vec<RawRecipe>,
    pub ingredients: Vec<String>,
    pub titles: Vec<(u64, String)>,
    /// Applied to every call when set.
    pub delay: Option<Duration>,
    pub detail_calls: Cell<usize>,
    pub last_search: RefCell<Option<(SearchEndpoint, Vec<(&'static str, String)>)>>,
}

impl FakeProvider {
    pub fn with_recipes(details: Vec<RawRecipe>) -> Self {
        let hits = details
            .iter()
            .filter_map(|raw| raw.id)
            .map(|id| id as u64)
            .collect();
        Self {
            hits: RefCell::new(hits),
            details,
            ..Default::default()
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl RecipeProvider for FakeProvider {
    async fn search_ids(
        &self,
        endpoint: SearchEndpoint,
        params: &[(&'static str, String)],
    ) -> Result<Vec<u64>, ApiConnectionError> {
        self.pause().await;
        *self.last_search.borrow_mut() = Some((endpoint, params.to_vec()));
        Ok(self.hits.borrow().clone())
    }

    async fn recipe_details(&self, ids: &[u64]) -> Result<Vec<RawRecipe>, ApiConnectionError> {
        self.pause().await;
        self.detail_calls.set(self.detail_calls.get() + 1);
        Ok(self
            .details
            .iter()
            .filter(|raw| raw.id.is_some_and(|id| ids.contains(&(id as u64))))
            .cloned()
            .collect())
    }

    async fn autocomplete_ingredients(
        &self,
        partial: &str,
        number: u32,
    ) -> Result<Vec<IngredientSuggestion>, ApiConnectionError> {
        self.pause().await;
        Ok(self
            .ingredients
            .iter()
            .filter(|name| name.contains(&partial.to_lowercase()))
            .take(number as usize)
            .map(|name| IngredientSuggestion { name: name.clone() })
            .collect())
    }

    async fn autocomplete_recipes(
        &self,
        partial: &str,
        number: u32,
    ) -> Result<Vec<RecipeSuggestion>, ApiConnectionError> {
        self.pause().await;
        Ok(self
            .titles
            .iter()
            .filter(|(_, title)| title.to_lowercase().contains(&partial.to_lowercase()))
            .take(number as usize)
            .map(|(id, title)| RecipeSuggestion {
                id: *id,
                title: title.clone(),
            })
            .collect())
    }
}

/// A two-serving recipe shaped like a bulk-information response. Nutrition is
/// per serving: 400 kcal, 20 g protein, 10 g fat, 50 g carbs.
pub fn raw_recipe(id: u64, title: &str, ingredients: &[&str]) -> RawRecipe {
    let extended: Vec<_> = ingredients
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "nameClean": name,
                "amount": 1.0,
                "unit": "cup",
                "aisle": "Produce"
            })
        })
        .collect();
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "image": format!("https://img.example/{id}.jpg"),
        "servings": 2,
        "readyInMinutes": 30,
        "cuisines": ["Italian"],
        "dishTypes": ["dinner"],
        "diets": null,
        "extendedIngredients": extended,
        "analyzedInstructions": [{ "steps": [{ "step": "Cook everything." }] }],
        "nutrition": {
            "nutrients": [
                { "name": "Calories", "amount": 400.0, "unit": "kcal" },
                { "name": "Protein", "amount": 20.0, "unit": "g" },
                { "name": "Fat", "amount": 10.0, "unit": "g" },
                { "name": "Carbohydrates", "amount": 50.0, "unit": "g" }
            ],
            "caloricBreakdown": { "percentProtein": 20.0, "percentFat": 22.5, "percentCarbs": 57.5 }
        }
    }))
    .expect("fixture is a valid raw recipe")
}

/// Monday 20 January 2025.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
}

pub fn app_with(provider: FakeProvider) -> App<FakeProvider, MemoryStorage> {
    app_with_storage(provider, MemoryStorage::new())
}

pub fn app_with_storage<S: Storage>(provider: FakeProvider, storage: S) -> App<FakeProvider, S> {
    App::load(Config::default(), provider, storage, monday() + chrono::Days::new(2)).unwrap()
}
