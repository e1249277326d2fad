//! Ties the state container to the provider and to storage. Every mutation of
//! the recipe book or the meal plan is written through immediately.

use chrono::NaiveDate;
use thiserror::Error;

use crate::api_connection::{ApiConnectionError, RecipeProvider};
use crate::autocomplete::{check_pantry_ingredient, suggest_ingredients, suggest_recipes, IngredientCheckError};
use crate::config::Config;
use crate::meal_plan::{MealPlan, PlannerError, SlotOperation, SlotRef};
use crate::pantry::PantryError;
use crate::recipe::{CustomRecipeInput, NutritionInput, Recipe};
use crate::search::{run_search, SearchOutcome, SearchRequest};
use crate::servings::{ServingsChange, ServingsOutcome};
use crate::state::{AppState, Location};
use crate::storage::{load_record, save_record, Storage, StorageError, StorageKey};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Planner(#[from] PlannerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct App<P, S> {
    pub state: AppState,
    pub config: Config,
    provider: P,
    storage: S,
}

impl<P: RecipeProvider, S: Storage> App<P, S> {
    /// Restores the recipe book and meal plan, re-deriving the resident weeks
    /// around `today`.
    pub fn load(config: Config, provider: P, storage: S, today: NaiveDate) -> Result<Self, StorageError> {
        let recipe_book: Vec<Recipe> =
            load_record(&storage, StorageKey::RecipeBook)?.unwrap_or_default();
        let persisted_plan: Option<MealPlan> = load_record(&storage, StorageKey::MealPlan)?;
        let meal_plan = MealPlan::load(persisted_plan, today);
        tracing::info!(
            "Loaded {} recipe book entries and {} resident weeks",
            recipe_book.len(),
            meal_plan.week_keys().count()
        );

        let state = AppState::new(recipe_book, meal_plan, config.daily_values);
        let mut app = Self {
            state,
            config,
            provider,
            storage,
        };
        // The window may have moved since the last session.
        app.persist_meal_plan()?;
        Ok(app)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn persist_recipe_book(&mut self) -> Result<(), StorageError> {
        save_record(&mut self.storage, StorageKey::RecipeBook, &self.state.recipe_book)
    }

    fn persist_meal_plan(&mut self) -> Result<(), StorageError> {
        save_record(&mut self.storage, StorageKey::MealPlan, &self.state.meal_plan)
    }

    fn persist_all(&mut self) -> Result<(), StorageError> {
        self.persist_recipe_book()?;
        self.persist_meal_plan()
    }

    pub async fn search(&mut self, request: &SearchRequest) -> Result<SearchOutcome, ApiConnectionError> {
        run_search(&mut self.state, &self.provider, request, &self.config).await
    }

    /// Searches by the current pantry contents.
    pub async fn search_pantry(&mut self) -> Result<SearchOutcome, ApiConnectionError> {
        let request = SearchRequest::ByIngredients(self.state.pantry.items().to_vec());
        self.search(&request).await
    }

    pub async fn add_pantry_ingredient(&mut self, raw: &str) -> Result<String, IngredientCheckError> {
        let normalized =
            check_pantry_ingredient(&self.state.pantry, &self.provider, raw, &self.config).await?;
        Ok(self.state.pantry.add(&normalized)?)
    }

    pub fn remove_pantry_ingredient(&mut self, raw: &str) -> Result<String, PantryError> {
        self.state.pantry.remove(raw)
    }

    pub async fn suggest_ingredients(&self, partial: &str) -> Result<Vec<String>, ApiConnectionError> {
        suggest_ingredients(&self.provider, partial, &self.config).await
    }

    pub async fn suggest_recipes(&self, partial: &str) -> Result<Vec<(u64, String)>, ApiConnectionError> {
        suggest_recipes(&self.provider, partial, &self.config).await
    }

    pub fn toggle_bookmark(&mut self, id: u64, location: Location) -> Result<bool, AppError> {
        let bookmarked = self.state.toggle_bookmark(id, location)?;
        self.persist_all()?;
        Ok(bookmarked)
    }

    pub fn remove_from_recipe_book(&mut self, id: u64) -> Result<Recipe, AppError> {
        let removed = self.state.remove_from_recipe_book(id)?;
        self.persist_all()?;
        Ok(removed)
    }

    pub fn add_custom_recipe(&mut self, input: CustomRecipeInput) -> Result<u64, AppError> {
        let id = self.state.add_custom_recipe(input)?;
        self.persist_recipe_book()?;
        Ok(id)
    }

    pub fn adjust_servings(
        &mut self,
        id: u64,
        location: Location,
        change: ServingsChange,
    ) -> Result<ServingsOutcome, AppError> {
        let outcome = self.state.adjust_servings(id, location, change)?;
        if outcome.changed() {
            match location {
                Location::Planner(_) => self.persist_meal_plan()?,
                Location::Browsing(_) => self.persist_recipe_book()?,
            }
        }
        Ok(outcome)
    }

    pub fn add_to_plan(
        &mut self,
        id: u64,
        from: Location,
        to: SlotRef,
        operation: SlotOperation,
        servings: u32,
    ) -> Result<(), AppError> {
        self.state.add_to_plan(id, from, to, operation, servings)?;
        self.persist_meal_plan()?;
        Ok(())
    }

    pub fn add_custom_entry(
        &mut self,
        title: &str,
        nutrition: NutritionInput,
        to: SlotRef,
        operation: SlotOperation,
    ) -> Result<u64, AppError> {
        let id = self.state.add_custom_entry(title, nutrition, to, operation)?;
        self.persist_meal_plan()?;
        Ok(id)
    }

    pub fn remove_from_plan(&mut self, id: u64, slot: SlotRef) -> Result<Recipe, AppError> {
        let removed = self.state.remove_from_plan(id, slot)?;
        self.persist_meal_plan()?;
        Ok(removed)
    }

    pub fn show_next_week(&mut self) -> bool {
        self.state.meal_plan.show_next_week()
    }

    pub fn show_previous_week(&mut self) -> bool {
        self.state.meal_plan.show_previous_week()
    }
}
