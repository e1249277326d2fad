//! The application state container and the operations that keep the copies
//! of a recipe consistent across collections.
//!
//! The same recipe id may live in the search results, the recipe book and any
//! number of meal-plan slots as independent copies. Bookmark flags are
//! broadcast to every copy; serving changes made while browsing are broadcast
//! to the other browsing collections only. Meal-plan instances are never
//! touched by a change made elsewhere, and vice versa.

use std::collections::HashSet;
use std::fmt;

use crate::config::{DailyValues, MAX_SERVINGS, MIN_SERVINGS};
use crate::meal_plan::{MealPlan, PlannerError, SlotOperation, SlotRef};
use crate::pantry::Pantry;
use crate::recipe::{CustomRecipeInput, NutritionInput, Origin, Recipe};
use crate::servings::{adjust_servings, servings_in_range, ServingsChange, ServingsOutcome};
use crate::utils::unique_id;

/// Collections outside the meal plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowsingSource {
    IngredientSearch,
    BrowseSearch,
    RecipeBook,
}

impl BrowsingSource {
    pub const ALL: [BrowsingSource; 3] = [
        BrowsingSource::IngredientSearch,
        BrowsingSource::BrowseSearch,
        BrowsingSource::RecipeBook,
    ];
}

impl fmt::Display for BrowsingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrowsingSource::IngredientSearch => "ingredient search results",
            BrowsingSource::BrowseSearch => "browse search results",
            BrowsingSource::RecipeBook => "recipe book",
        })
    }
}

/// Where a particular copy of a recipe lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Browsing(BrowsingSource),
    Planner(SlotRef),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub pantry: Pantry,
    pub ingredient_search_results: Vec<Recipe>,
    pub browse_search_results: Vec<Recipe>,
    pub recipe_book: Vec<Recipe>,
    pub meal_plan: MealPlan,
    pub daily_values: DailyValues,
}

impl AppState {
    pub fn new(recipe_book: Vec<Recipe>, meal_plan: MealPlan, daily_values: DailyValues) -> Self {
        Self {
            recipe_book,
            meal_plan,
            daily_values,
            ..Default::default()
        }
    }

    pub fn collection(&self, source: BrowsingSource) -> &[Recipe] {
        match source {
            BrowsingSource::IngredientSearch => &self.ingredient_search_results,
            BrowsingSource::BrowseSearch => &self.browse_search_results,
            BrowsingSource::RecipeBook => &self.recipe_book,
        }
    }

    pub(crate) fn collection_mut(&mut self, source: BrowsingSource) -> &mut Vec<Recipe> {
        match source {
            BrowsingSource::IngredientSearch => &mut self.ingredient_search_results,
            BrowsingSource::BrowseSearch => &mut self.browse_search_results,
            BrowsingSource::RecipeBook => &mut self.recipe_book,
        }
    }

    pub fn find(&self, id: u64, location: Location) -> Option<&Recipe> {
        match location {
            Location::Browsing(source) => self.collection(source).iter().find(|r| r.id == id),
            Location::Planner(slot) => self.meal_plan.find(id, slot),
        }
    }

    fn find_mut(&mut self, id: u64, location: Location) -> Option<&mut Recipe> {
        match location {
            Location::Browsing(source) => {
                self.collection_mut(source).iter_mut().find(|r| r.id == id)
            }
            Location::Planner(slot) => self.meal_plan.find_mut(id, slot),
        }
    }

    fn not_found(id: u64, location: Location) -> PlannerError {
        match location {
            Location::Browsing(collection) => PlannerError::RecipeNotFound { id, collection },
            Location::Planner(slot) => PlannerError::RecipeNotInSlot { id, slot },
        }
    }

    pub fn book_entry(&self, id: u64) -> Option<&Recipe> {
        self.recipe_book.iter().find(|recipe| recipe.id == id)
    }

    fn all_recipes_mut(&mut self) -> impl Iterator<Item = &mut Recipe> {
        self.ingredient_search_results
            .iter_mut()
            .chain(self.browse_search_results.iter_mut())
            .chain(self.recipe_book.iter_mut())
            .chain(self.meal_plan.recipes_mut())
    }

    /// A fresh id not used by any resident recipe.
    pub fn fresh_id(&self) -> u64 {
        let taken: HashSet<u64> = self
            .ingredient_search_results
            .iter()
            .chain(&self.browse_search_results)
            .chain(&self.recipe_book)
            .chain(self.meal_plan.recipes())
            .map(|recipe| recipe.id)
            .collect();
        unique_id(|candidate| taken.contains(&candidate))
    }

    /// Flips the bookmark on the recipe found at `location` and propagates the
    /// new flag to every copy. Returns the new flag.
    pub fn toggle_bookmark(&mut self, id: u64, location: Location) -> Result<bool, PlannerError> {
        let source = self
            .find(id, location)
            .ok_or_else(|| Self::not_found(id, location))?;
        if source.origin == Origin::CustomMealEntry {
            return Err(PlannerError::NotBookmarkable(id));
        }

        let bookmarked = if let Some(index) = self.recipe_book.iter().position(|r| r.id == id) {
            self.recipe_book.remove(index);
            false
        } else {
            let mut entry = source.clone();
            entry.is_bookmarked = true;
            self.recipe_book.push(entry);
            true
        };

        self.broadcast_bookmark(id, bookmarked);
        tracing::info!(
            "Recipe {id} {}",
            if bookmarked { "bookmarked" } else { "removed from recipe book" }
        );
        Ok(bookmarked)
    }

    fn broadcast_bookmark(&mut self, id: u64, bookmarked: bool) {
        self.all_recipes_mut()
            .filter(|recipe| recipe.id == id)
            .for_each(|recipe| recipe.is_bookmarked = bookmarked);
    }

    /// Removes a recipe from the recipe book and clears its flag everywhere.
    pub fn remove_from_recipe_book(&mut self, id: u64) -> Result<Recipe, PlannerError> {
        let index = self
            .recipe_book
            .iter()
            .position(|recipe| recipe.id == id)
            .ok_or(PlannerError::RecipeNotFound {
                id,
                collection: BrowsingSource::RecipeBook,
            })?;
        let removed = self.recipe_book.remove(index);
        self.broadcast_bookmark(id, false);
        Ok(removed)
    }

    /// Stores a user-authored recipe in the recipe book and returns its id.
    pub fn add_custom_recipe(&mut self, input: CustomRecipeInput) -> Result<u64, PlannerError> {
        if !servings_in_range(i64::from(input.servings)) {
            return Err(PlannerError::ServingsOutOfRange {
                requested: input.servings,
                min: MIN_SERVINGS,
                max: MAX_SERVINGS,
            });
        }
        let id = self.fresh_id();
        let mut recipe = Recipe::user_recipe(id, input, &self.daily_values);
        self.pantry.annotate(&mut recipe);
        tracing::info!("Created custom recipe {id} ({})", recipe.title);
        self.recipe_book.push(recipe);
        Ok(id)
    }

    /// Changes the servings of the copy at `location`. Browsing changes are
    /// copied onto the other browsing collections; planner changes stay local
    /// to that one scheduled instance.
    pub fn adjust_servings(
        &mut self,
        id: u64,
        location: Location,
        change: ServingsChange,
    ) -> Result<ServingsOutcome, PlannerError> {
        let dv = self.daily_values;
        let recipe = self
            .find_mut(id, location)
            .ok_or_else(|| Self::not_found(id, location))?;
        let outcome = adjust_servings(recipe, change, &dv);
        if !outcome.changed() {
            return Ok(outcome);
        }

        match location {
            Location::Planner(slot) => self.meal_plan.recompute_day_nutrition(slot.date),
            Location::Browsing(origin) => {
                let updated = recipe.clone();
                for source in BrowsingSource::ALL.into_iter().filter(|s| *s != origin) {
                    self.collection_mut(source)
                        .iter_mut()
                        .filter(|copy| copy.id == id)
                        .for_each(|copy| copy.copy_servings_from(&updated));
                }
            }
        }
        Ok(outcome)
    }

    /// Schedules a copy of the recipe found at `from` into `to` with `servings`
    /// servings. When `from` is itself a meal-plan slot the instance is moved.
    pub fn add_to_plan(
        &mut self,
        id: u64,
        from: Location,
        to: SlotRef,
        operation: SlotOperation,
        servings: u32,
    ) -> Result<(), PlannerError> {
        if !servings_in_range(i64::from(servings)) {
            return Err(PlannerError::ServingsOutOfRange {
                requested: servings,
                min: MIN_SERVINGS,
                max: MAX_SERVINGS,
            });
        }

        let mut instance = self
            .find(id, from)
            .cloned()
            .ok_or_else(|| Self::not_found(id, from))?;
        adjust_servings(&mut instance, ServingsChange::Set(servings), &self.daily_values);

        match from {
            Location::Browsing(_) => self.meal_plan.insert(to, operation, instance)?,
            Location::Planner(origin) => {
                self.meal_plan.relocate(id, origin, to, operation, instance)?
            }
        }
        tracing::info!("Recipe {id} scheduled at {to}");
        Ok(())
    }

    /// Adds a free-form entry to a slot and returns its generated id.
    pub fn add_custom_entry(
        &mut self,
        title: &str,
        nutrition: NutritionInput,
        to: SlotRef,
        operation: SlotOperation,
    ) -> Result<u64, PlannerError> {
        let id = self.fresh_id();
        let entry = Recipe::custom_meal_entry(id, title, nutrition, &self.daily_values);
        self.meal_plan.insert(to, operation, entry)?;
        tracing::info!("Custom entry {id} ({title}) added at {to}");
        Ok(id)
    }

    pub fn remove_from_plan(&mut self, id: u64, slot: SlotRef) -> Result<Recipe, PlannerError> {
        self.meal_plan.remove(id, slot)
    }
}
