use super::{MealPlan, PlannerError, SlotOperation, SlotRef};
use crate::recipe::Recipe;
use crate::utils::DateKey;

impl MealPlan {
    fn slot_or_err(&self, slot: SlotRef) -> Result<&Vec<Recipe>, PlannerError> {
        self.day(slot.date)
            .map(|day| day.meals.slot(slot.meal))
            .ok_or(PlannerError::DateNotInPlan(DateKey(slot.date)))
    }

    fn check_insertable(
        &self,
        slot: SlotRef,
        operation: SlotOperation,
        id: u64,
    ) -> Result<(), PlannerError> {
        let recipes = self.slot_or_err(slot)?;
        if operation == SlotOperation::Add && recipes.iter().any(|recipe| recipe.id == id) {
            return Err(PlannerError::RecipeAlreadyInSlot { id, slot });
        }
        Ok(())
    }

    /// Puts `recipe` into `slot` and recomputes the nutrition of the whole week.
    pub fn insert(
        &mut self,
        slot: SlotRef,
        operation: SlotOperation,
        recipe: Recipe,
    ) -> Result<(), PlannerError> {
        self.check_insertable(slot, operation, recipe.id)?;

        let week = self
            .week_containing_mut(slot.date)
            .ok_or(PlannerError::DateNotInPlan(DateKey(slot.date)))?;
        let day = week
            .days
            .get_mut(&DateKey(slot.date))
            .ok_or(PlannerError::DateNotInPlan(DateKey(slot.date)))?;
        let recipes = day.meals.slot_mut(slot.meal);
        if operation == SlotOperation::Replace {
            recipes.clear();
        }
        tracing::debug!("Scheduling recipe {} at {slot} ({operation:?})", recipe.id);
        recipes.push(recipe);
        week.recompute_nutrition();
        Ok(())
    }

    /// Removes the first instance of `id` from `slot` and returns it.
    pub fn remove(&mut self, id: u64, slot: SlotRef) -> Result<Recipe, PlannerError> {
        let day = self
            .day_mut(slot.date)
            .ok_or(PlannerError::DateNotInPlan(DateKey(slot.date)))?;
        let recipes = day.meals.slot_mut(slot.meal);
        let index = recipes
            .iter()
            .position(|recipe| recipe.id == id)
            .ok_or(PlannerError::RecipeNotInSlot { id, slot })?;
        let removed = recipes.remove(index);
        day.recompute_nutrition();
        tracing::debug!("Removed recipe {id} from {slot}");
        Ok(removed)
    }

    /// Moves an instance between slots as one step. `replacement` is the
    /// instance that lands in `to` (typically the original with its servings
    /// overridden). Both ends are validated before anything changes, so a
    /// rejected move leaves the plan untouched.
    pub fn relocate(
        &mut self,
        id: u64,
        from: SlotRef,
        to: SlotRef,
        operation: SlotOperation,
        replacement: Recipe,
    ) -> Result<(), PlannerError> {
        if !self.slot_or_err(from)?.iter().any(|recipe| recipe.id == id) {
            return Err(PlannerError::RecipeNotInSlot { id, slot: from });
        }
        self.check_insertable(to, operation, replacement.id)?;

        self.remove(id, from)?;
        self.insert(to, operation, replacement)
    }

    pub fn find(&self, id: u64, slot: SlotRef) -> Option<&Recipe> {
        self.day(slot.date)?
            .meals
            .slot(slot.meal)
            .iter()
            .find(|recipe| recipe.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: u64, slot: SlotRef) -> Option<&mut Recipe> {
        self.day_mut(slot.date)?
            .meals
            .slot_mut(slot.meal)
            .iter_mut()
            .find(|recipe| recipe.id == id)
    }

    /// Every scheduled instance across every resident day.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.weeks()
            .flat_map(|(_, week)| week.days.values())
            .flat_map(|day| day.meals.iter())
    }

    pub(crate) fn recipes_mut(&mut self) -> impl Iterator<Item = &mut Recipe> {
        self.weeks_mut()
            .flat_map(|week| week.days.values_mut())
            .flat_map(|day| day.meals.iter_mut())
    }

    pub(crate) fn recompute_day_nutrition(&mut self, date: chrono::NaiveDate) {
        if let Some(day) = self.day_mut(date) {
            day.recompute_nutrition();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_plan::MealSlot;
    use crate::recipe::fixtures::sample_recipe;
    use crate::recipe::Measure;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    fn plan() -> MealPlan {
        MealPlan::load(None, monday())
    }

    fn with_calories(id: u64, calories: f64) -> Recipe {
        let mut recipe = sample_recipe(id);
        recipe.macros.calories = Measure::Known(calories);
        recipe
    }

    #[test]
    fn replace_clears_the_slot_first() {
        let mut plan = plan();
        let dinner = SlotRef::new(monday(), MealSlot::Dinner);
        plan.insert(dinner, SlotOperation::Add, sample_recipe(7)).unwrap();
        plan.insert(dinner, SlotOperation::Add, sample_recipe(9)).unwrap();
        plan.insert(dinner, SlotOperation::Replace, sample_recipe(11)).unwrap();

        let ids: Vec<u64> = plan.day(monday()).unwrap().meals.dinner.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![11]);
    }

    #[test]
    fn duplicate_add_is_rejected_without_change() {
        let mut plan = plan();
        let lunch = SlotRef::new(monday(), MealSlot::Lunch);
        plan.insert(lunch, SlotOperation::Add, sample_recipe(5)).unwrap();
        let before = plan.clone();

        let err = plan.insert(lunch, SlotOperation::Add, sample_recipe(5)).unwrap_err();
        assert_eq!(err, PlannerError::RecipeAlreadyInSlot { id: 5, slot: lunch });
        assert_eq!(err.to_string(), format!("recipe already exists in this slot ({lunch})"));
        assert_eq!(plan, before);
    }

    #[test]
    fn day_nutrition_is_the_sum_over_all_slots() {
        let mut plan = plan();
        plan.insert(SlotRef::new(monday(), MealSlot::Breakfast), SlotOperation::Add, with_calories(1, 350.5))
            .unwrap();
        plan.insert(SlotRef::new(monday(), MealSlot::Snacks), SlotOperation::Add, with_calories(2, 120.25))
            .unwrap();
        plan.insert(SlotRef::new(monday(), MealSlot::Dinner), SlotOperation::Add, with_calories(3, 700.0))
            .unwrap();

        let nutrition = plan.day(monday()).unwrap().nutrition;
        assert_eq!(nutrition.calories, 350.5 + 120.25 + 700.0);
        assert_eq!(nutrition.protein, 120.0);

        plan.remove(2, SlotRef::new(monday(), MealSlot::Snacks)).unwrap();
        assert_eq!(plan.day(monday()).unwrap().nutrition.calories, 350.5 + 700.0);
    }

    #[test]
    fn remove_takes_only_the_first_match() {
        let mut plan = plan();
        let lunch = SlotRef::new(monday(), MealSlot::Lunch);
        plan.insert(lunch, SlotOperation::Add, sample_recipe(1)).unwrap();
        plan.insert(lunch, SlotOperation::Add, sample_recipe(2)).unwrap();
        plan.remove(1, lunch).unwrap();
        assert_eq!(plan.day(monday()).unwrap().meals.lunch.len(), 1);
        assert!(matches!(
            plan.remove(1, lunch),
            Err(PlannerError::RecipeNotInSlot { id: 1, .. })
        ));
    }

    #[test]
    fn relocate_moves_a_single_instance() {
        let mut plan = plan();
        let lunch = SlotRef::new(monday(), MealSlot::Lunch);
        let dinner = SlotRef::new(monday(), MealSlot::Dinner);
        plan.insert(lunch, SlotOperation::Add, sample_recipe(42)).unwrap();

        let moved = plan.find(42, lunch).unwrap().clone();
        plan.relocate(42, lunch, dinner, SlotOperation::Add, moved).unwrap();

        let day = plan.day(monday()).unwrap();
        assert!(day.meals.lunch.is_empty());
        assert_eq!(day.meals.dinner.len(), 1);
        assert_eq!(day.nutrition.calories, 800.0);
    }

    #[test]
    fn rejected_relocation_leaves_source_in_place() {
        let mut plan = plan();
        let lunch = SlotRef::new(monday(), MealSlot::Lunch);
        let dinner = SlotRef::new(monday(), MealSlot::Dinner);
        plan.insert(lunch, SlotOperation::Add, sample_recipe(42)).unwrap();
        plan.insert(dinner, SlotOperation::Add, sample_recipe(42)).unwrap();
        let before = plan.clone();

        let moved = sample_recipe(42);
        let err = plan.relocate(42, lunch, dinner, SlotOperation::Add, moved).unwrap_err();
        assert!(matches!(err, PlannerError::RecipeAlreadyInSlot { .. }));
        assert_eq!(plan, before);

        let outside = SlotRef::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), MealSlot::Lunch);
        let err = plan.relocate(42, lunch, outside, SlotOperation::Add, sample_recipe(42)).unwrap_err();
        assert!(matches!(err, PlannerError::DateNotInPlan(_)));
        assert_eq!(plan, before);
    }

    #[test]
    fn weekend_dates_are_not_plannable() {
        let mut plan = plan();
        let saturday = NaiveDate::from_ymd_opt(2025, 1, 25).unwrap();
        let err = plan
            .insert(SlotRef::new(saturday, MealSlot::Lunch), SlotOperation::Add, sample_recipe(1))
            .unwrap_err();
        assert_eq!(err, PlannerError::DateNotInPlan(DateKey(saturday)));
    }
}
