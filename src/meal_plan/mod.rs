//! The rolling meal-plan calendar.
//!
//! A [`MealPlan`] holds nine contiguous weeks keyed by their Monday. Each week
//! holds five weekday [`DayPlan`]s, and each day holds four meal slots plus a
//! nutrition total that is recomputed after every structural change.

pub mod calendar;
pub mod engine;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::DailyValues;
use crate::recipe::Recipe;
use crate::state::BrowsingSource;
use crate::utils::DateKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Snacks,
        MealSlot::Dinner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Snacks => "snacks",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown meal slot {s:?} (expected breakfast, lunch, snacks or dinner)"))
    }
}

/// How a recipe enters a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotOperation {
    /// Append; rejected if the slot already holds the same recipe.
    #[default]
    Add,
    /// Clear the slot, then append.
    Replace,
}

/// A single meal slot on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub date: NaiveDate,
    pub meal: MealSlot,
}

impl SlotRef {
    pub fn new(date: NaiveDate, meal: MealSlot) -> Self {
        Self { date, meal }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", DateKey(self.date), self.meal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("{0} is not a planned weekday within the resident weeks")]
    DateNotInPlan(DateKey),
    #[error("recipe already exists in this slot ({slot})")]
    RecipeAlreadyInSlot { id: u64, slot: SlotRef },
    #[error("recipe {id} is not scheduled at {slot}")]
    RecipeNotInSlot { id: u64, slot: SlotRef },
    #[error("recipe {id} is not in the {collection}")]
    RecipeNotFound { id: u64, collection: BrowsingSource },
    #[error("custom meal entry {0} cannot be bookmarked")]
    NotBookmarkable(u64),
    #[error("{requested} servings is outside the allowed range {min}-{max}")]
    ServingsOutOfRange { requested: u32, min: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: Vec<Recipe>,
    #[serde(default)]
    pub lunch: Vec<Recipe>,
    #[serde(default)]
    pub snacks: Vec<Recipe>,
    #[serde(default)]
    pub dinner: Vec<Recipe>,
}

impl Meals {
    pub fn slot(&self, meal: MealSlot) -> &Vec<Recipe> {
        match meal {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Snacks => &self.snacks,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn slot_mut(&mut self, meal: MealSlot) -> &mut Vec<Recipe> {
        match meal {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Snacks => &mut self.snacks,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.breakfast
            .iter()
            .chain(&self.lunch)
            .chain(&self.snacks)
            .chain(&self.dinner)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Recipe> {
        self.breakfast
            .iter_mut()
            .chain(self.lunch.iter_mut())
            .chain(self.snacks.iter_mut())
            .chain(self.dinner.iter_mut())
    }
}

/// Aggregate macros for one day, in kcal and grams.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl DayNutrition {
    /// Sums the known macros of every recipe. Unknown values count as zero.
    pub fn total_of<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        recipes.into_iter().fold(Self::default(), |mut acc, recipe| {
            acc.calories += recipe.macros.calories.value_or(0.0);
            acc.protein += recipe.macros.protein.value_or(0.0);
            acc.carbs += recipe.macros.carbs.value_or(0.0);
            acc.fats += recipe.macros.fats.value_or(0.0);
            acc
        })
    }

    /// Percent of the daily value for protein, fats and carbs, in that order.
    pub fn daily_value_percents(&self, dv: &DailyValues) -> (f64, f64, f64) {
        (
            self.protein / dv.protein_g * 100.0,
            self.fats / dv.fat_g * 100.0,
            self.carbs / dv.carbs_g * 100.0,
        )
    }
}

impl std::ops::AddAssign for DayNutrition {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fats += other.fats;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(default)]
    pub meals: Meals,
    #[serde(default)]
    pub nutrition: DayNutrition,
}

impl DayPlan {
    pub fn recompute_nutrition(&mut self) {
        self.nutrition = DayNutrition::total_of(self.meals.iter());
    }
}

/// Five weekday plans keyed by date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Week {
    pub days: BTreeMap<DateKey, DayPlan>,
}

impl Week {
    pub fn recompute_nutrition(&mut self) {
        self.days.values_mut().for_each(DayPlan::recompute_nutrition);
    }

    pub fn totals(&self) -> DayNutrition {
        let mut total = DayNutrition::default();
        for day in self.days.values() {
            total += day.nutrition;
        }
        total
    }
}

/// Nine resident weeks keyed by Monday, plus the index of the displayed week.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    weeks: BTreeMap<DateKey, Week>,
    #[serde(skip)]
    displayed: usize,
}
