use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::DailyValues;

const UNAVAILABLE: &str = "Unavailable";
const NOT_APPLICABLE: &str = "N/A";
const LEGACY_MISSING: &str = "-";

/// A value that is either known or explicitly absent.
///
/// `Unavailable` means the value exists but is not known (e.g. prep time of a
/// custom meal entry). `NotApplicable` means the concept does not apply in
/// this context (e.g. missing-ingredient count without a pantry).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Measure<T> {
    Known(T),
    Unavailable,
    #[default]
    NotApplicable,
}

impl<T> Measure<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Measure::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measure<U> {
        match self {
            Measure::Known(value) => Measure::Known(f(value)),
            Measure::Unavailable => Measure::Unavailable,
            Measure::NotApplicable => Measure::NotApplicable,
        }
    }
}

impl<T: Copy> Measure<T> {
    pub fn value_or(&self, fallback: T) -> T {
        self.known().copied().unwrap_or(fallback)
    }
}

impl Measure<f64> {
    /// Builds a measure from a raw float, rejecting NaN and infinities.
    pub fn from_finite(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Measure::Known(v),
            _ => Measure::NotApplicable,
        }
    }

    fn scale(&mut self, ratio: f64) {
        if let Measure::Known(value) = self {
            *value *= ratio;
        }
    }
}

impl<T: fmt::Display> fmt::Display for Measure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Known(value) => value.fmt(f),
            Measure::Unavailable => f.write_str(UNAVAILABLE),
            Measure::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl<T: Serialize> Serialize for Measure<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Measure::Known(value) => value.serialize(serializer),
            Measure::Unavailable => serializer.serialize_str(UNAVAILABLE),
            Measure::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Measure<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Known(T),
            Text(String),
        }

        match Repr::<T>::deserialize(deserializer)? {
            Repr::Known(value) => Ok(Measure::Known(value)),
            Repr::Text(text) if text == UNAVAILABLE => Ok(Measure::Unavailable),
            Repr::Text(text) if text == NOT_APPLICABLE || text == LEGACY_MISSING => {
                Ok(Measure::NotApplicable)
            }
            Repr::Text(other) => Err(D::Error::custom(format!(
                "expected a number, {UNAVAILABLE:?} or {NOT_APPLICABLE:?}, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    App,
    User,
    CustomMealEntry,
}

/// How likely an ingredient is to be on hand given the pantry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    DefinitelyAvailable,
    HouseholdItem,
    PotentiallyAvailable,
    Unavailable,
}

impl Availability {
    pub fn is_missing(self) -> bool {
        self == Availability::Unavailable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
    pub category: String,
    pub availability: Availability,
}

/// Macronutrient totals for the recipe's current serving count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub calories: Measure<f64>,
    pub protein: Measure<f64>,
    pub fats: Measure<f64>,
    pub carbs: Measure<f64>,
}

impl Macros {
    fn scale(&mut self, ratio: f64) {
        self.calories.scale(ratio);
        self.protein.scale(ratio);
        self.fats.scale(ratio);
        self.carbs.scale(ratio);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Micronutrients {
    pub saturated_fat: Measure<f64>,
    pub sugar: Measure<f64>,
    pub fiber: Measure<f64>,
    pub sodium: Measure<f64>,
    pub cholesterol: Measure<f64>,
    pub iron: Measure<f64>,
    pub zinc: Measure<f64>,
    pub calcium: Measure<f64>,
    pub magnesium: Measure<f64>,
}

impl Micronutrients {
    fn scale(&mut self, ratio: f64) {
        macro_rules! scale_all {
            ($($field:ident),*) => {
                $(self.$field.scale(ratio);)*
            };
        }
        scale_all!(saturated_fat, sugar, fiber, sodium, cholesterol, iron, zinc, calcium, magnesium);
    }
}

/// Share of calories coming from each macronutrient. Independent of servings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaloricBreakdown {
    pub percent_protein: Measure<f64>,
    pub percent_fats: Measure<f64>,
    pub percent_carbs: Measure<f64>,
}

impl CaloricBreakdown {
    /// Derives the breakdown from gram amounts using 4/9/4 kcal per gram.
    pub fn from_macros(macros: &Macros) -> Self {
        let (Some(&protein), Some(&fats), Some(&carbs)) =
            (macros.protein.known(), macros.fats.known(), macros.carbs.known())
        else {
            return Self::default();
        };
        let protein_kcal = protein * 4.0;
        let fat_kcal = fats * 9.0;
        let carb_kcal = carbs * 4.0;
        let total = protein_kcal + fat_kcal + carb_kcal;
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            percent_protein: Measure::Known(protein_kcal / total * 100.0),
            percent_fats: Measure::Known(fat_kcal / total * 100.0),
            percent_carbs: Measure::Known(carb_kcal / total * 100.0),
        }
    }
}

/// Percent of the recommended daily value supplied by the recipe.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyValuePercents {
    #[serde(rename = "percentDVProtein")]
    pub protein: Measure<f64>,
    #[serde(rename = "percentDVFats")]
    pub fats: Measure<f64>,
    #[serde(rename = "percentDVCarbs")]
    pub carbs: Measure<f64>,
}

impl DailyValuePercents {
    pub fn from_macros(macros: &Macros, dv: &DailyValues) -> Self {
        Self {
            protein: macros.protein.map(|g| g / dv.protein_g * 100.0),
            fats: macros.fats.map(|g| g / dv.fat_g * 100.0),
            carbs: macros.carbs.map(|g| g / dv.carbs_g * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    pub image: String,
    pub is_bookmarked: bool,
    pub meal_type: Vec<String>,
    pub cuisine: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub prep_time: Measure<u32>,
    pub servings: Measure<u32>,
    pub macros: Macros,
    pub micronutrients: Micronutrients,
    pub caloric_breakdown: CaloricBreakdown,
    pub daily_values: DailyValuePercents,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub num_missing_ingredients: Measure<u32>,
    pub origin: Origin,
}

impl Recipe {
    /// Multiplies every ingredient quantity and nutrient amount by `ratio`, then
    /// re-derives the daily-value percentages. Servings are left to the caller.
    pub(crate) fn scale_amounts(&mut self, ratio: f64, dv: &DailyValues) {
        for ingredient in &mut self.ingredients {
            ingredient.quantity *= ratio;
        }
        self.macros.scale(ratio);
        self.micronutrients.scale(ratio);
        self.refresh_daily_values(dv);
    }

    pub fn refresh_daily_values(&mut self, dv: &DailyValues) {
        self.daily_values = DailyValuePercents::from_macros(&self.macros, dv);
    }

    /// Copies the serving-dependent fields of `other` onto this recipe.
    pub(crate) fn copy_servings_from(&mut self, other: &Recipe) {
        self.servings = other.servings;
        self.ingredients.clone_from(&other.ingredients);
        self.macros = other.macros;
        self.micronutrients = other.micronutrients;
        self.daily_values = other.daily_values;
    }

    pub fn missing_ingredient_count(&self) -> u32 {
        self.ingredients
            .iter()
            .filter(|ingredient| ingredient.availability.is_missing())
            .count() as u32
    }
}

/// User-supplied nutrition for custom recipes and meal entries. Any field may
/// be left blank.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionInput {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fats: Option<f64>,
    pub carbs: Option<f64>,
}

impl NutritionInput {
    fn to_macros(self) -> Macros {
        Macros {
            calories: Measure::from_finite(self.calories),
            protein: Measure::from_finite(self.protein),
            fats: Measure::from_finite(self.fats),
            carbs: Measure::from_finite(self.carbs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientInput {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
}

/// Everything a user provides when authoring a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomRecipeInput {
    pub title: String,
    pub image: Option<String>,
    pub servings: u32,
    pub prep_time: Option<u32>,
    pub ingredients: Vec<IngredientInput>,
    pub instructions: Vec<String>,
    pub nutrition: NutritionInput,
}

pub const CUSTOM_INGREDIENT_CATEGORY: &str = "Custom";

impl Recipe {
    /// A user-authored recipe; lands in the recipe book bookmarked.
    pub fn user_recipe(id: u64, input: CustomRecipeInput, dv: &DailyValues) -> Self {
        let macros = input.nutrition.to_macros();
        let ingredients = input
            .ingredients
            .into_iter()
            .map(|ingredient| Ingredient {
                quantity: ingredient.quantity,
                unit: ingredient.unit,
                name: ingredient.name,
                category: CUSTOM_INGREDIENT_CATEGORY.to_string(),
                availability: Availability::Unavailable,
            })
            .collect();

        Self {
            id,
            title: input.title.trim().to_string(),
            image: input.image.unwrap_or_default(),
            is_bookmarked: true,
            meal_type: Vec::new(),
            cuisine: Vec::new(),
            dietary_restrictions: Vec::new(),
            prep_time: input.prep_time.map_or(Measure::Unavailable, Measure::Known),
            servings: Measure::Known(input.servings),
            caloric_breakdown: CaloricBreakdown::from_macros(&macros),
            daily_values: DailyValuePercents::from_macros(&macros, dv),
            macros,
            micronutrients: Micronutrients::default(),
            ingredients,
            instructions: input.instructions,
            num_missing_ingredients: Measure::NotApplicable,
            origin: Origin::User,
        }
    }

    /// A free-form meal-plan entry ("Leftovers", "Dinner out"). Not scalable.
    pub fn custom_meal_entry(id: u64, title: &str, nutrition: NutritionInput, dv: &DailyValues) -> Self {
        let macros = nutrition.to_macros();
        Self {
            id,
            title: title.trim().to_string(),
            image: String::new(),
            is_bookmarked: false,
            meal_type: Vec::new(),
            cuisine: Vec::new(),
            dietary_restrictions: Vec::new(),
            prep_time: Measure::Unavailable,
            servings: Measure::Unavailable,
            caloric_breakdown: CaloricBreakdown::from_macros(&macros),
            daily_values: DailyValuePercents::from_macros(&macros, dv),
            macros,
            micronutrients: Micronutrients::default(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            num_missing_ingredients: Measure::NotApplicable,
            origin: Origin::CustomMealEntry,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A two-serving app recipe with round numbers.
    pub fn sample_recipe(id: u64) -> Recipe {
        let macros = Macros {
            calories: Measure::Known(800.0),
            protein: Measure::Known(40.0),
            fats: Measure::Known(30.0),
            carbs: Measure::Known(90.0),
        };
        Recipe {
            id,
            title: format!("Recipe {id}"),
            image: format!("https://img.example/{id}.jpg"),
            is_bookmarked: false,
            meal_type: vec!["main course".to_string()],
            cuisine: vec!["italian".to_string()],
            dietary_restrictions: Vec::new(),
            prep_time: Measure::Known(30),
            servings: Measure::Known(2),
            macros,
            micronutrients: Micronutrients {
                sodium: Measure::Known(1200.0),
                fiber: Measure::Known(8.0),
                ..Default::default()
            },
            caloric_breakdown: CaloricBreakdown::from_macros(&macros),
            daily_values: DailyValuePercents::from_macros(&macros, &DailyValues::default()),
            ingredients: vec![
                Ingredient {
                    quantity: 200.0,
                    unit: "g".to_string(),
                    name: "pasta".to_string(),
                    category: "Pasta and Rice".to_string(),
                    availability: Availability::Unavailable,
                },
                Ingredient {
                    quantity: 3.0,
                    unit: "".to_string(),
                    name: "tomato".to_string(),
                    category: "Produce".to_string(),
                    availability: Availability::Unavailable,
                },
            ],
            instructions: vec!["Boil pasta.".to_string(), "Add sauce.".to_string()],
            num_missing_ingredients: Measure::NotApplicable,
            origin: Origin::App,
        }
    }
}
