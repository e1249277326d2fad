use super::validation::{nutrient_amount, validate, Rejection, CARBOHYDRATES, FAT, PROTEIN};
use crate::api_connection::RawRecipe;
use crate::config::DailyValues;
use crate::recipe::{
    Availability, CaloricBreakdown, DailyValuePercents, Ingredient, Macros, Measure, Micronutrients,
    Origin, Recipe,
};

const UNCATEGORIZED: &str = "Other";

/// Validates and converts a raw API recipe. Nutrient values are stored as
/// totals for the whole serving count.
pub fn convert_raw_recipe(raw: &RawRecipe, dv: &DailyValues) -> Result<Recipe, Rejection> {
    let id = validate(raw)?;
    let servings_f = raw.servings.unwrap_or(1.0).round();
    let servings = servings_f as u32;

    let total = |name: &str| Measure::from_finite(nutrient_amount(raw, name).map(|a| a * servings_f));

    let macros = Macros {
        calories: total("Calories"),
        protein: total(PROTEIN),
        fats: total(FAT),
        carbs: total(CARBOHYDRATES),
    };
    let micronutrients = Micronutrients {
        saturated_fat: total("Saturated Fat"),
        sugar: total("Sugar"),
        fiber: total("Fiber"),
        sodium: total("Sodium"),
        cholesterol: total("Cholesterol"),
        iron: total("Iron"),
        zinc: total("Zinc"),
        calcium: total("Calcium"),
        magnesium: total("Magnesium"),
    };
    let caloric_breakdown = raw
        .nutrition
        .as_ref()
        .and_then(|nutrition| nutrition.caloric_breakdown.as_ref())
        .map(|breakdown| CaloricBreakdown {
            percent_protein: Measure::from_finite(breakdown.percent_protein),
            percent_fats: Measure::from_finite(breakdown.percent_fat),
            percent_carbs: Measure::from_finite(breakdown.percent_carbs),
        })
        .unwrap_or_default();

    let ingredients = raw
        .extended_ingredients
        .iter()
        .map(|ingredient| Ingredient {
            quantity: ingredient.amount.filter(|a| a.is_finite()).unwrap_or(0.0),
            unit: ingredient.unit.clone().unwrap_or_default(),
            name: ingredient
                .name_clean
                .as_deref()
                .or(ingredient.name.as_deref())
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            category: ingredient
                .aisle
                .clone()
                .filter(|aisle| !aisle.trim().is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            availability: Availability::Unavailable,
        })
        .collect();

    let instructions = raw
        .analyzed_instructions
        .iter()
        .flat_map(|block| &block.steps)
        .map(|step| step.step.trim())
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect();

    let prep_time = raw
        .ready_in_minutes
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
        .map_or(Measure::Unavailable, |minutes| Measure::Known(minutes.round() as u32));

    Ok(Recipe {
        id,
        title: raw.title.as_deref().unwrap_or_default().trim().to_string(),
        image: raw.image.clone().unwrap_or_default(),
        is_bookmarked: false,
        meal_type: raw.dish_types.clone(),
        cuisine: raw.cuisines.clone(),
        dietary_restrictions: raw.diets.clone(),
        prep_time,
        servings: Measure::Known(servings),
        daily_values: DailyValuePercents::from_macros(&macros, dv),
        macros,
        micronutrients,
        caloric_breakdown,
        ingredients,
        instructions,
        num_missing_ingredients: Measure::NotApplicable,
        origin: Origin::App,
    })
}
