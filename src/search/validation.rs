use thiserror::Error;

use crate::api_connection::RawRecipe;
use crate::config::{MAX_SERVINGS, MIN_SERVINGS};

pub const PROTEIN: &str = "Protein";
pub const FAT: &str = "Fat";
pub const CARBOHYDRATES: &str = "Carbohydrates";

/// Why a raw recipe was dropped from the results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing title")]
    MissingTitle,
    #[error("missing or non-numeric id")]
    InvalidId,
    #[error("missing or out-of-range serving count")]
    InvalidServings,
    #[error("no instruction steps")]
    NoInstructions,
    #[error("no ingredients")]
    NoIngredients,
    #[error("missing {0} amount")]
    MissingNutrient(&'static str),
    #[error("missing caloric breakdown")]
    MissingCaloricBreakdown,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Per-serving amount of the named nutrient, if present and finite.
pub fn nutrient_amount(raw: &RawRecipe, name: &str) -> Option<f64> {
    raw.nutrition
        .as_ref()?
        .nutrients
        .iter()
        .find(|nutrient| nutrient.name.eq_ignore_ascii_case(name))
        .and_then(|nutrient| finite(nutrient.amount))
}

/// The id as an integer, if the raw value is a finite non-negative whole number.
pub fn recipe_id(raw: &RawRecipe) -> Option<u64> {
    finite(raw.id)
        .filter(|id| *id >= 0.0 && id.fract() == 0.0)
        .map(|id| id as u64)
}

/// Checks that a raw recipe carries everything the app displays.
pub fn validate(raw: &RawRecipe) -> Result<u64, Rejection> {
    if raw.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(Rejection::MissingTitle);
    }
    let id = recipe_id(raw).ok_or(Rejection::InvalidId)?;
    let servings_allowed = f64::from(MIN_SERVINGS)..=f64::from(MAX_SERVINGS);
    if finite(raw.servings).map_or(true, |s| s < 1.0 || !servings_allowed.contains(&s.round())) {
        return Err(Rejection::InvalidServings);
    }
    let has_steps = raw
        .analyzed_instructions
        .iter()
        .flat_map(|block| &block.steps)
        .any(|step| !step.step.trim().is_empty());
    if !has_steps {
        return Err(Rejection::NoInstructions);
    }
    if raw.extended_ingredients.is_empty() {
        return Err(Rejection::NoIngredients);
    }
    for name in [PROTEIN, FAT, CARBOHYDRATES] {
        if nutrient_amount(raw, name).is_none() {
            return Err(Rejection::MissingNutrient(name));
        }
    }
    let breakdown = raw
        .nutrition
        .as_ref()
        .and_then(|nutrition| nutrition.caloric_breakdown.as_ref())
        .ok_or(Rejection::MissingCaloricBreakdown)?;
    if [breakdown.percent_protein, breakdown.percent_fat, breakdown.percent_carbs]
        .into_iter()
        .any(|percent| finite(percent).is_none())
    {
        return Err(Rejection::MissingCaloricBreakdown);
    }
    Ok(id)
}


#[cfg(test)]
mod tests {
    use super::fixtures::raw_recipe;
    use super::*;

    #[test]
    fn complete_recipe_passes() {
        assert_eq!(validate(&raw_recipe(5, &["rice"])), Ok(5));
    }

    #[test]
    fn each_required_field_is_checked() {
        let mut raw = raw_recipe(1, &["rice"]);
        raw.title = Some("  ".to_string());
        assert_eq!(validate(&raw), Err(Rejection::MissingTitle));

        let mut raw = raw_recipe(1, &["rice"]);
        raw.id = Some(f64::NAN);
        assert_eq!(validate(&raw), Err(Rejection::InvalidId));

        let mut raw = raw_recipe(1, &["rice"]);
        raw.servings = None;
        assert_eq!(validate(&raw), Err(Rejection::InvalidServings));

        let mut raw = raw_recipe(1, &["rice"]);
        raw.servings = Some(60.0);
        assert_eq!(validate(&raw), Err(Rejection::InvalidServings));

        let mut raw = raw_recipe(1, &["rice"]);
        raw.servings = Some(50.0);
        assert_eq!(validate(&raw), Ok(1));

        let mut raw = raw_recipe(1, &["rice"]);
        raw.analyzed_instructions.clear();
        assert_eq!(validate(&raw), Err(Rejection::NoInstructions));

        let raw = raw_recipe(1, &[]);
        assert_eq!(validate(&raw), Err(Rejection::NoIngredients));

        let mut raw = raw_recipe(1, &["rice"]);
        if let Some(nutrition) = raw.nutrition.as_mut() {
            nutrition.nutrients.retain(|n| n.name != "Fat");
        }
        assert_eq!(validate(&raw), Err(Rejection::MissingNutrient(FAT)));

        let mut raw = raw_recipe(1, &["rice"]);
        if let Some(breakdown) = raw.nutrition.as_mut().and_then(|n| n.caloric_breakdown.as_mut()) {
            breakdown.percent_carbs = Some(f64::INFINITY);
        }
        assert_eq!(validate(&raw), Err(Rejection::MissingCaloricBreakdown));
    }
}
