//! Pantry contents and ingredient availability.

use thiserror::Error;

use crate::config::{INGREDIENT_MAX_LEN, INGREDIENT_MIN_LEN, PANTRY_CAPACITY};
use crate::recipe::{Availability, Recipe};
use crate::utils::normalize_ingredient_name;

/// Staples assumed to be in every kitchen.
pub const HOUSEHOLD_STAPLES: &[&str] = &[
    "water",
    "salt",
    "pepper",
    "black pepper",
    "salt and pepper",
    "oil",
    "olive oil",
    "vegetable oil",
    "cooking spray",
    "sugar",
    "flour",
    "all purpose flour",
    "butter",
    "ice",
    "baking soda",
    "baking powder",
];

/// Names that refer to the same ingredient.
pub const SYNONYM_GROUPS: &[&[&str]] = &[
    &["scallion", "green onion", "spring onion"],
    &["cilantro", "coriander"],
    &["garbanzo bean", "chickpea"],
    &["bell pepper", "capsicum", "sweet pepper"],
    &["zucchini", "courgette"],
    &["eggplant", "aubergine"],
    &["shrimp", "prawn"],
    &["ground beef", "minced beef", "beef mince"],
    &["powdered sugar", "icing sugar", "confectioners sugar"],
    &["heavy cream", "double cream", "whipping cream"],
    &["arugula", "rocket"],
    &["rutabaga", "swede"],
    &["cornstarch", "cornflour", "corn starch"],
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PantryError {
    #[error("Please enter an ingredient")]
    Empty,
    #[error("Ingredients may only contain letters, spaces, hyphens and apostrophes")]
    InvalidCharacters,
    #[error("Ingredients must be between {min} and {max} characters")]
    InvalidLength { min: usize, max: usize },
    #[error("{0} is already in your pantry")]
    Duplicate(String),
    #[error("Your pantry is full ({0} ingredients max)")]
    Full(usize),
    #[error("{0} is not a recognised ingredient")]
    Unrecognized(String),
    #[error("{0} is not in your pantry")]
    NotFound(String),
}

/// Checks the shape of a typed ingredient and returns its normalised form.
pub fn validate_ingredient_input(raw: &str) -> Result<String, PantryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PantryError::Empty);
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
    {
        return Err(PantryError::InvalidCharacters);
    }
    let length = trimmed.chars().count();
    if !(INGREDIENT_MIN_LEN..=INGREDIENT_MAX_LEN).contains(&length) {
        return Err(PantryError::InvalidLength {
            min: INGREDIENT_MIN_LEN,
            max: INGREDIENT_MAX_LEN,
        });
    }
    Ok(normalize_ingredient_name(trimmed))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pantry {
    items: Vec<String>,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks duplicate and capacity rules without modifying the pantry.
    pub fn check_can_add(&self, name: &str) -> Result<String, PantryError> {
        let normalized = validate_ingredient_input(name)?;
        if self.items.contains(&normalized) {
            return Err(PantryError::Duplicate(normalized));
        }
        if self.items.len() >= PANTRY_CAPACITY {
            return Err(PantryError::Full(PANTRY_CAPACITY));
        }
        Ok(normalized)
    }

    /// Adds a normalised ingredient and returns the stored form.
    pub fn add(&mut self, name: &str) -> Result<String, PantryError> {
        let normalized = self.check_can_add(name)?;
        tracing::debug!("Adding {normalized:?} to pantry");
        self.items.push(normalized.clone());
        Ok(normalized)
    }

    pub fn remove(&mut self, name: &str) -> Result<String, PantryError> {
        let normalized = normalize_ingredient_name(name);
        let index = self
            .items
            .iter()
            .position(|item| *item == normalized)
            .ok_or_else(|| PantryError::NotFound(normalized.clone()))?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Resolves how available a recipe ingredient is. First matching rule wins.
    pub fn availability_of(&self, ingredient_name: &str) -> Availability {
        let name = normalize_ingredient_name(ingredient_name);
        if HOUSEHOLD_STAPLES.contains(&name.as_str()) {
            return Availability::HouseholdItem;
        }
        if self.items.iter().any(|item| *item == name) {
            return Availability::DefinitelyAvailable;
        }
        if self.items.iter().any(|item| partial_match(item, &name)) {
            return Availability::PotentiallyAvailable;
        }
        let synonym_in_pantry = SYNONYM_GROUPS
            .iter()
            .filter(|group| group.contains(&name.as_str()))
            .flat_map(|group| group.iter())
            .any(|synonym| self.items.iter().any(|item| partial_match(item, synonym)));
        if synonym_in_pantry {
            return Availability::PotentiallyAvailable;
        }
        Availability::Unavailable
    }

    /// Recomputes every ingredient's availability and the missing count.
    pub fn annotate(&self, recipe: &mut Recipe) {
        for ingredient in &mut recipe.ingredients {
            ingredient.availability = self.availability_of(&ingredient.name);
        }
        recipe.num_missing_ingredients = crate::recipe::Measure::Known(recipe.missing_ingredient_count());
    }
}

fn partial_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
