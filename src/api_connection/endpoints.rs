use reqwest::Client;
use serde::{Deserialize, Deserializer};

pub const FIND_BY_INGREDIENTS_PATH: &str = "/recipes/findByIngredients";
pub const COMPLEX_SEARCH_PATH: &str = "/recipes/complexSearch";
pub const INFORMATION_BULK_PATH: &str = "/recipes/informationBulk";
pub const INGREDIENT_AUTOCOMPLETE_PATH: &str = "/food/ingredients/autocomplete";
pub const RECIPE_AUTOCOMPLETE_PATH: &str = "/recipes/autocomplete";

#[derive(Clone, Debug)]
pub enum Provider {
    Spoonacular {
        /// Name of the environment variable holding the key, not the key itself.
        api_key_env_var: String,
        base_url: String,
        client: Client,
    },
}

/// The two identifier-search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEndpoint {
    FindByIngredients,
    ComplexSearch,
}

impl SearchEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            SearchEndpoint::FindByIngredients => FIND_BY_INGREDIENTS_PATH,
            SearchEndpoint::ComplexSearch => COMPLEX_SEARCH_PATH,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One hit from either identifier search.
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeHit {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ComplexSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RecipeHit>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

/// A recipe as returned by the bulk-information endpoint. Every field is
/// optional here; validation decides what is usable.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipe {
    #[serde(default)]
    pub id: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub servings: Option<f64>,
    #[serde(default)]
    pub ready_in_minutes: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dish_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub diets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extended_ingredients: Vec<RawIngredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analyzed_instructions: Vec<RawInstructionBlock>,
    #[serde(default)]
    pub nutrition: Option<RawNutrition>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawIngredient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_clean: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub aisle: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawInstructionBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawStep {
    #[serde(default)]
    pub step: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawNutrition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nutrients: Vec<RawNutrient>,
    #[serde(default)]
    pub caloric_breakdown: Option<RawCaloricBreakdown>,
}

/// Nutrient amounts are per serving.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawNutrient {
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCaloricBreakdown {
    #[serde(default)]
    pub percent_protein: Option<f64>,
    #[serde(default)]
    pub percent_fat: Option<f64>,
    #[serde(default)]
    pub percent_carbs: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IngredientSuggestion {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RecipeSuggestion {
    pub id: u64,
    pub title: String,
}
