use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Environment variable names
pub const API_KEY_ENV_VAR: &str = "SPOONACULAR_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "RECIPE_API_BASE_URL";
pub const RESULTS_PER_SEARCH_ENV_VAR: &str = "RECIPE_RESULTS_PER_SEARCH";
pub const LOW_CALORIE_ENV_VAR: &str = "LOW_CALORIE_THRESHOLD";
pub const HIGH_PROTEIN_ENV_VAR: &str = "HIGH_PROTEIN_THRESHOLD";
pub const DATA_DIR_ENV_VAR: &str = "MEAL_PLANNER_DATA_DIR";

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_DATA_DIR: &str = ".meal-planner";

/// Recommended daily values used for the %DV bars (grams).
pub const DV_PROTEIN_G: f64 = 50.0;
pub const DV_FAT_G: f64 = 78.0;
pub const DV_CARBS_G: f64 = 275.0;

pub const MIN_SERVINGS: u32 = 1;
pub const MAX_SERVINGS: u32 = 50;

pub const PANTRY_CAPACITY: usize = 25;
pub const INGREDIENT_MIN_LEN: usize = 2;
pub const INGREDIENT_MAX_LEN: usize = 40;

/// Weeks kept on either side of the current week.
pub const WEEKS_AROUND_TODAY: i64 = 4;

pub const TIMEOUT_MESSAGE: &str =
    "The request took too long to respond. Please check your connection and try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const NO_RESULTS_MESSAGE: &str = "No recipes found. Try different ingredients or filters.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyValues {
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

impl Default for DailyValues {
    fn default() -> Self {
        Self {
            protein_g: DV_PROTEIN_G,
            fat_g: DV_FAT_G,
            carbs_g: DV_CARBS_G,
        }
    }
}

/// Upper bound for each network-dependent operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeouts {
    pub id_search: Duration,
    pub detail_fetch: Duration,
    pub autocomplete: Duration,
    pub ingredient_validation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            id_search: Duration::from_secs(3),
            detail_fetch: Duration::from_secs(5),
            autocomplete: Duration::from_secs(2),
            ingredient_validation: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the environment variable holding the API key. The key itself is
    /// read at call time so a missing key surfaces as an API error.
    pub api_key_env_var: String,
    pub base_url: String,
    pub results_per_search: u32,
    pub low_calorie_threshold: u32,
    pub high_protein_threshold: u32,
    pub data_dir: PathBuf,
    pub daily_values: DailyValues,
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            results_per_search: 10,
            low_calorie_threshold: 500,
            high_protein_threshold: 25,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            daily_values: DailyValues::default(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment, loading `.env` first.
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            base_url: env::var(BASE_URL_ENV_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            results_per_search: parse_env(RESULTS_PER_SEARCH_ENV_VAR)
                .unwrap_or(defaults.results_per_search),
            low_calorie_threshold: parse_env(LOW_CALORIE_ENV_VAR)
                .unwrap_or(defaults.low_calorie_threshold),
            high_protein_threshold: parse_env(HIGH_PROTEIN_ENV_VAR)
                .unwrap_or(defaults.high_protein_threshold),
            data_dir: env::var(DATA_DIR_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            daily_values: defaults.daily_values,
            timeouts: defaults.timeouts,
        }
    }
}

fn parse_env(name: &str) -> Option<u32> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {name}={raw:?}: not a positive integer");
            None
        }
    }
}
