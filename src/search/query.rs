use std::fmt;
use std::str::FromStr;

use crate::api_connection::SearchEndpoint;
use crate::config::Config;
use crate::state::BrowsingSource;

/// Filter values that mean "no preference" and are never sent.
const DEFAULT_FILTER_VALUES: &[&str] = &["", "any", "all", "none"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroConstraint {
    LowCalorie,
    HighProtein,
}

impl FromStr for MacroConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "low-calorie" => Ok(MacroConstraint::LowCalorie),
            "high-protein" => Ok(MacroConstraint::HighProtein),
            other => Err(format!("unknown macro filter {other:?} (expected low-calorie or high-protein)")),
        }
    }
}

impl fmt::Display for MacroConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MacroConstraint::LowCalorie => "low-calorie",
            MacroConstraint::HighProtein => "high-protein",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub macro_constraint: Option<MacroConstraint>,
    /// Course / meal type, e.g. "breakfast" or "main course".
    pub course: Option<String>,
    pub max_prep_time: Option<u32>,
}

/// What drives a search: pantry ingredients, or a free-text query with filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    ByIngredients(Vec<String>),
    Browse {
        query: Option<String>,
        filters: SearchFilters,
    },
}

fn chosen(value: &Option<String>) -> Option<String> {
    let value = value.as_deref()?.trim();
    if DEFAULT_FILTER_VALUES.contains(&value.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(value.to_string())
    }
}

impl SearchRequest {
    pub fn endpoint(&self) -> SearchEndpoint {
        match self {
            SearchRequest::ByIngredients(_) => SearchEndpoint::FindByIngredients,
            SearchRequest::Browse { .. } => SearchEndpoint::ComplexSearch,
        }
    }

    /// The state collection the converted results land in.
    pub fn results_source(&self) -> BrowsingSource {
        match self {
            SearchRequest::ByIngredients(_) => BrowsingSource::IngredientSearch,
            SearchRequest::Browse { .. } => BrowsingSource::BrowseSearch,
        }
    }

    /// Query parameters for the identifier search. Filters left at their
    /// default are omitted.
    pub fn query_params(&self, config: &Config) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        match self {
            SearchRequest::ByIngredients(ingredients) => {
                params.push(("ingredients", ingredients.join(",")));
                // Rank by fewest missing ingredients.
                params.push(("ranking", "2".to_string()));
                params.push(("ignorePantry", "true".to_string()));
            }
            SearchRequest::Browse { query, filters } => {
                if let Some(query) = chosen(query) {
                    params.push(("query", query));
                }
                if let Some(cuisine) = chosen(&filters.cuisine) {
                    params.push(("cuisine", cuisine));
                }
                if let Some(diet) = chosen(&filters.diet) {
                    params.push(("diet", diet));
                }
                if let Some(course) = chosen(&filters.course) {
                    params.push(("type", course));
                }
                if let Some(minutes) = filters.max_prep_time.filter(|m| *m > 0) {
                    params.push(("maxReadyTime", minutes.to_string()));
                }
                match filters.macro_constraint {
                    Some(MacroConstraint::LowCalorie) => {
                        params.push(("maxCalories", config.low_calorie_threshold.to_string()))
                    }
                    Some(MacroConstraint::HighProtein) => {
                        params.push(("minProtein", config.high_protein_threshold.to_string()))
                    }
                    None => {}
                }
            }
        }
        params.push(("number", config.results_per_search.to_string()));
        params
    }
}
