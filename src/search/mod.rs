pub mod convert;
pub mod engine;
pub mod query;
pub mod validation;

pub use convert::convert_raw_recipe;
pub use engine::{run_search, SearchOutcome};
pub use query::{MacroConstraint, SearchFilters, SearchRequest};
pub use validation::Rejection;
