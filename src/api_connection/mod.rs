pub mod connection;
pub mod endpoints;

pub use connection::{with_timeout, ApiConnectionError, RecipeProvider};
pub use endpoints::{Provider, RawRecipe, SearchEndpoint};
