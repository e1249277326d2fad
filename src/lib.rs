pub mod api_connection;
pub mod app;
pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod meal_plan;
pub mod pantry;
pub mod recipe;
pub mod search;
pub mod servings;
pub mod state;
pub mod storage;
pub mod utils;
