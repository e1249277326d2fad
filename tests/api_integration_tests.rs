use dotenv::dotenv;
use meal_planner::api_connection::{ApiConnectionError, Provider, RecipeProvider, SearchEndpoint};
use meal_planner::config::{Config, API_KEY_ENV_VAR, DEFAULT_BASE_URL, GENERIC_ERROR_MESSAGE};
use meal_planner::search::{convert_raw_recipe, SearchFilters, SearchRequest};
use std::env;

fn setup_test_environment() {
    dotenv().ok();
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = Provider::spoonacular("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ", DEFAULT_BASE_URL);
    let result = provider.autocomplete_ingredients("tomato", 5).await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(err @ ApiConnectionError::MissingApiKey(_)) = result {
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        if let ApiConnectionError::MissingApiKey(key_name) = err {
            assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_successful_ingredient_search() {
    setup_test_environment();
    if env::var(API_KEY_ENV_VAR).is_err() {
        println!("Skipping test_successful_ingredient_search: {API_KEY_ENV_VAR} not set.");
        return;
    }

    let config = Config::from_env();
    let provider = Provider::spoonacular(API_KEY_ENV_VAR, &config.base_url);
    let request = SearchRequest::ByIngredients(vec!["tomato".to_string(), "pasta".to_string()]);
    let ids = provider
        .search_ids(request.endpoint(), &request.query_params(&config))
        .await;
    assert!(ids.is_ok(), "API call failed: {:?}", ids.err());
    let ids = ids.unwrap();
    assert!(!ids.is_empty());

    let details = provider.recipe_details(&ids[..ids.len().min(3)]).await;
    assert!(details.is_ok(), "API call failed: {:?}", details.err());
    let converted = details
        .unwrap()
        .iter()
        .filter_map(|raw| convert_raw_recipe(raw, &config.daily_values).ok())
        .count();
    assert!(converted > 0, "no returned recipe passed validation");
}

#[tokio::test]
#[ignore]
async fn test_successful_browse_search() {
    setup_test_environment();
    if env::var(API_KEY_ENV_VAR).is_err() {
        println!("Skipping test_successful_browse_search: {API_KEY_ENV_VAR} not set.");
        return;
    }

    let config = Config::from_env();
    let provider = Provider::spoonacular(API_KEY_ENV_VAR, &config.base_url);
    let request = SearchRequest::Browse {
        query: Some("soup".to_string()),
        filters: SearchFilters {
            cuisine: Some("thai".to_string()),
            ..Default::default()
        },
    };
    let ids = provider
        .search_ids(SearchEndpoint::ComplexSearch, &request.query_params(&config))
        .await;
    assert!(ids.is_ok(), "API call failed: {:?}", ids.err());
}

#[tokio::test]
#[ignore]
async fn test_api_error_with_invalid_key() {
    setup_test_environment();

    const INVALID_KEY_ENV_NAME_FOR_THIS_TEST: &str = "ENV_VAR_WITH_BAD_SPOONACULAR_KEY";
    unsafe {
        std::env::set_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST, "this_is_a_deliberately_bad_api_key");
    }

    let provider = Provider::spoonacular(INVALID_KEY_ENV_NAME_FOR_THIS_TEST, DEFAULT_BASE_URL);
    let result = provider.autocomplete_recipes("pasta", 5).await;
    match result {
        Err(ApiConnectionError::ApiError { status, error_body }) => {
            println!("Received expected API error. Status: {status}, Body: {error_body}");
            assert!(status.is_client_error());
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }

    unsafe {
        std::env::remove_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    }
}
