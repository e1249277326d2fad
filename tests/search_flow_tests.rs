mod common;

use std::time::Duration;

use common::{app_with, raw_recipe, FakeProvider};
use meal_planner::api_connection::SearchEndpoint;
use meal_planner::autocomplete::IngredientCheckError;
use meal_planner::config::TIMEOUT_MESSAGE;
use meal_planner::pantry::PantryError;
use meal_planner::recipe::Measure;
use meal_planner::search::{SearchFilters, SearchOutcome, SearchRequest};
use meal_planner::servings::ServingsChange;
use meal_planner::state::{BrowsingSource, Location};

fn kitchen() -> FakeProvider {
    let mut provider = FakeProvider::with_recipes(vec![
        raw_recipe(1, "Chicken Saffron Rice", &["chicken", "saffron", "rice"]),
        raw_recipe(2, "Tomato Pasta", &["tomato", "pasta", "salt"]),
        raw_recipe(3, "Pasta Bake", &["pasta", "cheese", "spinach"]),
    ]);
    provider.ingredients = vec!["tomato".to_string(), "pasta".to_string(), "pasta sauce".to_string()];
    provider
}

fn browse(query: &str) -> SearchRequest {
    SearchRequest::Browse {
        query: Some(query.to_string()),
        filters: SearchFilters::default(),
    }
}

fn ids(recipes: &[meal_planner::recipe::Recipe]) -> Vec<u64> {
    recipes.iter().map(|recipe| recipe.id).collect()
}

#[tokio::test]
async fn pantry_search_ranks_by_fewest_missing_ingredients() {
    let mut app = app_with(kitchen());
    assert_eq!(app.add_pantry_ingredient("Tomatoes").await.unwrap(), "tomato");
    assert_eq!(app.add_pantry_ingredient("pasta").await.unwrap(), "pasta");

    let outcome = app.search_pantry().await.unwrap();
    assert_eq!(outcome, SearchOutcome::Found(3));

    let results = &app.state.ingredient_search_results;
    assert_eq!(ids(results), vec![2, 3, 1]);
    assert_eq!(results[0].num_missing_ingredients, Measure::Known(0));
    assert_eq!(results[1].num_missing_ingredients, Measure::Known(2));
    assert_eq!(results[2].num_missing_ingredients, Measure::Known(3));

    let last_search = app.provider().last_search.borrow().clone();
    let (endpoint, params) = last_search.unwrap();
    assert_eq!(endpoint, SearchEndpoint::FindByIngredients);
    assert!(params.contains(&("ingredients", "tomato,pasta".to_string())));
}

#[tokio::test]
async fn browse_results_have_no_missing_count_without_a_pantry() {
    let mut app = app_with(kitchen());
    app.search(&browse("pasta")).await.unwrap();

    let results = &app.state.browse_search_results;
    assert_eq!(results.len(), 3);
    assert!(results
        .iter()
        .all(|recipe| recipe.num_missing_ingredients == Measure::NotApplicable));
    // Browse results keep the provider's order.
    assert_eq!(ids(results), vec![1, 2, 3]);
    assert!(app.state.ingredient_search_results.is_empty());
}

#[tokio::test]
async fn converted_results_carry_totals_for_all_servings() {
    let mut app = app_with(kitchen());
    app.search(&browse("pasta")).await.unwrap();

    let recipe = &app.state.browse_search_results[1];
    assert_eq!(recipe.title, "Tomato Pasta");
    assert_eq!(recipe.servings, Measure::Known(2));
    assert_eq!(recipe.macros.calories, Measure::Known(800.0));
    assert_eq!(recipe.macros.protein, Measure::Known(40.0));
    assert_eq!(recipe.daily_values.protein, Measure::Known(80.0));
    assert_eq!(recipe.instructions, vec!["Cook everything.".to_string()]);
    assert!(recipe.dietary_restrictions.is_empty());
}

#[tokio::test]
async fn empty_search_clears_previous_results() {
    let mut app = app_with(kitchen());
    app.search(&browse("pasta")).await.unwrap();
    assert_eq!(app.state.browse_search_results.len(), 3);

    app.provider().hits.borrow_mut().clear();
    let outcome = app.search(&browse("nothing")).await.unwrap();
    assert_eq!(outcome, SearchOutcome::NoResults);
    assert!(app.state.browse_search_results.is_empty());
    // No ids means no detail fetch.
    assert_eq!(app.provider().detail_calls.get(), 1);
}

#[tokio::test]
async fn unusable_recipes_are_dropped() {
    let mut broken = raw_recipe(4, "No Steps", &["rice"]);
    broken.analyzed_instructions.clear();
    let mut untitled = raw_recipe(5, "", &["rice"]);
    untitled.title = None;
    let provider = FakeProvider::with_recipes(vec![broken, raw_recipe(6, "Fried Rice", &["rice"]), untitled]);
    let mut app = app_with(provider);

    let outcome = app.search(&browse("rice")).await.unwrap();
    assert_eq!(outcome, SearchOutcome::Found(1));
    assert_eq!(ids(&app.state.browse_search_results), vec![6]);
}

#[tokio::test]
async fn recipes_serving_more_than_fifty_are_dropped() {
    let mut party = raw_recipe(8, "Party Chili", &["bean"]);
    party.servings = Some(60.0);
    let provider = FakeProvider::with_recipes(vec![party, raw_recipe(9, "Bean Salad", &["bean"])]);
    let mut app = app_with(provider);

    let outcome = app.search(&browse("bean")).await.unwrap();
    assert_eq!(outcome, SearchOutcome::Found(1));
    assert_eq!(ids(&app.state.browse_search_results), vec![9]);
}

#[tokio::test]
async fn duplicate_ids_are_fetched_once() {
    let provider = kitchen();
    provider.hits.replace(vec![2, 2, 3, 2]);
    let mut app = app_with(provider);

    app.search(&browse("pasta")).await.unwrap();
    assert_eq!(ids(&app.state.browse_search_results), vec![2, 3]);
}

#[tokio::test]
async fn recipe_book_copy_replaces_fresh_result() {
    let mut app = app_with(kitchen());
    app.search(&browse("pasta")).await.unwrap();

    let browse_results = Location::Browsing(BrowsingSource::BrowseSearch);
    assert!(app.toggle_bookmark(2, browse_results).unwrap());
    let book = Location::Browsing(BrowsingSource::RecipeBook);
    app.adjust_servings(2, book, ServingsChange::Set(4)).unwrap();

    app.search(&browse("pasta")).await.unwrap();
    let reused = app
        .state
        .find(2, browse_results)
        .expect("recipe 2 is in the results");
    assert!(reused.is_bookmarked);
    assert_eq!(reused.servings, Measure::Known(4));
    assert_eq!(reused.macros.calories, Measure::Known(1600.0));

    let fresh = app.state.find(3, browse_results).unwrap();
    assert!(!fresh.is_bookmarked);
}

#[tokio::test]
async fn slow_provider_times_out_with_a_friendly_message() {
    let mut provider = kitchen();
    provider.delay = Some(Duration::from_millis(200));
    let mut app = app_with(provider);
    app.config.timeouts.id_search = Duration::from_millis(10);

    let err = app.search(&browse("pasta")).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.user_message(), TIMEOUT_MESSAGE);
    assert!(app.state.browse_search_results.is_empty());
    assert_eq!(app.provider().detail_calls.get(), 0);
}

#[tokio::test]
async fn unknown_ingredients_are_not_added_to_the_pantry() {
    let mut app = app_with(kitchen());

    let err = app.add_pantry_ingredient("dragonfruit").await.unwrap_err();
    assert!(matches!(
        err,
        IngredientCheckError::Invalid(PantryError::Unrecognized(ref name)) if name == "dragonfruit"
    ));

    let err = app.add_pantry_ingredient("tomato 2").await.unwrap_err();
    assert!(matches!(err, IngredientCheckError::Invalid(PantryError::InvalidCharacters)));

    app.add_pantry_ingredient("tomato").await.unwrap();
    let err = app.add_pantry_ingredient("Tomatoes").await.unwrap_err();
    assert!(matches!(err, IngredientCheckError::Invalid(PantryError::Duplicate(_))));
    assert_eq!(app.state.pantry.items(), ["tomato".to_string()]);
}

#[tokio::test]
async fn recipe_suggestions_need_two_characters() {
    let mut provider = kitchen();
    provider.titles = vec![(2, "Tomato Pasta".to_string()), (3, "Pasta Bake".to_string())];
    let app = app_with(provider);

    assert!(app.suggest_recipes("p").await.unwrap().is_empty());
    let suggestions = app.suggest_recipes("pasta").await.unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[1], (3, "Pasta Bake".to_string()));

    let names = app.suggest_ingredients("pas").await.unwrap();
    assert_eq!(names, vec!["pasta".to_string(), "pasta sauce".to_string()]);
}
