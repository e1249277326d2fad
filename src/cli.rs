use std::path::PathBuf;

mod render;
mod session;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Subcommand, ValueEnum};

use crate::api_connection::{ApiConnectionError, Provider, RecipeProvider};
use crate::app::{App, AppError};
use crate::autocomplete::IngredientCheckError;
use crate::config::{Config, MIN_SERVINGS, NO_RESULTS_MESSAGE};
use crate::meal_plan::{MealSlot, SlotOperation, SlotRef};
use crate::recipe::{CustomRecipeInput, IngredientInput, NutritionInput};
use crate::search::{MacroConstraint, SearchFilters, SearchOutcome, SearchRequest};
use crate::servings::ServingsChange;
use crate::state::{BrowsingSource, Location};
use crate::storage::{FileStorage, Storage};
use crate::utils::DateKey;

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    s.parse::<DateKey>()
        .map(|key| key.date())
        .map_err(|e| format!("{e} (expected e.g. 2025-01-20 or \"Mon Jan 20 2025\")"))
}

fn parse_servings_change(s: &str) -> Result<ServingsChange, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "up" | "inc" | "increase" => Ok(ServingsChange::Increase),
        "down" | "dec" | "decrease" => Ok(ServingsChange::Decrease),
        other => other
            .parse::<u32>()
            .map(ServingsChange::Set)
            .map_err(|_| format!("expected up, down or a number, got {other:?}")),
    }
}

/// `"<quantity> <unit> <name>"`, or `"<quantity> <name>"` for unitless items.
fn parse_ingredient(s: &str) -> Result<IngredientInput, String> {
    let words: Vec<&str> = s.split_whitespace().collect();
    let Some((quantity, rest)) = words.split_first() else {
        return Err("empty ingredient".to_string());
    };
    let quantity: f64 = quantity
        .parse()
        .map_err(|_| format!("ingredient {s:?} must start with a quantity"))?;
    let (unit, name) = match rest {
        [] => return Err(format!("ingredient {s:?} has no name")),
        [name] => ("", vec![*name]),
        [unit, name @ ..] => (*unit, name.to_vec()),
    };
    Ok(IngredientInput {
        quantity,
        unit: unit.to_string(),
        name: name.join(" "),
    })
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the saved recipe book and meal plan
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Run a single command. Without one, an interactive session starts.
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let mut config = Config::from_env();
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        let provider = Provider::spoonacular(&config.api_key_env_var, &config.base_url);
        let storage = FileStorage::new(config.data_dir.clone());
        let today = Local::now().date_naive();
        let mut app = App::load(config, provider, storage, today)
            .context("Failed to load the saved recipe book and meal plan")?;

        match self.command {
            Some(command) => command.run(&mut app).await,
            None => session::run(&mut app).await,
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Results of the last ingredient search
    Ingredients,
    /// Results of the last browse search
    Browse,
    /// The recipe book
    Book,
    /// A meal-plan slot (needs --date and --meal)
    Plan,
}

impl SourceArg {
    fn browsing(self) -> Option<BrowsingSource> {
        match self {
            SourceArg::Ingredients => Some(BrowsingSource::IngredientSearch),
            SourceArg::Browse => Some(BrowsingSource::BrowseSearch),
            SourceArg::Book => Some(BrowsingSource::RecipeBook),
            SourceArg::Plan => None,
        }
    }
}

/// Where the recipe is being looked at.
#[derive(Debug, Clone, Args)]
pub struct At {
    #[arg(long, value_enum, default_value_t = SourceArg::Book)]
    from: SourceArg,

    /// Planner date, when --from plan
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Planner meal, when --from plan
    #[arg(long)]
    meal: Option<MealSlot>,
}

impl At {
    fn location(&self) -> anyhow::Result<Location> {
        if let Some(source) = self.from.browsing() {
            return Ok(Location::Browsing(source));
        }
        match (self.date, self.meal) {
            (Some(date), Some(meal)) => Ok(Location::Planner(SlotRef::new(date, meal))),
            _ => anyhow::bail!("--from plan needs both --date and --meal"),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SlotArgs {
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,

    #[arg(long)]
    meal: MealSlot,
}

impl SlotArgs {
    fn slot(&self) -> SlotRef {
        SlotRef::new(self.date, self.meal)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct NutritionArgs {
    #[arg(long)]
    calories: Option<f64>,
    /// Grams of protein
    #[arg(long)]
    protein: Option<f64>,
    /// Grams of fat
    #[arg(long)]
    fats: Option<f64>,
    /// Grams of carbohydrates
    #[arg(long)]
    carbs: Option<f64>,
}

impl From<NutritionArgs> for NutritionInput {
    fn from(args: NutritionArgs) -> Self {
        Self {
            calories: args.calories,
            protein: args.protein,
            fats: args.fats,
            carbs: args.carbs,
        }
    }
}

fn operation(replace: bool) -> SlotOperation {
    if replace {
        SlotOperation::Replace
    } else {
        SlotOperation::Add
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the ingredients on hand for this session
    #[command(subcommand)]
    Pantry(PantryCommand),

    /// Search for recipes
    #[command(subcommand)]
    Search(SearchCommand),

    /// Suggest names for a partial ingredient or recipe title
    #[command(subcommand)]
    Suggest(SuggestCommand),

    /// List the recipes in a collection
    List {
        #[arg(value_enum, default_value_t = SourceArg::Book)]
        source: SourceArg,
    },

    /// Show a recipe in full
    Show {
        id: u64,
        #[command(flatten)]
        at: At,
    },

    /// Bookmark a recipe, or remove the bookmark if it has one
    Bookmark {
        id: u64,
        #[command(flatten)]
        at: At,
    },

    /// Change a recipe's serving count (up, down or an absolute number)
    Servings {
        id: u64,
        #[arg(value_parser = parse_servings_change)]
        change: ServingsChange,
        #[command(flatten)]
        at: At,
    },

    /// Manage the recipe book
    #[command(subcommand)]
    Book(BookCommand),

    /// Work with the weekly meal plan
    #[command(subcommand)]
    Plan(PlanCommand),
}

#[derive(Debug, Subcommand)]
pub enum PantryCommand {
    /// Add ingredients, checking each one is recognised
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove an ingredient
    Remove { name: String },
    /// List the pantry
    List,
    /// Empty the pantry
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum SearchCommand {
    /// Find recipes that use the given ingredients (or the pantry when none are given)
    Ingredients { names: Vec<String> },

    /// Search by free text and filters
    Browse {
        query: Option<String>,
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long)]
        diet: Option<String>,
        /// low-calorie or high-protein
        #[arg(long = "macro")]
        macro_constraint: Option<MacroConstraint>,
        /// Course, e.g. breakfast or "main course"
        #[arg(long)]
        course: Option<String>,
        /// Maximum preparation time in minutes
        #[arg(long)]
        max_prep_time: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SuggestCommand {
    Ingredient { partial: String },
    Recipe { partial: String },
}

#[derive(Debug, Subcommand)]
pub enum BookCommand {
    /// Remove a recipe from the book
    Remove { id: u64 },

    /// Write your own recipe into the book
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = MIN_SERVINGS)]
        servings: u32,
        /// Preparation time in minutes
        #[arg(long)]
        prep_time: Option<u32>,
        #[arg(long)]
        image: Option<String>,
        /// "<quantity> <unit> <name>", repeatable
        #[arg(long = "ingredient", value_parser = parse_ingredient)]
        ingredients: Vec<IngredientInput>,
        /// One instruction step, repeatable
        #[arg(long = "step")]
        steps: Vec<String>,
        #[command(flatten)]
        nutrition: NutritionArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Show the displayed week, or one day
    Show {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Display the following week
    Next,
    /// Display the preceding week
    Prev,

    /// Schedule a recipe from a browsing collection
    Add {
        id: u64,
        #[arg(long, value_enum, default_value_t = SourceArg::Book)]
        from: SourceArg,
        #[command(flatten)]
        to: SlotArgs,
        /// Clear the slot first
        #[arg(long)]
        replace: bool,
        /// Servings to schedule (defaults to the recipe's current count)
        #[arg(long)]
        servings: Option<u32>,
    },

    /// Move a planned recipe to another slot
    Move {
        id: u64,
        #[command(flatten)]
        from: SlotArgs,
        #[arg(long, value_parser = parse_date)]
        to_date: NaiveDate,
        #[arg(long)]
        to_meal: MealSlot,
        #[arg(long)]
        replace: bool,
        #[arg(long)]
        servings: Option<u32>,
    },

    /// Remove a recipe from a slot
    Remove {
        id: u64,
        #[command(flatten)]
        slot: SlotArgs,
    },

    /// Log a meal that is not a recipe
    Entry {
        title: String,
        #[command(flatten)]
        to: SlotArgs,
        #[arg(long)]
        replace: bool,
        #[command(flatten)]
        nutrition: NutritionArgs,
    },
}

/// Prints the user-facing message for a provider failure.
fn report_api_error(err: &ApiConnectionError) {
    tracing::warn!("{err}");
    println!("{}", err.user_message());
}

/// Planner errors are shown to the user; storage failures end the command.
fn report_app_error(err: AppError) -> anyhow::Result<()> {
    match err {
        AppError::Planner(err) => {
            println!("{err}");
            Ok(())
        }
        AppError::Storage(err) => Err(anyhow::Error::new(err).context("Failed to save changes")),
    }
}

impl Command {
    pub async fn run<P: RecipeProvider, S: Storage>(self, app: &mut App<P, S>) -> anyhow::Result<()> {
        match self {
            Self::Pantry(command) => command.run(app).await,
            Self::Search(command) => command.run(app).await,
            Self::Suggest(command) => command.run(app).await,
            Self::List { source } => {
                match source.browsing() {
                    Some(source) => render::recipe_list(&source.to_string(), app.state.collection(source)),
                    None => render::week(&app.state.meal_plan, &app.state.daily_values),
                }
                Ok(())
            }
            Self::Show { id, at } => {
                let location = at.location()?;
                match app.state.find(id, location) {
                    Some(recipe) => render::recipe_detail(recipe),
                    None => println!("Recipe {id} not found"),
                }
                Ok(())
            }
            Self::Bookmark { id, at } => match app.toggle_bookmark(id, at.location()?) {
                Ok(true) => {
                    println!("Saved recipe {id} to the recipe book");
                    Ok(())
                }
                Ok(false) => {
                    println!("Removed recipe {id} from the recipe book");
                    Ok(())
                }
                Err(err) => report_app_error(err),
            },
            Self::Servings { id, change, at } => {
                match app.adjust_servings(id, at.location()?, change) {
                    Ok(outcome) => render::servings_outcome(id, outcome),
                    Err(err) => return report_app_error(err),
                }
                Ok(())
            }
            Self::Book(command) => command.run(app),
            Self::Plan(command) => command.run(app),
        }
    }
}

impl PantryCommand {
    async fn run<P: RecipeProvider, S: Storage>(self, app: &mut App<P, S>) -> anyhow::Result<()> {
        match self {
            Self::Add { names } => {
                for name in names {
                    match app.add_pantry_ingredient(&name).await {
                        Ok(added) => println!("Added {added}"),
                        Err(IngredientCheckError::Invalid(err)) => println!("{err}"),
                        Err(IngredientCheckError::Api(err)) => report_api_error(&err),
                    }
                }
            }
            Self::Remove { name } => match app.remove_pantry_ingredient(&name) {
                Ok(removed) => println!("Removed {removed}"),
                Err(err) => println!("{err}"),
            },
            Self::List => render::pantry(app.state.pantry.items()),
            Self::Clear => {
                app.state.pantry.clear();
                println!("Pantry cleared");
            }
        }
        Ok(())
    }
}

impl SearchCommand {
    fn request(self) -> SearchRequest {
        match self {
            Self::Ingredients { names } => SearchRequest::ByIngredients(names),
            Self::Browse {
                query,
                cuisine,
                diet,
                macro_constraint,
                course,
                max_prep_time,
            } => SearchRequest::Browse {
                query,
                filters: SearchFilters {
                    cuisine,
                    diet,
                    macro_constraint,
                    course,
                    max_prep_time,
                },
            },
        }
    }

    async fn run<P: RecipeProvider, S: Storage>(self, app: &mut App<P, S>) -> anyhow::Result<()> {
        let request = match self.request() {
            SearchRequest::ByIngredients(names) if names.is_empty() => {
                if app.state.pantry.is_empty() {
                    println!("Add ingredients to the pantry, or name some to search with");
                    return Ok(());
                }
                SearchRequest::ByIngredients(app.state.pantry.items().to_vec())
            }
            request => request,
        };

        match app.search(&request).await {
            Ok(SearchOutcome::Found(_)) => {
                let source = request.results_source();
                render::recipe_list(&source.to_string(), app.state.collection(source));
            }
            Ok(SearchOutcome::NoResults) => println!("{NO_RESULTS_MESSAGE}"),
            Err(err) => report_api_error(&err),
        }
        Ok(())
    }
}

impl SuggestCommand {
    async fn run<P: RecipeProvider, S: Storage>(self, app: &mut App<P, S>) -> anyhow::Result<()> {
        match self {
            Self::Ingredient { partial } => match app.suggest_ingredients(&partial).await {
                Ok(names) => names.iter().for_each(|name| println!("  {name}")),
                Err(err) => report_api_error(&err),
            },
            Self::Recipe { partial } => match app.suggest_recipes(&partial).await {
                Ok(titles) => {
                    for (id, title) in titles {
                        println!("  [{id}] {title}");
                    }
                }
                Err(err) => report_api_error(&err),
            },
        }
        Ok(())
    }
}

impl BookCommand {
    fn run<P: RecipeProvider, S: Storage>(self, app: &mut App<P, S>) -> anyhow::Result<()> {
        match self {
            Self::Remove { id } => match app.remove_from_recipe_book(id) {
                Ok(removed) => println!("Removed {} from the recipe book", removed.title),
                Err(err) => return report_app_error(err),
            },
            Self::Create {
                title,
                servings,
                prep_time,
                image,
                ingredients,
                steps,
                nutrition,
            } => {
                let input = CustomRecipeInput {
                    title,
                    image,
                    servings,
                    prep_time,
                    ingredients,
                    instructions: steps,
                    nutrition: nutrition.into(),
                };
                match app.add_custom_recipe(input) {
                    Ok(id) => println!("Added recipe {id} to the recipe book"),
                    Err(err) => return report_app_error(err),
                }
            }
        }
        Ok(())
    }
}

impl PlanCommand {
    fn run<P: RecipeProvider, S: Storage>(self, app: &mut App<P, S>) -> anyhow::Result<()> {
        match self {
            Self::Show { date: None } => render::week(&app.state.meal_plan, &app.state.daily_values),
            Self::Show { date: Some(date) } => match app.state.meal_plan.day(date) {
                Some(day) => render::day(date, day, &app.state.daily_values),
                None => println!("{} is not in the meal plan", DateKey(date)),
            },
            Self::Next => {
                if !app.show_next_week() {
                    println!("Already showing the last week");
                }
                render::week(&app.state.meal_plan, &app.state.daily_values);
            }
            Self::Prev => {
                if !app.show_previous_week() {
                    println!("Already showing the first week");
                }
                render::week(&app.state.meal_plan, &app.state.daily_values);
            }
            Self::Add {
                id,
                from,
                to,
                replace,
                servings,
            } => {
                let Some(source) = from.browsing() else {
                    anyhow::bail!("use `plan move` for recipes already in the plan");
                };
                let from = Location::Browsing(source);
                let servings = servings.unwrap_or_else(|| current_servings(app, id, from));
                match app.add_to_plan(id, from, to.slot(), operation(replace), servings) {
                    Ok(()) => println!("Scheduled recipe {id} for {}", to.slot()),
                    Err(err) => return report_app_error(err),
                }
            }
            Self::Move {
                id,
                from,
                to_date,
                to_meal,
                replace,
                servings,
            } => {
                let from = Location::Planner(from.slot());
                let to = SlotRef::new(to_date, to_meal);
                let servings = servings.unwrap_or_else(|| current_servings(app, id, from));
                match app.add_to_plan(id, from, to, operation(replace), servings) {
                    Ok(()) => println!("Moved recipe {id} to {to}"),
                    Err(err) => return report_app_error(err),
                }
            }
            Self::Remove { id, slot } => match app.remove_from_plan(id, slot.slot()) {
                Ok(removed) => println!("Removed {} from {}", removed.title, slot.slot()),
                Err(err) => return report_app_error(err),
            },
            Self::Entry {
                title,
                to,
                replace,
                nutrition,
            } => match app.add_custom_entry(&title, nutrition.into(), to.slot(), operation(replace)) {
                Ok(_) => println!("Logged {title} for {}", to.slot()),
                Err(err) => return report_app_error(err),
            },
        }
        Ok(())
    }
}

fn current_servings<P: RecipeProvider, S: Storage>(app: &App<P, S>, id: u64, at: Location) -> u32 {
    app.state
        .find(id, at)
        .and_then(|recipe| recipe.servings.known().copied())
        .unwrap_or(MIN_SERVINGS)
}
