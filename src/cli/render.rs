//! Plain-text views printed to stdout.

use chrono::NaiveDate;

use crate::config::DailyValues;
use crate::meal_plan::{DayNutrition, DayPlan, MealPlan, MealSlot};
use crate::recipe::{Availability, Measure, Origin, Recipe};
use crate::servings::ServingsOutcome;
use crate::utils::DateKey;

fn amount(measure: Measure<f64>, unit: &str) -> String {
    match measure {
        Measure::Known(value) => format!("{value:.0}{unit}"),
        other => other.to_string(),
    }
}

fn percent(measure: Measure<f64>) -> String {
    amount(measure, "%")
}

fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn availability_mark(availability: Availability) -> &'static str {
    match availability {
        Availability::DefinitelyAvailable => "have",
        Availability::HouseholdItem => "household",
        Availability::PotentiallyAvailable => "maybe",
        Availability::Unavailable => "missing",
    }
}

pub fn recipe_line(recipe: &Recipe) -> String {
    let bookmark = if recipe.is_bookmarked { " *" } else { "" };
    let mut line = format!("[{}] {}{bookmark}", recipe.id, recipe.title);
    if recipe.origin == Origin::CustomMealEntry {
        line.push_str(&format!(" | {}", amount(recipe.macros.calories, " kcal")));
        return line;
    }
    line.push_str(&format!(
        " | {} servings | {} min | {}",
        recipe.servings,
        recipe.prep_time,
        amount(recipe.macros.calories, " kcal")
    ));
    if let Measure::Known(missing) = recipe.num_missing_ingredients {
        line.push_str(&format!(" | {missing} missing"));
    }
    line
}

pub fn recipe_list(title: &str, recipes: &[Recipe]) {
    println!("{title} ({})", recipes.len());
    if recipes.is_empty() {
        println!("  (empty)");
    }
    for recipe in recipes {
        println!("  {}", recipe_line(recipe));
    }
}

pub fn recipe_detail(recipe: &Recipe) {
    println!("{}", recipe_line(recipe));
    if !recipe.image.is_empty() {
        println!("  image: {}", recipe.image);
    }
    for (label, values) in [
        ("meal type", &recipe.meal_type),
        ("cuisine", &recipe.cuisine),
        ("diets", &recipe.dietary_restrictions),
    ] {
        if !values.is_empty() {
            println!("  {label}: {}", values.join(", "));
        }
    }

    let macros = &recipe.macros;
    println!(
        "  macros: {} | protein {} | fats {} | carbs {}",
        amount(macros.calories, " kcal"),
        amount(macros.protein, "g"),
        amount(macros.fats, "g"),
        amount(macros.carbs, "g"),
    );
    println!(
        "  daily value: protein {} | fats {} | carbs {}",
        percent(recipe.daily_values.protein),
        percent(recipe.daily_values.fats),
        percent(recipe.daily_values.carbs),
    );
    let breakdown = &recipe.caloric_breakdown;
    println!(
        "  calories from: protein {} | fats {} | carbs {}",
        percent(breakdown.percent_protein),
        percent(breakdown.percent_fats),
        percent(breakdown.percent_carbs),
    );
    let micro = &recipe.micronutrients;
    println!(
        "  saturated fat {} | sugar {} | fiber {} | sodium {} | cholesterol {}",
        amount(micro.saturated_fat, "g"),
        amount(micro.sugar, "g"),
        amount(micro.fiber, "g"),
        amount(micro.sodium, "mg"),
        amount(micro.cholesterol, "mg"),
    );
    println!(
        "  iron {} | zinc {} | calcium {} | magnesium {}",
        amount(micro.iron, "mg"),
        amount(micro.zinc, "mg"),
        amount(micro.calcium, "mg"),
        amount(micro.magnesium, "mg"),
    );

    if !recipe.ingredients.is_empty() {
        println!("  ingredients:");
        for ingredient in &recipe.ingredients {
            println!(
                "    - {} {} {} ({}, {})",
                quantity(ingredient.quantity),
                ingredient.unit,
                ingredient.name,
                ingredient.category,
                availability_mark(ingredient.availability),
            );
        }
    }
    if !recipe.instructions.is_empty() {
        println!("  instructions:");
        for (step, text) in recipe.instructions.iter().enumerate() {
            println!("    {}. {text}", step + 1);
        }
    }
}

fn nutrition_line(nutrition: &DayNutrition, dv: &DailyValues) -> String {
    let (protein, fats, carbs) = nutrition.daily_value_percents(dv);
    format!(
        "{:.0} kcal | protein {:.0}g ({protein:.0}%) | fats {:.0}g ({fats:.0}%) | carbs {:.0}g ({carbs:.0}%)",
        nutrition.calories, nutrition.protein, nutrition.fats, nutrition.carbs,
    )
}

pub fn day(date: NaiveDate, plan: &DayPlan, dv: &DailyValues) {
    println!("{}: {}", DateKey(date), nutrition_line(&plan.nutrition, dv));
    for meal in MealSlot::ALL {
        let recipes = plan.meals.slot(meal);
        if recipes.is_empty() {
            continue;
        }
        println!("  {meal}:");
        for recipe in recipes {
            println!("    {}", recipe_line(recipe));
        }
    }
}

pub fn week(plan: &MealPlan, dv: &DailyValues) {
    let Some((monday, week)) = plan.displayed_week() else {
        println!("The meal plan is empty");
        return;
    };
    println!("Week of {monday}");
    for (date, day_plan) in &week.days {
        day(date.date(), day_plan, dv);
    }
    let totals = week.totals();
    println!(
        "Week total: {:.0} kcal | protein {:.0}g | fats {:.0}g | carbs {:.0}g",
        totals.calories, totals.protein, totals.fats, totals.carbs,
    );
}

pub fn pantry(items: &[String]) {
    if items.is_empty() {
        println!("The pantry is empty");
        return;
    }
    println!("Pantry ({}):", items.len());
    for item in items {
        println!("  {item}");
    }
}

pub fn servings_outcome(id: u64, outcome: ServingsOutcome) {
    match outcome {
        ServingsOutcome::Adjusted { from, to } => {
            println!("Recipe {id} now serves {to} (was {from})");
        }
        ServingsOutcome::Unchanged => println!("Recipe {id} already has that many servings"),
        ServingsOutcome::OutOfRange { requested } => {
            println!("{requested} servings is out of range; recipe {id} was not changed");
        }
        ServingsOutcome::NotScalable => println!("Recipe {id} has no serving count to adjust"),
    }
}
