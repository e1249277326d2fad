use crate::config::{DailyValues, MAX_SERVINGS, MIN_SERVINGS};
use crate::recipe::{Measure, Recipe};

/// A requested change to a recipe's serving count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingsChange {
    Increase,
    Decrease,
    /// Absolute override, e.g. "schedule 3 servings".
    Set(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingsOutcome {
    Adjusted { from: u32, to: u32 },
    /// The requested count equals the current one.
    Unchanged,
    /// The result would fall outside the allowed range; nothing was modified.
    OutOfRange { requested: i64 },
    /// The entity has no serving count (custom meal entries).
    NotScalable,
}

impl ServingsOutcome {
    pub fn changed(self) -> bool {
        matches!(self, ServingsOutcome::Adjusted { .. })
    }
}

pub fn servings_in_range(servings: i64) -> bool {
    (i64::from(MIN_SERVINGS)..=i64::from(MAX_SERVINGS)).contains(&servings)
}

/// Rescales ingredient quantities and nutrients by `new / old` and writes the
/// new serving count. Out-of-range requests leave the recipe untouched.
pub fn adjust_servings(recipe: &mut Recipe, change: ServingsChange, dv: &DailyValues) -> ServingsOutcome {
    let Some(&current) = recipe.servings.known() else {
        return ServingsOutcome::NotScalable;
    };
    if current == 0 {
        return ServingsOutcome::NotScalable;
    }

    let requested = match change {
        ServingsChange::Increase => i64::from(current) + 1,
        ServingsChange::Decrease => i64::from(current) - 1,
        ServingsChange::Set(value) => i64::from(value),
    };
    if !servings_in_range(requested) {
        tracing::debug!(
            "Ignoring servings change for recipe {}: {requested} is out of range",
            recipe.id
        );
        return ServingsOutcome::OutOfRange { requested };
    }
    // In range, so it fits in u32.
    let new_servings = requested as u32;
    if new_servings == current {
        return ServingsOutcome::Unchanged;
    }

    let ratio = f64::from(new_servings) / f64::from(current);
    recipe.scale_amounts(ratio, dv);
    recipe.servings = Measure::Known(new_servings);

    ServingsOutcome::Adjusted {
        from: current,
        to: new_servings,
    }
}
