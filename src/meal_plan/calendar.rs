use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{DayPlan, MealPlan, Week};
use crate::config::WEEKS_AROUND_TODAY;
use crate::utils::{monday_of, resident_week_starts, weekdays_of, DateKey};

impl Week {
    /// An empty Monday-to-Friday week.
    pub fn empty(monday: NaiveDate) -> Self {
        let days = weekdays_of(monday)
            .into_iter()
            .map(|date| (DateKey(date), DayPlan::default()))
            .collect();
        Self { days }
    }
}

impl MealPlan {
    /// Derives the resident window around `today`, keeping persisted weeks that
    /// fall inside it and generating empty ones for the rest. Persisted weeks
    /// outside the window are dropped. The current week is displayed.
    pub fn load(persisted: Option<MealPlan>, today: NaiveDate) -> Self {
        let mut persisted_weeks = persisted.map(|plan| plan.weeks).unwrap_or_default();

        let weeks: BTreeMap<DateKey, Week> = resident_week_starts(today)
            .into_iter()
            .map(|monday| {
                let mut week = Week::empty(monday);
                if let Some(saved) = persisted_weeks.remove(&DateKey(monday)) {
                    for (key, day) in saved.days {
                        // Only weekdays of this week are kept.
                        if let Some(slot) = week.days.get_mut(&key) {
                            *slot = day;
                        }
                    }
                }
                week.recompute_nutrition();
                (DateKey(monday), week)
            })
            .collect();

        if !persisted_weeks.is_empty() {
            tracing::debug!(
                "Dropped {} persisted weeks outside the resident window",
                persisted_weeks.len()
            );
        }

        Self {
            weeks,
            displayed: WEEKS_AROUND_TODAY as usize,
        }
    }

    /// Resident week keys in chronological order.
    pub fn week_keys(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.weeks.keys().copied()
    }

    pub fn weeks(&self) -> impl Iterator<Item = (&DateKey, &Week)> {
        self.weeks.iter()
    }

    pub(crate) fn weeks_mut(&mut self) -> impl Iterator<Item = &mut Week> {
        self.weeks.values_mut()
    }

    pub fn week_containing(&self, date: NaiveDate) -> Option<&Week> {
        self.weeks.get(&DateKey(monday_of(date)))
    }

    pub(crate) fn week_containing_mut(&mut self, date: NaiveDate) -> Option<&mut Week> {
        self.weeks.get_mut(&DateKey(monday_of(date)))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.week_containing(date)?.days.get(&DateKey(date))
    }

    pub(crate) fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayPlan> {
        self.week_containing_mut(date)?.days.get_mut(&DateKey(date))
    }

    pub fn displayed_week_key(&self) -> Option<DateKey> {
        self.weeks.keys().nth(self.displayed).copied()
    }

    pub fn displayed_week(&self) -> Option<(&DateKey, &Week)> {
        self.weeks.iter().nth(self.displayed)
    }

    /// Moves the display one week forward. Returns false at the last resident week.
    pub fn show_next_week(&mut self) -> bool {
        if self.displayed + 1 >= self.weeks.len() {
            return false;
        }
        self.displayed += 1;
        true
    }

    /// Moves the display one week back. Returns false at the first resident week.
    pub fn show_previous_week(&mut self) -> bool {
        if self.displayed == 0 {
            return false;
        }
        self.displayed -= 1;
        true
    }
}
