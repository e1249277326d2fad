use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::config::WEEKS_AROUND_TODAY;

/// Format used for week and day keys, e.g. `Mon Jan 20 2025`.
pub const DATE_KEY_FORMAT: &str = "%a %b %d %Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Number of planned days per week (Monday to Friday).
pub const DAYS_PER_WEEK: usize = 5;

/// A calendar date used as a meal-plan key. Orders chronologically and
/// serialises as a human-readable date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(pub NaiveDate);

impl DateKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    /// Accepts both the key format (`Mon Jan 20 2025`) and ISO dates (`2025-01-20`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT))
            .map(DateKey)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Monday of the week containing `date`. Weekends belong to the preceding Monday.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The five weekday dates starting at `monday`.
pub fn weekdays_of(monday: NaiveDate) -> [NaiveDate; DAYS_PER_WEEK] {
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

/// Sorted Monday dates of the resident window: four weeks before the week of
/// `today`, that week, and four weeks after.
pub fn resident_week_starts(today: NaiveDate) -> Vec<NaiveDate> {
    let current = monday_of(today);
    (-WEEKS_AROUND_TODAY..=WEEKS_AROUND_TODAY)
        .map(|offset| current + Duration::weeks(offset))
        .collect()
}

/// Generates a random integer id for which `is_taken` returns false.
pub fn unique_id(is_taken: impl Fn(u64) -> bool) -> u64 {
    let mut rng = rand::thread_rng();
    loop {
        let candidate = rng.gen_range(1_000_000_000..u64::from(u32::MAX));
        if !is_taken(candidate) {
            return candidate;
        }
    }
}

// Words ending in "s" that are already singular.
const SINGULAR_EXCEPTIONS: &[&str] = &[
    "asparagus",
    "couscous",
    "hummus",
    "molasses",
    "swiss",
    "citrus",
    "grits",
    "brussels",
    "schnapps",
];

// Singulars ending in "ie", whose plurals would otherwise take the "ies" rule.
const IE_SINGULARS: &[&str] = &["brownie", "cookie", "pie", "smoothie", "veggie", "hoagie"];

/// Lowercases, trims, collapses inner whitespace and singularises the last word.
pub fn normalize_ingredient_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut words: Vec<String> = lowered.split_whitespace().map(str::to_string).collect();
    if let Some(last) = words.last_mut() {
        *last = singularize(last);
    }
    words.join(" ")
}

fn singularize(word: &str) -> String {
    if SINGULAR_EXCEPTIONS.contains(&word) || word.len() <= 3 {
        return word.to_string();
    }
    if let Some(singular) = word.strip_suffix('s').filter(|stem| IE_SINGULARS.contains(stem)) {
        return singular.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if let Some(stem) = word.strip_suffix("oes") {
        return format!("{stem}o");
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_key_round_trips_through_display() {
        let key = DateKey(date(2025, 1, 20));
        assert_eq!(key.to_string(), "Mon Jan 20 2025");
        assert_eq!("Mon Jan 20 2025".parse::<DateKey>().unwrap(), key);
        assert_eq!("2025-01-20".parse::<DateKey>().unwrap(), key);
    }

    #[test]
    fn date_key_serialises_as_string() {
        let key = DateKey(date(2025, 1, 6));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"Mon Jan 06 2025\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn weekend_dates_map_to_previous_monday() {
        assert_eq!(monday_of(date(2025, 1, 26)), date(2025, 1, 20)); // Sunday
        assert_eq!(monday_of(date(2025, 1, 25)), date(2025, 1, 20)); // Saturday
        assert_eq!(monday_of(date(2025, 1, 20)), date(2025, 1, 20));
    }

    #[test]
    fn resident_window_is_nine_contiguous_mondays() {
        let weeks = resident_week_starts(date(2025, 1, 22));
        assert_eq!(weeks.len(), 9);
        assert_eq!(weeks[0], date(2024, 12, 23));
        assert_eq!(weeks[4], date(2025, 1, 20));
        assert_eq!(weeks[8], date(2025, 2, 17));
        assert!(weeks.windows(2).all(|w| w[1] - w[0] == Duration::weeks(1)));
    }

    #[test]
    fn weekdays_run_monday_to_friday() {
        let days = weekdays_of(date(2025, 1, 20));
        assert_eq!(days[4], date(2025, 1, 24));
    }

    #[test]
    fn unique_id_skips_taken_values() {
        let id = unique_id(|candidate| candidate % 2 == 0);
        assert_eq!(id % 2, 1);
    }

    #[test]
    fn normalisation_singularises_and_lowercases() {
        assert_eq!(normalize_ingredient_name("  Cherry   Tomatoes "), "cherry tomato");
        assert_eq!(normalize_ingredient_name("Berries"), "berry");
        assert_eq!(normalize_ingredient_name("peaches"), "peach");
        assert_eq!(normalize_ingredient_name("eggs"), "egg");
        assert_eq!(normalize_ingredient_name("Hummus"), "hummus");
        assert_eq!(normalize_ingredient_name("glass"), "glass");
        assert_eq!(normalize_ingredient_name("   "), "");
    }

    #[test]
    fn ie_plurals_keep_their_ending() {
        assert_eq!(normalize_ingredient_name("Chocolate Cookies"), "chocolate cookie");
        assert_eq!(normalize_ingredient_name("pies"), "pie");
        assert_eq!(normalize_ingredient_name("cookie"), "cookie");
        assert_eq!(normalize_ingredient_name("cherries"), "cherry");
    }
}
