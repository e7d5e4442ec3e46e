//! Built-in English month and weekday name tables.
//!
//! Immutable, built once on first use, shared read-only. Lookups are
//! case-insensitive and accept both the full name and the standard 3-letter
//! abbreviation. This is the only locale data the crate carries.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] =
    ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

static MONTH_TABLE: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(MONTHS.len() * 2);
    for (idx, name) in MONTHS.iter().enumerate() {
        table.insert(*name, idx as u32 + 1);
        table.insert(&name[..3], idx as u32 + 1);
    }
    table
});

static WEEKDAY_TABLE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut table = HashSet::with_capacity(WEEKDAYS.len() * 2);
    for name in WEEKDAYS {
        table.insert(name);
        table.insert(&name[..3]);
    }
    table
});

/// Month index (1-12) for a full or abbreviated English month name.
pub(crate) fn month_index(name: &str) -> Option<u32> {
    MONTH_TABLE.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Whether `name` is a full or abbreviated English weekday name.
pub(crate) fn is_weekday(name: &str) -> bool {
    WEEKDAY_TABLE.contains(name.to_ascii_lowercase().as_str())
}
