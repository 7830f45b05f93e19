use std::fmt;
use std::str::FromStr;

use log::info;

use super::model::{City, Month, TripTable, Weekday};

// ---------------------------------------------------------------------------
// Filter selections: what the user picked at the prompt
// ---------------------------------------------------------------------------

/// Month selection. Only January–June are offered, matching the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    /// Prompt candidates, "all" first.
    pub fn choices() -> Vec<&'static str> {
        std::iter::once("all")
            .chain(Month::ALL.iter().map(|m| m.key()))
            .collect()
    }
}

impl FromStr for MonthFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        s.parse().map(MonthFilter::Only)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => write!(f, "all"),
            MonthFilter::Only(m) => write!(f, "{}", m.key()),
        }
    }
}

/// Day-of-week selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl DayFilter {
    /// Prompt candidates, "all" first.
    pub fn choices() -> Vec<String> {
        std::iter::once("all".to_string())
            .chain(Weekday::ALL.iter().map(|d| d.name().to_ascii_lowercase()))
            .collect()
    }
}

impl FromStr for DayFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        s.parse().map(DayFilter::Only)
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => write!(f, "all"),
            DayFilter::Only(d) => write!(f, "{}", d.name().to_ascii_lowercase()),
        }
    }
}

/// One iteration's complete selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep trips whose derived month and weekday match the selections.
///
/// Both selections are ANDed; an empty result is valid.
pub fn filter(mut table: TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
    let before = table.len();
    table.retain(|trip| {
        let month_ok = match month {
            MonthFilter::All => true,
            MonthFilter::Only(m) => trip.month() == m.number(),
        };
        let day_ok = match day {
            DayFilter::All => true,
            DayFilter::Only(d) => trip.weekday() == d,
        };
        month_ok && day_ok
    });
    info!(
        "filter month={month} day={day}: {} of {before} trips kept",
        table.len()
    );
    table
}
