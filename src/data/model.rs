use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};

// ---------------------------------------------------------------------------
// City – the fixed set of trip logs we know about
// ---------------------------------------------------------------------------

/// A city with a bikeshare trip log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    /// Lower-case key the user types at the prompt.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new york",
            City::Washington => "washington",
        }
    }

    /// File name (without extension) of the city's trip log.
    pub fn file_stem(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new_york_city",
            City::Washington => "washington",
        }
    }

    /// Washington's log carries no Gender / Birth Year columns.
    pub fn has_demographics(self) -> bool {
        !matches!(self, City::Washington)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYork => "New York",
            City::Washington => "Washington",
        };
        write!(f, "{name}")
    }
}

impl FromStr for City {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| format!("unknown city '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Month / Weekday – calendar values used by the filters and the reports
// ---------------------------------------------------------------------------

/// The six months covered by the trip logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based calendar number (January = 1).
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn key(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
        }
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| format!("unsupported month '{s}'"))
    }
}

/// Title-cased name for any calendar month number, e.g. `3` → `March`.
pub fn month_name(number: u32) -> String {
    u8::try_from(number)
        .ok()
        .and_then(|n| chrono::Month::try_from(n).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| number.to_string())
}

/// Day of week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Canonical capitalized name, e.g. `Monday`.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown day of week '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// TripRecord – one row of a city's trip log
// ---------------------------------------------------------------------------

/// A single trip. Missing cells are `None`.
///
/// `month`, `weekday` and `hour` are derived from `start_time` when the
/// record is built and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    /// Seconds.
    pub trip_duration: Option<f64>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    month: u32,
    weekday: Weekday,
    hour: u32,
}

impl TripRecord {
    pub fn new(start_time: NaiveDateTime) -> Self {
        TripRecord {
            start_time,
            end_time: None,
            start_station: None,
            end_station: None,
            trip_duration: None,
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday().into(),
            hour: start_time.hour(),
        }
    }

    /// Calendar month number, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of day, 0–23.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// The (start, end) station pair, present only when both ends are known.
    pub fn station_pair(&self) -> Option<(String, String)> {
        match (&self.start_station, &self.end_station) {
            (Some(start), Some(end)) => Some((start.clone(), end.clone())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TripTable – the complete loaded (and possibly filtered) log
// ---------------------------------------------------------------------------

/// All trips for one city, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    pub city: City,
    pub trips: Vec<TripRecord>,
    /// Position of each trip in the unfiltered source, used when browsing.
    pub source_rows: Vec<usize>,
}

impl TripTable {
    pub fn new(city: City, trips: Vec<TripRecord>) -> Self {
        let source_rows = (0..trips.len()).collect();
        TripTable {
            city,
            trips,
            source_rows,
        }
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Keep only trips matching `keep`. Remaining trips are untouched.
    pub fn retain(&mut self, mut keep: impl FnMut(&TripRecord) -> bool) {
        let mut rows = std::mem::take(&mut self.source_rows).into_iter();
        let mut kept_rows = Vec::with_capacity(self.trips.len());
        self.trips.retain(|trip| {
            let row = rows.next();
            let keep_it = keep(trip);
            if keep_it {
                kept_rows.extend(row);
            }
            keep_it
        });
        self.source_rows = kept_rows;
    }

    /// Trips `offset..offset + len` paired with their source row, clamped to the table.
    pub fn page(&self, offset: usize, len: usize) -> impl Iterator<Item = (usize, &TripRecord)> {
        self.source_rows
            .iter()
            .copied()
            .zip(self.trips.iter())
            .skip(offset)
            .take(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 15, 0)
            .unwrap()
    }

    #[test]
    fn derived_fields_follow_start_time() {
        // 2017-03-05 was a Sunday
        let trip = TripRecord::new(at(2017, 3, 5, 17));
        assert_eq!(trip.month(), 3);
        assert_eq!(trip.weekday(), Weekday::Sunday);
        assert_eq!(trip.hour(), 17);
    }

    #[test]
    fn parses_prompt_keys_case_insensitively() {
        assert_eq!("New York".parse::<City>(), Ok(City::NewYork));
        assert_eq!("JUNE".parse::<Month>(), Ok(Month::June));
        assert_eq!("friday".parse::<Weekday>(), Ok(Weekday::Friday));
        assert!("july".parse::<Month>().is_err());
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn month_numbers_and_names() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::June.number(), 6);
        assert_eq!(month_name(4), "April");
        assert_eq!(month_name(13), "13");
    }

    #[test]
    fn station_pair_requires_both_ends() {
        let mut trip = TripRecord::new(at(2017, 1, 2, 8));
        trip.start_station = Some("A".into());
        assert_eq!(trip.station_pair(), None);
        trip.end_station = Some("B".into());
        assert_eq!(trip.station_pair(), Some(("A".into(), "B".into())));
    }

    #[test]
    fn retain_keeps_source_rows_aligned() {
        let trips = (1..=4).map(|d| TripRecord::new(at(2017, 1, d, 9))).collect();
        let mut table = TripTable::new(City::Chicago, trips);
        table.retain(|t| t.start_time.day() % 2 == 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.source_rows, vec![1, 3]);

        let page: Vec<usize> = table.page(1, 5).map(|(row, _)| row).collect();
        assert_eq!(page, vec![3]);
        assert_eq!(table.page(5, 5).count(), 0);
    }
}
