use std::fmt::Display;
use std::io::{self, Write};
use std::time::Instant;

use log::debug;

use crate::data::aggregate::{
    count_matches, distribution, extremes, mean_seconds, missing_count, most_frequent,
    percentage, total_seconds, DurationParts, Mode, ModeSet, GENDER_PERCENT_DECIMALS,
    PERCENT_DECIMALS,
};
use crate::data::filter::{DayFilter, FilterSpec, MonthFilter};
use crate::data::model::{month_name, TripRecord, TripTable};

pub const SEPARATOR: &str = "----------------------------------------";

// ---------------------------------------------------------------------------
// ReportContext – everything a section needs, passed explicitly
// ---------------------------------------------------------------------------

/// The current selection and its filtered table.
///
/// The table's row count is the denominator for every percentage.
pub struct ReportContext<'a> {
    pub filters: FilterSpec,
    pub table: &'a TripTable,
}

impl<'a> ReportContext<'a> {
    pub fn new(filters: FilterSpec, table: &'a TripTable) -> Self {
        ReportContext { filters, table }
    }

    /// Filtered total.
    pub fn total(&self) -> usize {
        self.table.len()
    }

    fn column<T>(&self, f: impl Fn(&TripRecord) -> Option<T> + 'a) -> impl Iterator<Item = Option<T>> + 'a {
        self.table.trips.iter().map(f)
    }

    fn percent(&self, count: usize) -> String {
        format_percent(percentage(count, self.total(), PERCENT_DECIMALS))
    }
}

/// Render a percentage the way the reports always have: `12.5`, `100.0`.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The four independently selectable report sections, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    TimeOfTravel,
    Stations,
    TripDuration,
    Users,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::TimeOfTravel,
        Section::Stations,
        Section::TripDuration,
        Section::Users,
    ];

    /// Yes / no question offering the section.
    pub fn question(self) -> &'static str {
        match self {
            Section::TimeOfTravel => {
                "\nWould you like to see some statistics about Time Travel? Enter yes or no."
            }
            Section::Stations => {
                "\nWould you like to see some statistics about Stations and Trip? Enter yes or no."
            }
            Section::TripDuration => {
                "\nWould you like to see some statistics about Trip Duration? Enter yes or no."
            }
            Section::Users => "\nWould you like to see some statistics about Users? Enter yes or no.",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Section::TimeOfTravel => "Calculating The Most Frequent Times of Travel...",
            Section::Stations => "Calculating The Most Popular Stations and Trip...",
            Section::TripDuration => "Calculating Trip Duration...",
            Section::Users => "Calculating User Stats...",
        }
    }

    /// Compute and print the section, followed by its own timing.
    pub fn run(self, ctx: &ReportContext<'_>, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "\n{}\n", self.heading())?;
        let started = Instant::now();

        match self {
            Section::TimeOfTravel => time_stats(ctx, out)?,
            Section::Stations => station_stats(ctx, out)?,
            Section::TripDuration => trip_duration_stats(ctx, out)?,
            Section::Users => user_stats(ctx, out)?,
        }

        let elapsed = started.elapsed().as_secs_f64();
        debug!("{self:?} section computed in {elapsed:.6}s over {} trips", ctx.total());
        writeln!(out, "\nThis took {elapsed} seconds.")?;
        writeln!(out, "{SEPARATOR}")
    }
}

fn time_stats(ctx: &ReportContext<'_>, out: &mut impl Write) -> io::Result<()> {
    // A month or day filter makes the matching statistic trivial.
    if ctx.filters.month == MonthFilter::All {
        writeln!(out, "\nCalculating the Most Common Month:")?;
        let mode = most_frequent(ctx.column(|t| Some(t.month())));
        display_mode(ctx, out, mode.map(|m| m.map(month_name)))?;
        display_missing(ctx, out, missing_count(ctx.column(|t| Some(t.month()))))?;
    }

    if ctx.filters.day == DayFilter::All {
        writeln!(out, "\nCalculating the Most Common Day of Week:")?;
        let mode = most_frequent(ctx.column(|t| Some(t.weekday())));
        display_mode(ctx, out, mode)?;
        display_missing(ctx, out, missing_count(ctx.column(|t| Some(t.weekday()))))?;
    }

    writeln!(out, "\nCalculating the Most Common Start Hour:")?;
    let mode = most_frequent(ctx.column(|t| Some(t.hour())));
    display_mode(ctx, out, mode)?;
    display_missing(ctx, out, missing_count(ctx.column(|t| Some(t.hour()))))
}

fn station_stats(ctx: &ReportContext<'_>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nCalculating the Most Commonly used Start Station:")?;
    let start = |t: &TripRecord| t.start_station.clone();
    display_mode(ctx, out, most_frequent(ctx.column(start)))?;
    display_missing(ctx, out, missing_count(ctx.column(start)))?;

    writeln!(out, "\nCalculating the Most Commonly used End Station:")?;
    let end = |t: &TripRecord| t.end_station.clone();
    display_mode(ctx, out, most_frequent(ctx.column(end)))?;
    display_missing(ctx, out, missing_count(ctx.column(end)))?;

    writeln!(
        out,
        "\nCalculating the Most Frequent Trip (Start Station, End Station):"
    )?;
    let mode = most_frequent(ctx.column(TripRecord::station_pair))
        .map(|m| m.map(|(from, to)| format!("{from} -> {to}")));
    display_mode(ctx, out, mode)?;
    display_missing(ctx, out, missing_count(ctx.column(TripRecord::station_pair)))
}

fn trip_duration_stats(ctx: &ReportContext<'_>, out: &mut impl Write) -> io::Result<()> {
    let duration = |t: &TripRecord| t.trip_duration;

    writeln!(out, "\nCalculating Total Travel Time:")?;
    let total = DurationParts::from_secs_f64(total_seconds(ctx.column(duration)));
    display_duration(out, total)?;
    display_missing(ctx, out, missing_count(ctx.column(duration)))?;

    writeln!(out, "\nCalculating Mean Travel Time:")?;
    match mean_seconds(ctx.column(duration)) {
        // Half-second means round to even, as the reports always have.
        Some(mean) => {
            display_duration(out, DurationParts::from_secs_f64(mean.round_ties_even()))?
        }
        None => writeln!(out, "No data available.")?,
    }
    display_missing(ctx, out, missing_count(ctx.column(duration)))
}

fn user_stats(ctx: &ReportContext<'_>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nCalculating Count of User Types in percentage:")?;
    let user_type = |t: &TripRecord| t.user_type.clone();
    for share in distribution(ctx.column(user_type), ctx.total(), PERCENT_DECIMALS) {
        writeln!(out, "{}: {}%", share.value, format_percent(share.percent))?;
    }
    display_missing(ctx, out, missing_count(ctx.column(user_type)))?;

    let city = ctx.filters.city;
    if !city.has_demographics() {
        writeln!(
            out,
            "\nSorry, we don't have any Gender or Year of Birth Data to display for {city}.\n"
        )?;
        return Ok(());
    }

    writeln!(out, "\nCalculating Count of Gender in percentage:")?;
    let gender = |t: &TripRecord| t.gender.clone();
    for share in distribution(ctx.column(gender), ctx.total(), GENDER_PERCENT_DECIMALS) {
        writeln!(out, "{}: {}%", share.value, format_percent(share.percent))?;
    }
    display_missing(ctx, out, missing_count(ctx.column(gender)))?;

    let birth_year = |t: &TripRecord| t.birth_year;
    let bounds = extremes(ctx.column(birth_year));
    // Earliest / latest are shown with how many trips share that exact year.
    let at_year = |year: i32| Mode {
        values: ModeSet::single(year),
        count: count_matches(ctx.column(birth_year), &year),
    };

    writeln!(out, "\nCalculating Earliest Year of Birth User:")?;
    display_mode(ctx, out, bounds.map(|(lo, _)| at_year(lo)))?;
    display_missing(ctx, out, missing_count(ctx.column(birth_year)))?;

    writeln!(out, "\nCalculating Most Recent Year of Birth User:")?;
    display_mode(ctx, out, bounds.map(|(_, hi)| at_year(hi)))?;
    display_missing(ctx, out, missing_count(ctx.column(birth_year)))?;

    writeln!(out, "\nCalculating Most Common Year of Birth User:")?;
    display_mode(ctx, out, most_frequent(ctx.column(birth_year)))?;
    display_missing(ctx, out, missing_count(ctx.column(birth_year)))
}

// -- Presentation helpers --

fn display_mode<T: Display>(
    ctx: &ReportContext<'_>,
    out: &mut impl Write,
    mode: Option<Mode<T>>,
) -> io::Result<()> {
    let Some(mode) = mode else {
        return writeln!(out, "No data available.");
    };
    for value in mode.values.iter() {
        writeln!(out, "{value}")?;
    }
    writeln!(out, "Number of Trips: {}", mode.count)?;
    writeln!(out, "That represents {}% of the trips", ctx.percent(mode.count))
}

fn display_missing(
    ctx: &ReportContext<'_>,
    out: &mut impl Write,
    missing: Option<usize>,
) -> io::Result<()> {
    match missing {
        Some(n) => writeln!(
            out,
            "Count of No Data: {n}. It represents {}% of the trips",
            ctx.percent(n)
        ),
        None => Ok(()),
    }
}

fn display_duration(out: &mut impl Write, parts: DurationParts) -> io::Result<()> {
    writeln!(
        out,
        "{} Hours {} Minutes {} Seconds",
        parts.hours, parts.minutes, parts.seconds
    )
}
