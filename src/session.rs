use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::{Config, PAGE_SIZE};
use crate::data::filter::{filter, DayFilter, FilterSpec, MonthFilter};
use crate::data::loader;
use crate::data::model::{City, TripTable};
use crate::error::PromptError;
use crate::report::{ReportContext, Section, SEPARATOR};
use crate::ui::prompt::Prompter;
use crate::ui::table::render_page;

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const INCORRECT: &str = "The information you introduced is incorrect.";

// ---------------------------------------------------------------------------
// Session – prompt → load → filter → report → browse → restart
// ---------------------------------------------------------------------------

/// The interactive loop. Each iteration owns its table; nothing carries over
/// a restart.
pub struct Session<R, W> {
    config: Config,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        Session {
            config,
            prompter: Prompter::new(input, output),
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run until the user declines to restart.
    pub fn run(&mut self) -> Result<()> {
        let mut iteration = 0usize;
        loop {
            iteration += 1;
            debug!("session iteration {iteration}");
            self.explore()?;

            let restart = self
                .prompter
                .yes_no("\nWould you like to restart? Enter yes or no.")?;
            writeln!(self.prompter.output(), "{SEPARATOR}")?;
            if !restart {
                info!("session finished after {iteration} iteration(s)");
                return Ok(());
            }
        }
    }

    fn get_filters(&mut self) -> Result<FilterSpec, PromptError> {
        writeln!(self.prompter.output(), "{GREETING}")?;

        let city: City = self.prompter.choose(
            "\nWould you like to see data for Chicago, New York or Washington ?",
            &format!("\n{INCORRECT} Choose between Chicago, New York or Washington ?"),
        )?;

        let months = MonthFilter::choices().join(", ");
        let month: MonthFilter = self.prompter.choose(
            &format!("\nWhat month would you like the data for? Choose between: {months}."),
            &format!("\n{INCORRECT} Choose between: {months}."),
        )?;

        let days = DayFilter::choices().join(", ");
        let day: DayFilter = self.prompter.choose(
            &format!("\nWhat day of week would you like the data for? Choose between: {days}."),
            &format!("\n{INCORRECT} Choose between: {days}."),
        )?;

        writeln!(self.prompter.output(), "{SEPARATOR}")?;
        Ok(FilterSpec { city, month, day })
    }

    /// One pass from the filter prompts up to (not including) the restart prompt.
    fn explore(&mut self) -> Result<()> {
        let filters = self.get_filters()?;
        info!(
            "selected city={} month={} day={}",
            filters.city, filters.month, filters.day
        );

        let table = loader::load(filters.city, &self.config.data_dir)
            .with_context(|| format!("loading trip data for {}", filters.city))?;
        let table = filter(table, filters.month, filters.day);

        let out = self.prompter.output();
        if table.is_empty() {
            writeln!(out, "\nThere was 0 trip for the combination you introduced !\n")?;
            return Ok(());
        }
        writeln!(out, "\nNumber of Trips:\n{}", table.len())?;

        let ctx = ReportContext::new(filters, &table);
        for section in Section::ALL {
            if self.prompter.yes_no(section.question())? {
                section.run(&ctx, self.prompter.output())?;
            }
        }

        if self
            .prompter
            .yes_no("\nWould you like to see some Individual Trip Data? Enter yes or no.")?
        {
            self.browse(&table)?;
        }
        Ok(())
    }

    /// Page through raw trips until the user stops or the table runs out.
    fn browse(&mut self, table: &TripTable) -> Result<()> {
        let mut offset = 0;
        loop {
            debug!("showing trips {offset}..{}", offset + PAGE_SIZE);
            if let Some(page) = render_page(table, offset, PAGE_SIZE)? {
                writeln!(self.prompter.output(), "{page}")?;
            }
            offset += PAGE_SIZE;

            if !self
                .prompter
                .yes_no("\nWould you like to see more Individual Trip Data? Enter yes or no.")?
            {
                return Ok(());
            }
            if table.page(offset, PAGE_SIZE).next().is_none() {
                writeln!(self.prompter.output(), "\nNo more data to display\n")?;
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    /// Seven January trips, one per day from Monday 2017-01-02.
    const CHICAGO_CSV: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-02 08:00:00,2017-01-02 08:10:00,600,Station 1,Hub,Subscriber,Male,1980
2017-01-03 08:00:00,2017-01-03 08:10:00,600,Station 2,Hub,Subscriber,Female,1985
2017-01-04 09:00:00,2017-01-04 09:10:00,600,Station 3,Hub,Customer,,
2017-01-05 09:00:00,2017-01-05 09:10:00,600,Station 4,Hub,Subscriber,Male,1980
2017-01-06 18:00:00,2017-01-06 18:10:00,600,Station 5,Hub,Subscriber,Male,1990
2017-01-07 18:00:00,2017-01-07 18:10:00,600,Station 6,Hub,Customer,Female,1990
2017-01-08 08:00:00,2017-01-08 08:10:00,600,Station 7,Hub,Subscriber,Male,1975
";

    const WASHINGTON_CSV: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-02-01 08:00:00,2017-02-01 08:10:00,600.5,A,B,Subscriber
";

    fn run_script(dir: &Path, script: &str) -> (Result<()>, String) {
        let config = Config {
            data_dir: dir.to_path_buf(),
        };
        let mut session = Session::new(config, Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let result = session.run();
        let out = String::from_utf8(session.into_output()).unwrap();
        (result, out)
    }

    fn data_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("chicago.csv"), CHICAGO_CSV).unwrap();
        std::fs::write(dir.path().join("washington.csv"), WASHINGTON_CSV).unwrap();
        dir
    }

    #[test]
    fn full_table_reports_month_and_weekday() {
        let dir = data_dir();
        let script = "chicago\nall\nall\nyes\nno\nno\nno\nno\nno\n";
        let (result, out) = run_script(dir.path(), script);

        result.unwrap();
        assert!(out.starts_with(GREETING));
        assert!(out.contains("Number of Trips:\n7"));
        assert!(out.contains("Most Common Month:\nJanuary\nNumber of Trips: 7"));
        assert!(out.contains("Most Common Day of Week"));
        assert!(out.contains("Most Common Start Hour:\n8\nNumber of Trips: 3"));
    }

    #[test]
    fn invalid_answers_are_reprompted() {
        let dir = data_dir();
        let script = "boston\nChicago\njuly\nJanuary\nfunday\nMonday\nperhaps\nno\nno\nno\nno\nno\nno\n";
        let (result, out) = run_script(dir.path(), script);

        result.unwrap();
        assert_eq!(out.matches(INCORRECT).count(), 4);
        assert!(out.contains("Number of Trips:\n1"));
    }

    #[test]
    fn empty_result_skips_to_restart() {
        let dir = data_dir();
        let (result, out) = run_script(dir.path(), "chicago\njune\nall\nno\n");

        result.unwrap();
        assert!(out.contains("There was 0 trip for the combination you introduced !"));
        assert!(!out.contains("Would you like to see some statistics"));
        assert!(out.contains("Would you like to restart?"));
    }

    #[test]
    fn browsing_seven_rows_runs_out_on_third_request() {
        let dir = data_dir();
        let script = "chicago\nall\nall\nno\nno\nno\nno\nyes\nyes\nyes\nno\n";
        let (result, out) = run_script(dir.path(), script);

        result.unwrap();
        assert!(out.contains("Station 1"));
        assert!(out.contains("Station 5"));
        assert!(out.contains("Station 7"));
        assert_eq!(out.matches("see more Individual Trip Data").count(), 2);
        assert_eq!(out.matches("No more data to display").count(), 1);
    }

    #[test]
    fn declining_more_rows_stops_quietly() {
        let dir = data_dir();
        let script = "chicago\nall\nall\nno\nno\nno\nno\nyes\nno\nno\n";
        let (result, out) = run_script(dir.path(), script);

        result.unwrap();
        assert!(out.contains("Station 5"));
        assert!(!out.contains("Station 6"));
        assert!(!out.contains("No more data to display"));
    }

    #[test]
    fn washington_user_stats_show_notice() {
        let dir = data_dir();
        let script = "washington\nall\nall\nno\nno\nno\nyes\nno\nno\n";
        let (result, out) = run_script(dir.path(), script);

        result.unwrap();
        assert!(out.contains("Subscriber: 100.0%"));
        assert!(out.contains("to display for Washington."));
        assert!(!out.contains("Gender in percentage"));
    }

    #[test]
    fn restart_starts_fresh() {
        let dir = data_dir();
        let script = "chicago\nall\nmonday\nno\nno\nno\nno\nno\nyes\n\
                      washington\nall\nall\nno\nno\nno\nno\nno\nno\n";
        let (result, out) = run_script(dir.path(), script);

        result.unwrap();
        assert_eq!(out.matches(GREETING).count(), 2);
        assert!(out.contains("Number of Trips:\n1"));
    }

    #[test]
    fn missing_city_file_is_fatal() {
        let dir = data_dir();
        let (result, _) = run_script(dir.path(), "new york\nall\nall\n");

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::DataUnavailable { city: City::NewYork, .. })
        ));
    }

    #[test]
    fn closed_input_ends_session_with_error() {
        let dir = data_dir();
        let (result, _) = run_script(dir.path(), "chicago\n");
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<PromptError>(), Some(PromptError::InputClosed)));
    }
}
