use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{City, TripRecord, TripTable};
use crate::error::LoadError;

/// Source extensions probed for each city, in order of preference.
pub const SOURCE_EXTENSIONS: [&str; 3] = ["csv", "parquet", "json"];

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the full trip log for `city` from `data_dir`.
pub fn load(city: City, data_dir: &Path) -> Result<TripTable, LoadError> {
    let path = locate(city, data_dir)?;
    let table = load_file(city, &path)?;
    info!(
        "loaded {} trips for {} from {}",
        table.len(),
        city,
        path.display()
    );
    Ok(table)
}

/// Find the first existing source file for `city`.
pub fn locate(city: City, data_dir: &Path) -> Result<PathBuf, LoadError> {
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| data_dir.join(format!("{}.{ext}", city.file_stem())))
        .find(|p| p.is_file())
        .ok_or_else(|| LoadError::DataUnavailable {
            city,
            dir: data_dir.to_path_buf(),
        })
}

/// Load a trip log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one trip per line (the published format)
/// * `.parquet` – one column per field, strings or timestamps for times
/// * `.json`    – `[{ "Start Time": "...", ... }, ...]`
pub fn load_file(city: City, path: &Path) -> Result<TripTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        _ => read_csv(path)?,
    };

    let trips = raw
        .into_iter()
        .enumerate()
        .map(|(row, trip)| trip.into_record(row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TripTable::new(city, trips))
}

// ---------------------------------------------------------------------------
// Raw rows – what every source format deserializes into
// ---------------------------------------------------------------------------

/// A numeric cell that may arrive as a number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    fn as_f64(&self, row: usize, column: &str) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Number(_) => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => {
                    warn!("row {row}: '{s}' in {column} is not a number, treating as missing");
                    None
                }
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<Cell>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<Cell>,
}

impl RawTrip {
    fn into_record(self, row: usize) -> Result<TripRecord, LoadError> {
        let start_time =
            parse_timestamp(&self.start_time).ok_or_else(|| LoadError::InvalidTimestamp {
                row,
                value: self.start_time.clone(),
            })?;

        let mut trip = TripRecord::new(start_time);
        trip.end_time = self.end_time.as_deref().and_then(|s| {
            let parsed = parse_timestamp(s);
            if parsed.is_none() && !s.trim().is_empty() {
                warn!("row {row}: unparseable {END_TIME} '{s}', treating as missing");
            }
            parsed
        });
        trip.trip_duration = self
            .trip_duration
            .and_then(|c| c.as_f64(row, TRIP_DURATION));
        trip.start_station = non_blank(self.start_station);
        trip.end_station = non_blank(self.end_station);
        trip.user_type = non_blank(self.user_type);
        trip.gender = non_blank(self.gender);
        trip.birth_year = self
            .birth_year
            .and_then(|c| c.as_f64(row, BIRTH_YEAR))
            .map(|y| y.round() as i32);
        Ok(trip)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse the timestamp layouts seen in published trip logs.
///
/// Offset-aware values (e.g. zoned Parquet timestamps cast to text) keep
/// their local wall-clock time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%#z"]
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                .or_else(|| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Columns are matched by header name; unknown columns (such as the
/// unnamed index column in the published files) are ignored.
fn read_csv(path: &Path) -> Result<Vec<RawTrip>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?;
    if !headers.iter().any(|h| h == START_TIME) {
        return Err(LoadError::MissingColumn(START_TIME));
    }

    reader
        .deserialize::<RawTrip>()
        .map(|r| r.map_err(LoadError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`).
fn read_json(path: &Path) -> Result<Vec<RawTrip>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Text and time columns are cast to Utf8, numeric columns to Float64, so
/// files written by Pandas or Polars load regardless of their exact dtypes.
fn read_parquet(path: &Path) -> Result<Vec<RawTrip>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut trips = Vec::new();
    for batch in reader {
        let batch = batch?;
        let start = text_column(&batch, START_TIME)?.ok_or(LoadError::MissingColumn(START_TIME))?;
        let end = text_column(&batch, END_TIME)?;
        let start_station = text_column(&batch, START_STATION)?;
        let end_station = text_column(&batch, END_STATION)?;
        let user_type = text_column(&batch, USER_TYPE)?;
        let gender = text_column(&batch, GENDER)?;
        let duration = number_column(&batch, TRIP_DURATION)?;
        let birth_year = number_column(&batch, BIRTH_YEAR)?;

        for row in 0..batch.num_rows() {
            trips.push(RawTrip {
                start_time: text_at(&start, row).unwrap_or_default(),
                end_time: end.as_ref().and_then(|c| text_at(c, row)),
                trip_duration: duration.as_ref().and_then(|c| number_at(c, row)),
                start_station: start_station.as_ref().and_then(|c| text_at(c, row)),
                end_station: end_station.as_ref().and_then(|c| text_at(c, row)),
                user_type: user_type.as_ref().and_then(|c| text_at(c, row)),
                gender: gender.as_ref().and_then(|c| text_at(c, row)),
                birth_year: birth_year.as_ref().and_then(|c| number_at(c, row)),
            });
        }
    }
    Ok(trips)
}

// -- Arrow helpers --

fn text_column(batch: &RecordBatch, name: &str) -> Result<Option<Arc<dyn Array>>, LoadError> {
    match batch.schema().index_of(name) {
        Ok(idx) => Ok(Some(cast(batch.column(idx), &DataType::Utf8)?)),
        Err(_) => Ok(None),
    }
}

fn number_column(batch: &RecordBatch, name: &str) -> Result<Option<Arc<dyn Array>>, LoadError> {
    match batch.schema().index_of(name) {
        Ok(idx) => Ok(Some(cast(batch.column(idx), &DataType::Float64)?)),
        Err(_) => Ok(None),
    }
}

fn text_at(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_string::<i32>().value(row).to_string())
}

fn number_at(col: &Arc<dyn Array>, row: usize) -> Option<Cell> {
    if col.is_null(row) {
        return None;
    }
    Some(Cell::Number(col.as_primitive::<Float64Type>().value(row)))
}
