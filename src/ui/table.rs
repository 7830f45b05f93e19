use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::loader::{
    BIRTH_YEAR, END_STATION, END_TIME, GENDER, START_STATION, START_TIME, TRIP_DURATION,
    USER_TYPE,
};
use crate::data::model::{TripRecord, TripTable};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Raw trip pages rendered as boxed text tables
// ---------------------------------------------------------------------------

/// Render trips `offset..offset + len` as a text table, or `None` when the
/// page holds no trips.
///
/// Columns follow the source log (Gender / Birth Year only for cities that
/// carry them) followed by the derived Month, Day of Week and Hour.
pub fn render_page(
    table: &TripTable,
    offset: usize,
    len: usize,
) -> Result<Option<String>, ArrowError> {
    let rows: Vec<(usize, &TripRecord)> = table.page(offset, len).collect();
    if rows.is_empty() {
        return Ok(None);
    }

    let text = |f: fn(&TripRecord) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(
            rows.iter().map(|(_, t)| f(t)).collect::<Vec<_>>(),
        ))
    };

    let mut fields = vec![
        Field::new("", DataType::UInt64, false),
        Field::new(START_TIME, DataType::Utf8, false),
        Field::new(END_TIME, DataType::Utf8, true),
        Field::new(TRIP_DURATION, DataType::Float64, true),
        Field::new(START_STATION, DataType::Utf8, true),
        Field::new(END_STATION, DataType::Utf8, true),
        Field::new(USER_TYPE, DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(
            rows.iter().map(|(row, _)| *row as u64),
        )),
        text(|t| Some(t.start_time.format(TIME_FORMAT).to_string())),
        text(|t| t.end_time.map(|e| e.format(TIME_FORMAT).to_string())),
        Arc::new(Float64Array::from(
            rows.iter().map(|(_, t)| t.trip_duration).collect::<Vec<_>>(),
        )),
        text(|t| t.start_station.clone()),
        text(|t| t.end_station.clone()),
        text(|t| t.user_type.clone()),
    ];

    if table.city.has_demographics() {
        fields.push(Field::new(GENDER, DataType::Utf8, true));
        fields.push(Field::new(BIRTH_YEAR, DataType::Int32, true));
        columns.push(text(|t| t.gender.clone()));
        columns.push(Arc::new(Int32Array::from(
            rows.iter().map(|(_, t)| t.birth_year).collect::<Vec<_>>(),
        )));
    }

    fields.push(Field::new("Month", DataType::UInt32, false));
    fields.push(Field::new("Day of Week", DataType::Utf8, false));
    fields.push(Field::new("Hour", DataType::UInt32, false));
    columns.push(Arc::new(UInt32Array::from_iter_values(
        rows.iter().map(|(_, t)| t.month()),
    )));
    columns.push(text(|t| Some(t.weekday().name().to_string())));
    columns.push(Arc::new(UInt32Array::from_iter_values(
        rows.iter().map(|(_, t)| t.hour()),
    )));

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok(Some(pretty_format_batches(&[batch])?.to_string()))
}
