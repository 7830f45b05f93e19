/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  <city>.csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TripTable (month, weekday, hour derived)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  month / day-of-week selection → narrowed TripTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  modes, counts, percentages, missing cells
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
