/// Data layer: the record table, loading, and derived statistics.
///
/// Architecture:
/// ```text
///  Crop_Recommendation.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordTable (+ SchemaReport)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable  │  typed columns in file order
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  counts, histograms, KDE, ranges, correlation
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
