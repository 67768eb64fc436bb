/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<ReviewRecord>, airline index
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  dataset + chart state + selection → aggregated view
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
