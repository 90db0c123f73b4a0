/// Data layer: categories, core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable → prepare → PreparedTable
///   └──────────┘
///        │         (category: fixed-edge bucketing of Age / Distance / BMI)
///        ▼
///   ┌───────────────┐
///   │ PreparedTable │  Vec<WorkoutRecord>, present-category index
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection (age, distance, BMI) → matching records
///   └──────────┘
/// ```

pub mod category;
pub mod filter;
pub mod loader;
pub mod model;
