/// Data layer: core types, loading, derived views and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (typed columns, name index)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  default / user columns ∩ table header
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────┐
///   │ report: stats +      │  describe, corr, histogram, group means,
///   │ classify             │  average vs 75.0 → Good / NeedsImprovement
///   └──────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Table → CSV / XLSX bytes
///   └──────────┘
/// ```

pub mod classify;
pub mod error;
pub mod export;
pub mod feedback;
pub mod loader;
pub mod model;
pub mod report;
pub mod select;
pub mod stats;
