/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  loader   │◄─────│   cache    │  memoized per path
///   └──────────┘      └───────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ PostDataset  │  Vec<Post>, filter options, load report
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  counts, means, rankings, correlation → Dashboard
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
