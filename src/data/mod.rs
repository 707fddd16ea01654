/// Data layer: table types, CSV loading, ID extraction and merging.
///
/// Architecture:
/// ```text
///  ReaderBench / Coh-Metrix / GAMET .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw Table (text cells, NaN → Missing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ import::*     │  ID rule, column selection, numeric coercion, sort
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  merge    │  inner join on ID (ReaderBench ⋈ GAMET)
///   └──────────┘
/// ```

pub mod identifier;
pub mod loader;
pub mod merge;
pub mod model;
