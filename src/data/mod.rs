/// Data layer: core types, parsing, filter loading, and integration.
///
/// Architecture:
/// ```text
///  objects/*.asc          filters/*.csv
///        │                      │
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │  parser   │          │  filter   │  CSV table → FilterCurve,
///   └──────────┘          └──────────┘  ordered FilterCollection
///        │                      │
///        ▼                      ▼
///   ┌──────────────┐     ┌────────────────┐
///   │ ObjectSpectrum│ ──▶ │   integrate    │  crop + interpolate +
///   └──────────────┘     └────────────────┘  trapezoidal product integral
///                               │
///                               ▼
///                        one ResponseRow cell per filter
/// ```
pub mod filter;
pub mod integrate;
pub mod model;
pub mod parser;
