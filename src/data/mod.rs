/// Data layer: measurement tables, loading, and derived series.
///
/// Architecture:
/// ```text
///  primitive / ote / ote_net   (one text file per protocol)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MeasurementTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ MeasurementTable │  m × k grid of Value
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  (protocol, k) → NamedSeries, via normalize / aggregate
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod select;

pub use error::DataError;
pub use model::{MeasurementTable, NamedSeries, Point, Series, Value};
