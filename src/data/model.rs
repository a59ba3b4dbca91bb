use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Value – one cell of a measurement column
// ---------------------------------------------------------------------------

/// A y value that may be absent.
///
/// The benchmark harness writes `-1` for combinations it never ran; that code
/// becomes `Missing` at parse time so downstream arithmetic has to match on it
/// instead of testing a float for NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Measured(f64),
    Missing,
}

impl Value {
    /// The number inside, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Measured(v) => Some(*v),
            Value::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Measured(v) => write!(f, "{v:e}"),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Measured(v) => serializer.serialize_f64(*v),
            Value::Missing => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// Series – ordered (x, y) points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: Value,
}

/// An ordered sequence of points. Missing points keep their x so series
/// stay aligned when charted side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(points: Vec<Point>) -> Self {
        Series { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterator over the measured `(x, y)` pairs, skipping missing points.
    pub fn measured(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.y.as_f64().map(|y| (p.x, y)))
    }
}

impl FromIterator<(f64, Value)> for Series {
    fn from_iter<I: IntoIterator<Item = (f64, Value)>>(iter: I) -> Self {
        Series {
            points: iter.into_iter().map(|(x, y)| Point { x, y }).collect(),
        }
    }
}

impl From<Vec<Point>> for Series {
    fn from(points: Vec<Point>) -> Self {
        Series::new(points)
    }
}

/// A series together with the legend label it is charted under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub label: String,
    pub series: Series,
}

impl NamedSeries {
    pub fn new(label: impl Into<String>, series: Series) -> Self {
        NamedSeries {
            label: label.into(),
            series,
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the complete parsed file
// ---------------------------------------------------------------------------

/// The full parsed measurement grid of one benchmark file.
///
/// Only the loader builds tables, and only after every row has been read
/// and validated, so the shape invariants below always hold:
/// * `message_sizes` is strictly increasing,
/// * every entry of `timings` has one `(message_size, value)` pair per
///   message size, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    message_sizes: Vec<u64>,
    security_params: Vec<u64>,
    timings: BTreeMap<u64, Vec<(u64, Value)>>,
}

impl MeasurementTable {
    pub(crate) fn from_parts(
        message_sizes: Vec<u64>,
        security_params: Vec<u64>,
        timings: BTreeMap<u64, Vec<(u64, Value)>>,
    ) -> Self {
        debug_assert!(security_params
            .iter()
            .all(|k| timings.get(k).map(Vec::len) == Some(message_sizes.len())));
        MeasurementTable {
            message_sizes,
            security_params,
            timings,
        }
    }

    /// Message counts (`m`), ascending. The x-axis domain.
    pub fn message_sizes(&self) -> &[u64] {
        &self.message_sizes
    }

    /// Security parameters (`k`) in file order.
    pub fn security_params(&self) -> &[u64] {
        &self.security_params
    }

    /// `(message_size, elapsed_seconds)` pairs for one security parameter.
    pub fn timings(&self, k: u64) -> Option<&[(u64, Value)]> {
        self.timings.get(&k).map(Vec::as_slice)
    }

    /// Number of message sizes (data rows).
    pub fn len(&self) -> usize {
        self.message_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.message_sizes.is_empty()
    }

    /// Count of cells holding an actual measurement.
    pub fn measured_count(&self) -> usize {
        self.timings
            .values()
            .flatten()
            .filter(|(_, v)| !v.is_missing())
            .count()
    }

    /// Build the time-vs-message-count series for security parameter `k`.
    pub fn series(&self, k: u64) -> Option<Series> {
        self.timings(k)
            .map(|row| row.iter().map(|&(m, v)| (m as f64, v)).collect())
    }
}
