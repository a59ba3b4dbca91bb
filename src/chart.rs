use serde::{Deserialize, Serialize};

use crate::data::{DataError, NamedSeries};

/// x is always drawn on a log2 scale: message counts are powers of two.
pub const X_LOG_BASE: u32 = 2;

// ---------------------------------------------------------------------------
// Axis configuration (caller side) and metadata (request side)
// ---------------------------------------------------------------------------

/// What the caller decides about the axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Positions of the labelled x ticks, in data coordinates (message counts).
    pub x_ticks: Vec<f64>,
    /// Distance between y ticks.
    pub y_step: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        AxisConfig {
            title: "All Protocols".to_string(),
            x_label: "m".to_string(),
            y_label: "Time [s]".to_string(),
            x_ticks: Vec::new(),
            y_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisMetadata {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    /// Largest measured y over all series.
    pub y_max: f64,
    /// Index of the first series that reaches `y_max`.
    pub y_max_series: usize,
    pub x_log_base: u32,
}

/// Everything a plotting surface needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub series: Vec<NamedSeries>,
    pub axis: AxisMetadata,
}

/// Something that can draw (or otherwise consume) a [`ChartRequest`].
pub trait PlottingSurface {
    fn render(&mut self, request: &ChartRequest) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Bundle labelled series and axis configuration into a rendering request.
///
/// Fails with [`DataError::EmptySeries`] when no series holds a single
/// measured value, and with [`DataError::InvalidAxis`] for an unusable
/// y step.
pub fn assemble(series: Vec<NamedSeries>, axis: AxisConfig) -> Result<ChartRequest, DataError> {
    if !(axis.y_step > 0.0 && axis.y_step.is_finite()) {
        return Err(DataError::InvalidAxis(format!(
            "y step must be positive, got {}",
            axis.y_step
        )));
    }

    let (y_max_series, y_max) = peak(&series).ok_or(DataError::EmptySeries)?;
    let y_ticks = y_ticks(y_max, axis.y_step);

    log::debug!(
        "Assembled chart '{}': {} series, y max {y_max} from '{}', {} y ticks",
        axis.title,
        series.len(),
        series[y_max_series].label,
        y_ticks.len()
    );

    Ok(ChartRequest {
        series,
        axis: AxisMetadata {
            title: axis.title,
            x_label: axis.x_label,
            y_label: axis.y_label,
            x_ticks: axis.x_ticks,
            y_ticks,
            y_max,
            y_max_series,
            x_log_base: X_LOG_BASE,
        },
    })
}

/// `(series index, y)` of the largest measured value; the first one wins ties.
fn peak(series: &[NamedSeries]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, named) in series.iter().enumerate() {
        for (_, y) in named.series.measured() {
            if best.map_or(true, |(_, b)| y > b) {
                best = Some((i, y));
            }
        }
    }
    best
}

/// `0, step, 2·step, …` up to `max` inclusive. Empty when `max` is negative.
fn y_ticks(max: f64, step: f64) -> Vec<f64> {
    if max < 0.0 {
        return Vec::new();
    }
    let n = (max / step + 1e-9).floor() as usize;
    let mut ticks: Vec<f64> = (0..=n).map(|i| i as f64 * step).collect();
    if let Some(last) = ticks.last_mut() {
        *last = last.min(max);
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Series, Value};

    fn named(label: &str, ys: &[Option<f64>]) -> NamedSeries {
        let series: Series = ys
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let x = (1u64 << i) as f64;
                (x, y.map_or(Value::Missing, Value::Measured))
            })
            .collect();
        NamedSeries::new(label, series)
    }

    fn config(step: f64) -> AxisConfig {
        AxisConfig {
            x_ticks: vec![1.0, 2.0, 4.0],
            y_step: step,
            ..AxisConfig::default()
        }
    }

    #[test]
    fn test_y_max_and_ticks() {
        let series = vec![
            named("a", &[Some(0.25), None, Some(0.5)]),
            named("b", &[Some(1.0), Some(0.75), None]),
        ];
        let request = assemble(series, config(0.25)).unwrap();
        assert_eq!(request.axis.y_max, 1.0);
        assert_eq!(request.axis.y_max_series, 1);
        assert_eq!(request.axis.y_ticks, [0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(request.axis.x_ticks, [1.0, 2.0, 4.0]);
        assert_eq!(request.axis.x_log_base, 2);
        assert_eq!(request.series[0].label, "a");
        assert_eq!(request.series[1].label, "b");
    }

    #[test]
    fn test_tie_goes_to_first_series() {
        let series = vec![
            named("a", &[None, Some(2.0)]),
            named("b", &[Some(2.0)]),
        ];
        let request = assemble(series, config(1.0)).unwrap();
        assert_eq!(request.axis.y_max_series, 0);
    }

    #[test]
    fn test_ticks_stop_at_max() {
        let request = assemble(vec![named("a", &[Some(0.3)])], config(0.1)).unwrap();
        assert_eq!(request.axis.y_ticks, [0.0, 0.1, 0.2, 0.3]);
        let request = assemble(vec![named("a", &[Some(0.35)])], config(0.1)).unwrap();
        assert_eq!(request.axis.y_ticks.len(), 4);
        assert!(request.axis.y_ticks.iter().all(|&t| t <= 0.35));
    }

    #[test]
    fn test_fine_step_is_not_capped() {
        let request = assemble(vec![named("a", &[Some(2.0)])], config(1e-4)).unwrap();
        assert_eq!(request.axis.y_ticks.len(), 20_001);
        assert_eq!(request.axis.y_ticks.first(), Some(&0.0));
        assert_eq!(request.axis.y_ticks.last(), Some(&2.0));
    }

    #[test]
    fn test_negative_max_has_no_ticks() {
        let request = assemble(vec![named("a", &[Some(-2.0), Some(-3.0)])], config(1.0)).unwrap();
        assert_eq!(request.axis.y_max, -2.0);
        assert!(request.axis.y_ticks.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            assemble(Vec::new(), config(1.0)),
            Err(DataError::EmptySeries)
        ));
        assert!(matches!(
            assemble(vec![named("a", &[None, None])], config(1.0)),
            Err(DataError::EmptySeries)
        ));
    }

    #[test]
    fn test_bad_step() {
        let series = vec![named("a", &[Some(1.0)])];
        assert!(matches!(
            assemble(series.clone(), config(0.0)),
            Err(DataError::InvalidAxis(_))
        ));
        assert!(matches!(
            assemble(series, config(f64::NAN)),
            Err(DataError::InvalidAxis(_))
        ));
    }
}
