use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::model::{Point, Series, Value};

/// Divide every measured y by `divisor(x)`.
///
/// Missing points stay missing and keep their x. The divisor is only checked
/// where there is something to divide, so a zero at a missing point is fine.
pub fn normalize<F>(series: &Series, divisor: F) -> Result<Series, DataError>
where
    F: Fn(f64) -> f64,
{
    series
        .points
        .iter()
        .map(|p| match p.y {
            Value::Missing => Ok(*p),
            Value::Measured(y) => {
                let d = divisor(p.x);
                if d == 0.0 || !d.is_finite() {
                    return Err(DataError::Division { x: p.x });
                }
                Ok(Point {
                    x: p.x,
                    y: Value::Measured(y / d),
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Series::new)
}

/// Named divisors offered to the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divisor {
    /// Constant 1: plain elapsed time.
    #[default]
    Unit,
    /// Divide by the message count: time per transferred element.
    PerMessage,
}

impl Divisor {
    pub const ALL: [Divisor; 2] = [Divisor::Unit, Divisor::PerMessage];

    pub fn label(&self) -> &'static str {
        match self {
            Divisor::Unit => "Total time",
            Divisor::PerMessage => "Time per message",
        }
    }

    /// y-axis label matching the values this divisor produces.
    pub fn y_label(&self) -> &'static str {
        match self {
            Divisor::Unit => "Time [s]",
            Divisor::PerMessage => "Time per message [s]",
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Divisor::Unit => 1.0,
            Divisor::PerMessage => x,
        }
    }

    pub fn apply(&self, series: &Series) -> Result<Series, DataError> {
        normalize(series, |x| self.eval(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Series {
        [
            (1.0, Value::Missing),
            (2.0, Value::Measured(4.0)),
            (4.0, Value::Measured(6.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_identity() {
        let s = sample();
        assert_eq!(normalize(&s, |_| 1.0).unwrap(), s);
        assert_eq!(Divisor::default().apply(&s).unwrap(), s);
    }

    #[test]
    fn test_per_message() {
        let out = Divisor::PerMessage.apply(&sample()).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.points[0].y, Value::Missing);
        assert_eq!(out.points[0].x, 1.0);
        assert_eq!(out.points[1].y, Value::Measured(2.0));
        assert_eq!(out.points[2].y, Value::Measured(1.5));
    }

    #[test]
    fn test_zero_divisor() {
        let err = normalize(&sample(), |x| x - 2.0).unwrap_err();
        assert!(matches!(err, DataError::Division { x } if x == 2.0));
    }

    #[test]
    fn test_zero_divisor_at_missing_point() {
        let out = normalize(&sample(), |x| if x == 1.0 { 0.0 } else { 2.0 }).unwrap();
        assert!(out.points[0].y.is_missing());
        assert_eq!(out.points[2].y, Value::Measured(3.0));
    }
}
