use super::error::DataError;
use super::model::{Point, Series, Value};

/// Arithmetic mean of the measured points. Missing points count for nothing,
/// neither in the sum nor in the divisor.
pub fn mean(series: &Series) -> Result<f64, DataError> {
    let (sum, count) = series
        .measured()
        .fold((0.0, 0usize), |(sum, n), (_, y)| (sum + y, n + 1));
    if count == 0 {
        return Err(DataError::EmptySeries);
    }
    Ok(sum / count as f64)
}

/// Cumulative mean: each measured point becomes the mean of all measured
/// points up to and including it. Missing points are passed through.
pub fn running_mean(series: &Series) -> Series {
    let mut sum = 0.0;
    let mut count = 0usize;
    series
        .points
        .iter()
        .map(|p| match p.y {
            Value::Missing => *p,
            Value::Measured(y) => {
                sum += y;
                count += 1;
                Point {
                    x: p.x,
                    y: Value::Measured(sum / count as f64),
                }
            }
        })
        .collect::<Vec<_>>()
        .into()
}
