//! Naive linear forecast of yearly figures.
//!
//! A straight line is fitted through the observed `(year, value)` points with
//! ordinary least squares and extended a few years past the last observation.

use common::{ForecastPoint, RegionSeries, TrendLine, YearValue};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Fits `value = slope * year + intercept` by ordinary least squares.
///
/// Needs at least two points spanning more than one distinct year.
pub fn fit_linear(points: &[YearValue]) -> Result<TrendLine> {
    if points.len() < 2 {
        return Err(ComputeError::Forecast(format!(
            "at least two points are required, got {}",
            points.len()
        )));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| f64::from(p.year)).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

    let (covariance, variance) = points.iter().fold((0.0, 0.0), |(cov, var), p| {
        let dx = f64::from(p.year) - mean_x;
        (cov + dx * (p.value - mean_y), var + dx * dx)
    });

    if variance == 0.0 {
        return Err(ComputeError::Forecast(
            "all points share the same year".to_string(),
        ));
    }

    let slope = covariance / variance;
    Ok(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Predicts the `horizon` years following the last observed year.
///
/// Predictions are clamped at zero since counts cannot go negative.
#[instrument(skip(series), fields(region = %series.region, points = series.points.len()))]
pub fn forecast(series: &RegionSeries, horizon: u32) -> Result<Vec<ForecastPoint>> {
    if horizon == 0 {
        return Ok(Vec::new());
    }

    let trend = fit_linear(&series.points)?;
    let last_year = series
        .last_year()
        .ok_or_else(|| ComputeError::Forecast("series has no points".to_string()))?;
    debug!(slope = trend.slope, intercept = trend.intercept, "Fitted trend line");

    let points = (1..=horizon as i32)
        .map(|offset| {
            let year = last_year + offset;
            ForecastPoint {
                year,
                value: trend.predict(year).max(0.0),
            }
        })
        .collect();

    Ok(points)
}
