//! Linear trend detection.
//!
//! Fits the primary column against a fractional-year time index
//! (`year + day_of_year / 365.25`) by ordinary least squares. The p-value
//! tests a zero slope with a two-sided Student's t test on n − 2 degrees of
//! freedom, via `statrs`.

use chrono::{Datelike, NaiveDate};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::model::{Trend, TrendDirection};

/// Fractional-year time index of a calendar date.
pub fn fractional_year(date: NaiveDate) -> f64 {
    date.year() as f64 + date.ordinal() as f64 / 365.25
}

/// Trend of `values` over `dates`; see [`linear_trend`].
pub fn detect_trend(dates: &[NaiveDate], values: &[f64]) -> Trend {
    let xs: Vec<f64> = dates.iter().map(|d| fractional_year(*d)).collect();
    linear_trend(&xs, values)
}

/// Least-squares fit of `ys` on `xs`.
///
/// Fewer than two distinct x values yield [`Trend::degenerate`]. A constant
/// series fits with slope 0, r 0 and p-value 1.
pub fn linear_trend(xs: &[f64], ys: &[f64]) -> Trend {
    let n = xs.len().min(ys.len());
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if n < 2 || xs.iter().all(|x| *x == xs[0]) {
        return Trend::degenerate();
    }

    let nf = n as f64;
    let x_mean = xs.iter().sum::<f64>() / nf;
    let y_mean = ys.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 {
        return Trend::degenerate();
    }

    let slope = sxy / sxx;
    let r_value = if syy > 0.0 {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let r_squared = r_value * r_value;

    Trend {
        slope,
        r_value,
        r_squared,
        p_value: slope_p_value(n, r_value),
        direction: direction_of(slope),
    }
}

fn direction_of(slope: f64) -> TrendDirection {
    if slope > 0.0 {
        TrendDirection::Increasing
    } else if slope < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Flat
    }
}

/// Two-sided p-value for H0: slope = 0, given the correlation coefficient.
fn slope_p_value(n: usize, r: f64) -> f64 {
    if r == 0.0 {
        return 1.0;
    }
    // Two points always fit exactly
    if n <= 2 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let residual = (1.0 - r) * (1.0 + r);
    if residual <= 0.0 {
        return 0.0;
    }
    let t = r * (df / residual).sqrt();

    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
