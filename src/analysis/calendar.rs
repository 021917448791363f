//! Seasonal and calendar-year aggregation.
//!
//! Seasons are meteorological: December–February winter, March–May spring,
//! June–August summer, September–November fall. December belongs to the
//! winter of its own calendar year; there is no season-year rollover.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::analysis::descriptive::{mean, sample_std};
use crate::model::{Seasonal, Yearly};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn of_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }
}

/// Mean per season of `values`. `None` only when there are no rows.
pub fn seasonal_means(dates: &[NaiveDate], values: &[f64]) -> Option<Seasonal> {
    let mut buckets: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
    for (date, value) in dates.iter().zip(values) {
        buckets.entry(Season::of_month(date.month())).or_default().push(*value);
    }
    if buckets.is_empty() {
        return None;
    }

    let means: BTreeMap<Season, f64> = buckets.iter().map(|(s, v)| (*s, mean(v))).collect();
    let highest = means.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = means.values().copied().fold(f64::INFINITY, f64::min);

    Some(Seasonal {
        winter: means.get(&Season::Winter).copied(),
        spring: means.get(&Season::Spring).copied(),
        summer: means.get(&Season::Summer).copied(),
        fall: means.get(&Season::Fall).copied(),
        range: highest - lowest,
    })
}

/// Compares calendar-year means to find the highest and lowest years.
///
/// The z-scores are measured against the mean and sample standard deviation
/// of the yearly means, and are 0 when that deviation is 0 (including a
/// single year). Ties go to the earlier year.
pub fn yearly_comparison(dates: &[NaiveDate], values: &[f64]) -> Option<Yearly> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (date, value) in dates.iter().zip(values) {
        by_year.entry(date.year()).or_default().push(*value);
    }
    if by_year.is_empty() {
        return None;
    }

    let yearly: Vec<(i32, f64)> = by_year.iter().map(|(y, v)| (*y, mean(v))).collect();
    let means: Vec<f64> = yearly.iter().map(|(_, m)| *m).collect();
    let yearly_mean = mean(&means);
    let yearly_std = sample_std(&means);

    let mut highest = yearly[0];
    let mut lowest = yearly[0];
    for &(year, value) in &yearly[1..] {
        if value > highest.1 {
            highest = (year, value);
        }
        if value < lowest.1 {
            lowest = (year, value);
        }
    }

    let zscore = |value: f64| {
        if yearly_std > 0.0 {
            (value - yearly_mean) / yearly_std
        } else {
            0.0
        }
    };

    Some(Yearly {
        yearly_mean,
        yearly_std,
        highest_year: highest.0,
        highest_value: highest.1,
        highest_zscore: zscore(highest.1),
        lowest_year: lowest.0,
        lowest_value: lowest.1,
        lowest_zscore: zscore(lowest.1),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
