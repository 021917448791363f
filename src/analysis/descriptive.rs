//! Descriptive statistics over single columns: summary, range, extremes,
//! comparison-column differences and pairwise Pearson correlation.

use crate::model::{
    ComparisonFeature, ExtremeValue, Extremes, ObservationTable, Summary, ValueRange, VariableGroup,
};

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator); 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Summary of a non-empty column.
pub fn summarize(values: &[f64]) -> Summary {
    let mean = mean(values);
    let std = sample_std(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Summary {
        count: values.len(),
        mean,
        std,
        min,
        max,
        coefficient_of_variation: if mean != 0.0 { std / mean } else { 0.0 },
    }
}

// ---------------------------------------------------------------------------
// Range and extremes
// ---------------------------------------------------------------------------

/// Absolute bounds from the group's supporting columns. A column containing
/// `min` sets the lower bound, otherwise one containing `max` sets the upper
/// bound; the first matching column present in the table wins.
pub fn value_range(table: &ObservationTable, group: &VariableGroup) -> Option<ValueRange> {
    let mut absolute_min = None;
    let mut absolute_max = None;

    for name in &group.supporting {
        let Some(values) = table.column(name) else {
            continue;
        };
        let lower = name.to_lowercase();
        if lower.contains("min") {
            if absolute_min.is_none() {
                absolute_min = values.iter().copied().reduce(f64::min);
            }
        } else if lower.contains("max") && absolute_max.is_none() {
            absolute_max = values.iter().copied().reduce(f64::max);
        }
    }

    if absolute_min.is_none() && absolute_max.is_none() {
        None
    } else {
        Some(ValueRange {
            absolute_min,
            absolute_max,
        })
    }
}

/// Highest and lowest single-day values.
///
/// The highest value comes from the first supporting column containing
/// `max` that the table has (the lowest from one containing `min`), falling
/// back to the primary column. Ties resolve to the earliest row in table order.
pub fn extremes(table: &ObservationTable, group: &VariableGroup) -> Option<Extremes> {
    let max_col = present_supporting(table, group, "max").unwrap_or(group.primary.as_str());
    let min_col = present_supporting(table, group, "min").unwrap_or(group.primary.as_str());

    let highest = table
        .column(max_col)
        .and_then(|values| first_index_by(values, |candidate, best| candidate > best))
        .map(|i| extreme_at(table, max_col, i));
    let lowest = table
        .column(min_col)
        .and_then(|values| first_index_by(values, |candidate, best| candidate < best))
        .map(|i| extreme_at(table, min_col, i));

    if highest.is_none() && lowest.is_none() {
        None
    } else {
        Some(Extremes { highest, lowest })
    }
}

/// First supporting column containing `token` that the table actually has.
fn present_supporting<'a>(table: &ObservationTable, group: &'a VariableGroup, token: &str) -> Option<&'a str> {
    group
        .supporting
        .iter()
        .find(|c| c.to_lowercase().contains(token) && table.has_column(c))
        .map(String::as_str)
}

/// Index of the first value that no later value `beats`.
fn first_index_by(values: &[f64], beats: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if !beats(v, values[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

fn extreme_at(table: &ObservationTable, column: &str, row: usize) -> ExtremeValue {
    let values = table.column(column).unwrap_or_default();
    ExtremeValue {
        value: values[row],
        date: table.dates()[row],
    }
}

// ---------------------------------------------------------------------------
// Comparison columns
// ---------------------------------------------------------------------------

/// Comparison columns whose mean absolute difference from the primary column
/// exceeds `threshold`.
pub fn comparison_features(
    table: &ObservationTable,
    group: &VariableGroup,
    threshold: f64,
) -> Option<Vec<ComparisonFeature>> {
    let primary = table.column(&group.primary)?;

    let features: Vec<ComparisonFeature> = group
        .comparison
        .iter()
        .filter_map(|name| table.column(name).map(|values| (name, values)))
        .filter_map(|(name, values)| {
            let diffs: Vec<f64> = values.iter().zip(primary).map(|(c, p)| c - p).collect();
            let abs_diffs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
            let avg_difference = mean(&abs_diffs);
            (avg_difference > threshold).then(|| ComparisonFeature {
                column: name.clone(),
                avg_difference,
                is_negative: mean(&diffs) < 0.0,
            })
        })
        .collect();

    if features.is_empty() { None } else { Some(features) }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient of two equally long columns.
///
/// Returns `None` when either column has no variance (or fewer than two
/// values), where the coefficient is undefined. The result is symmetric in
/// its arguments.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }

    if saa <= 0.0 || sbb <= 0.0 {
        return None;
    }
    Some((sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
