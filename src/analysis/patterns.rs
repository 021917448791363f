//! Cross-variable patterns.
//!
//! Runs after every per-group bundle exists: strongest trends and the most
//! variable group are read from those bundles, while correlations are
//! recomputed from the table's primary columns.

use std::cmp::Ordering;

use crate::analysis::descriptive::pearson_correlation;
use crate::config::AnalysisSettings;
use crate::model::{
    Correlation, CrossVariablePatterns, GroupStatistics, MostVariable, ObservationTable,
    Relationship, TrendHighlight, VariableGroup,
};

pub fn detect_cross_variable_patterns(
    table: &ObservationTable,
    schema: &[VariableGroup],
    groups: &[GroupStatistics],
    settings: &AnalysisSettings,
) -> CrossVariablePatterns {
    CrossVariablePatterns {
        strongest_trends: strongest_trends(groups, settings),
        most_variable: most_variable(groups, settings.most_variable_cv),
        correlations: correlations(table, schema, groups, settings.correlation_strength),
    }
}

/// Groups whose trend R² exceeds the pattern bar, strongest first. Equal R²
/// keep schema order.
fn strongest_trends(groups: &[GroupStatistics], settings: &AnalysisSettings) -> Vec<TrendHighlight> {
    let mut trending: Vec<TrendHighlight> = groups
        .iter()
        .filter(|g| g.trend.r_squared > settings.trend_pattern_r2)
        .map(|g| TrendHighlight {
            name: g.name.clone(),
            r_squared: g.trend.r_squared,
            direction: g.trend.direction,
            slope: g.trend.slope,
        })
        .collect();

    trending.sort_by(|a, b| b.r_squared.partial_cmp(&a.r_squared).unwrap_or(Ordering::Equal));
    trending.truncate(settings.max_strongest_trends);
    trending
}

/// Group with the highest coefficient of variation, if it exceeds `min_cv`.
fn most_variable(groups: &[GroupStatistics], min_cv: f64) -> Option<MostVariable> {
    let mut best: Option<&GroupStatistics> = None;
    for group in groups {
        let cv = group.summary.coefficient_of_variation;
        if best.is_none_or(|b| cv > b.summary.coefficient_of_variation) {
            best = Some(group);
        }
    }

    best.filter(|g| g.summary.coefficient_of_variation > min_cv)
        .map(|g| MostVariable {
            variable: g.name.clone(),
            cv: g.summary.coefficient_of_variation,
        })
}

/// Every unordered pair of analyzed groups, in schema order, whose primary
/// columns correlate with |r| above `min_strength`.
fn correlations(
    table: &ObservationTable,
    schema: &[VariableGroup],
    groups: &[GroupStatistics],
    min_strength: f64,
) -> Vec<Correlation> {
    let present: Vec<(&VariableGroup, &[f64])> = schema
        .iter()
        .filter(|g| groups.iter().any(|s| s.name == g.name))
        .filter_map(|g| table.column(&g.primary).map(|values| (g, values)))
        .collect();

    let mut found = Vec::new();
    for (i, (first, a)) in present.iter().enumerate() {
        for (second, b) in &present[i + 1..] {
            let Some(r) = pearson_correlation(a, b) else {
                continue;
            };
            if r.abs() > min_strength {
                found.push(Correlation {
                    pair: format!("{}_and_{}", first.name, second.name),
                    first: first.name.clone(),
                    second: second.name.clone(),
                    correlation: r,
                    relationship: if r < 0.0 { Relationship::Inverse } else { Relationship::Direct },
                });
            }
        }
    }
    found
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Summary, Trend, TrendDirection, VariableKind};
    use chrono::NaiveDate;

    fn stats(name: &str, r_squared: f64, cv: f64) -> GroupStatistics {
        GroupStatistics {
            name: name.to_string(),
            kind: VariableKind::from_group_name(name),
            summary: Summary {
                count: 10,
                mean: 10.0,
                std: 10.0 * cv,
                min: 0.0,
                max: 20.0,
                coefficient_of_variation: cv,
            },
            range: None,
            trend: Trend {
                slope: 1.0,
                r_value: r_squared.sqrt(),
                r_squared,
                p_value: 0.01,
                direction: TrendDirection::Increasing,
            },
            seasonal: None,
            yearly: None,
            extremes: None,
            optional_features: None,
        }
    }

    #[test]
    fn test_strongest_trends_truncate_and_keep_schema_order_on_ties() {
        let groups = vec![
            stats("a", 0.9, 0.1),
            stats("b", 0.5, 0.1),
            stats("c", 0.9, 0.1),
            stats("d", 0.2, 0.1),
        ];
        let trends = strongest_trends(&groups, &AnalysisSettings::default());
        let names: Vec<_> = trends.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);

        let wide = AnalysisSettings { max_strongest_trends: 5, ..AnalysisSettings::default() };
        let names: Vec<_> = strongest_trends(&groups, &wide).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "c", "b"], "r² 0.2 stays below the bar");
    }

    #[test]
    fn test_most_variable_cutoff_is_strict() {
        let groups = vec![stats("a", 0.0, 0.4), stats("b", 0.0, 0.5)];
        assert!(most_variable(&groups, 0.5).is_none());

        let groups = vec![stats("a", 0.0, 0.7), stats("b", 0.0, 0.7), stats("c", 0.0, 0.2)];
        let most = most_variable(&groups, 0.5).expect("cv above the bar");
        assert_eq!(most.variable, "a", "first group wins ties");
        assert_eq!(most.cv, 0.7);
    }

    #[test]
    fn test_correlations_skip_constant_and_unanalyzed_columns() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..10).map(|i| start + chrono::Duration::days(i)).collect();
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 50.0 - 2.0 * v).collect();
        let table = ObservationTable::new(dates)
            .with_column("x", x.clone())
            .and_then(|t| t.with_column("y", y))
            .and_then(|t| t.with_column("flat", vec![3.0; 10]))
            .and_then(|t| t.with_column("w", x))
            .expect("valid table");
        let schema = vec![
            VariableGroup::new("first", "x"),
            VariableGroup::new("second", "y"),
            VariableGroup::new("constant", "flat"),
            VariableGroup::new("unanalyzed", "w"),
        ];
        let groups = vec![stats("first", 0.0, 0.1), stats("second", 0.0, 0.1), stats("constant", 0.0, 0.0)];

        let found = correlations(&table, &schema, &groups, 0.5);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pair, "first_and_second");
        assert_eq!(found[0].relationship, Relationship::Inverse);
        assert!((found[0].correlation + 1.0).abs() < 1e-9);
    }
}
