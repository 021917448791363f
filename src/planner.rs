/// Content planning: which findings make it into the summary.
///
/// `select_content` walks a finished `DatasetStatistics` and emits an ordered
/// list of facts. Order is fixed: the overview, then each primary variable
/// (summary always, then trend, seasonal, yearly and extremes when they
/// qualify), then one combined fact for notable secondary variables, then the
/// cross-variable patterns. The statistics are only borrowed; facts point into
/// them.

use serde::Serialize;

use crate::config::{CorrelationRanking, PlannerSettings, Thresholds};
use crate::logging::{self, Stage};
use crate::model::{
    BasicInfo, Correlation, DatasetStatistics, Extremes, GroupStatistics, Seasonal, Summary, Trend,
    TrendHighlight, ValueRange, VariableKind, Yearly,
};

// ---------------------------------------------------------------------------
// Fact vocabulary
// ---------------------------------------------------------------------------

/// One finding selected for narration, borrowing its payload from the
/// statistics bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fact", rename_all = "snake_case")]
pub enum Fact<'a> {
    Overview {
        basic: &'a BasicInfo,
    },
    Summary {
        variable: &'a str,
        kind: VariableKind,
        summary: &'a Summary,
        range: Option<&'a ValueRange>,
    },
    Trend {
        variable: &'a str,
        kind: VariableKind,
        trend: &'a Trend,
    },
    Seasonal {
        variable: &'a str,
        kind: VariableKind,
        seasonal: &'a Seasonal,
    },
    Yearly {
        variable: &'a str,
        kind: VariableKind,
        yearly: &'a Yearly,
    },
    Extremes {
        variable: &'a str,
        kind: VariableKind,
        extremes: &'a Extremes,
    },
    /// Notable secondary variables, in schema order.
    OtherConditions {
        variables: Vec<&'a GroupStatistics>,
    },
    PatternTrends {
        trends: &'a [TrendHighlight],
    },
    PatternCorrelation {
        correlation: &'a Correlation,
    },
}

impl Fact<'_> {
    /// Template key, e.g. `"overview"` or `"temperature_trend"`.
    pub fn kind(&self) -> String {
        match self {
            Fact::Overview { .. } => "overview".to_string(),
            Fact::Summary { variable, .. } => format!("{}_summary", variable),
            Fact::Trend { variable, .. } => format!("{}_trend", variable),
            Fact::Seasonal { variable, .. } => format!("{}_seasonal", variable),
            Fact::Yearly { variable, .. } => format!("{}_yearly", variable),
            Fact::Extremes { variable, .. } => format!("{}_extremes", variable),
            Fact::OtherConditions { .. } => "other_conditions".to_string(),
            Fact::PatternTrends { .. } => "pattern_trends".to_string(),
            Fact::PatternCorrelation { .. } => "pattern_correlation".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

pub fn select_content<'a>(
    stats: &'a DatasetStatistics,
    thresholds: &Thresholds,
    settings: &PlannerSettings,
) -> Vec<Fact<'a>> {
    let mut facts = vec![Fact::Overview { basic: &stats.basic }];

    for name in &settings.primary_variables {
        match stats.group(name) {
            Some(group) => plan_primary(group, thresholds, &mut facts),
            None => logging::debug(Stage::Planner, Some(name.as_str()), "primary variable not analyzed"),
        }
    }

    let notable: Vec<&GroupStatistics> = stats
        .groups
        .iter()
        .filter(|g| !settings.primary_variables.contains(&g.name))
        .filter(|g| is_notable_secondary(g, thresholds, settings.secondary_cv_threshold))
        .collect();
    if !notable.is_empty() {
        facts.push(Fact::OtherConditions { variables: notable });
    }

    let patterns = &stats.patterns;
    if !patterns.strongest_trends.is_empty() {
        facts.push(Fact::PatternTrends {
            trends: &patterns.strongest_trends,
        });
    }
    if let Some(correlation) = strongest_correlation(&patterns.correlations, settings.correlation_ranking) {
        facts.push(Fact::PatternCorrelation { correlation });
    }

    logging::debug(
        Stage::Planner,
        None,
        &format!("{} facts selected", facts.len()),
    );
    facts
}

fn plan_primary<'a>(group: &'a GroupStatistics, thresholds: &Thresholds, facts: &mut Vec<Fact<'a>>) {
    let variable = group.name.as_str();
    let kind = group.kind;

    facts.push(Fact::Summary {
        variable,
        kind,
        summary: &group.summary,
        range: group.range.as_ref(),
    });

    if is_trend_significant(&group.trend, thresholds) {
        facts.push(Fact::Trend {
            variable,
            kind,
            trend: &group.trend,
        });
    } else {
        logging::debug(
            Stage::Planner,
            Some(variable),
            &format!(
                "trend omitted (r²={:.3}, p={:.3})",
                group.trend.r_squared, group.trend.p_value
            ),
        );
    }

    if let Some(seasonal) = &group.seasonal {
        facts.push(Fact::Seasonal {
            variable,
            kind,
            seasonal,
        });
    }

    if let Some(yearly) = group.yearly.as_ref().filter(|y| is_yearly_notable(y, thresholds)) {
        facts.push(Fact::Yearly {
            variable,
            kind,
            yearly,
        });
    }

    if let Some(extremes) = &group.extremes {
        facts.push(Fact::Extremes {
            variable,
            kind,
            extremes,
        });
    }
}

/// R² at least `r2_threshold` and p-value strictly below `p_value_threshold`.
pub fn is_trend_significant(trend: &Trend, thresholds: &Thresholds) -> bool {
    trend.r_squared >= thresholds.r2_threshold && trend.p_value < thresholds.p_value_threshold
}

/// Either the highest or the lowest year deviates by at least
/// `extreme_threshold` standard deviations.
pub fn is_yearly_notable(yearly: &Yearly, thresholds: &Thresholds) -> bool {
    yearly.highest_zscore.abs() >= thresholds.extreme_threshold
        || yearly.lowest_zscore.abs() >= thresholds.extreme_threshold
}

/// High variability, a strong trend, or an extreme highest year. All three
/// comparisons are strict.
pub fn is_notable_secondary(group: &GroupStatistics, thresholds: &Thresholds, cv_threshold: f64) -> bool {
    if group.summary.coefficient_of_variation > cv_threshold {
        return true;
    }
    if group.trend.r_squared > thresholds.r2_threshold {
        return true;
    }
    group
        .yearly
        .as_ref()
        .is_some_and(|y| y.highest_zscore.abs() > thresholds.extreme_threshold)
}

/// The single correlation worth narrating. With signed ranking only positive
/// coefficients qualify. Ties keep the earlier pair.
fn strongest_correlation(correlations: &[Correlation], ranking: CorrelationRanking) -> Option<&Correlation> {
    let score = |c: &Correlation| match ranking {
        CorrelationRanking::Absolute => c.correlation.abs(),
        CorrelationRanking::Signed => c.correlation,
    };

    let mut best: Option<&Correlation> = None;
    let mut best_score = 0.0;
    for candidate in correlations {
        let s = score(candidate);
        if s > best_score {
            best = Some(candidate);
            best_score = s;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
