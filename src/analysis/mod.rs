/// Dataset analysis for the weather summary pipeline.
///
/// `analyze` turns an observation table and a variable-group schema into a
/// `DatasetStatistics` bundle. Each group's sub-bundles are computed
/// independently; a sub-bundle that cannot be formed is `None` (or, for the
/// trend, the degenerate trend) and never aborts the others. Groups whose
/// primary column is absent from the table are skipped entirely.
///
/// Submodules:
/// - `descriptive` — summary, range, extremes, comparison columns, Pearson r.
/// - `trend` — least-squares trend against fractional year.
/// - `calendar` — seasonal and calendar-year aggregates.
/// - `patterns` — cross-variable patterns over the finished bundles.

pub mod calendar;
pub mod descriptive;
pub mod patterns;
pub mod trend;

use crate::config::AnalysisSettings;
use crate::logging::{self, Stage};
use crate::model::{
    BasicInfo, DatasetStatistics, GroupStatistics, ObservationTable, SummaryError, VariableGroup,
};

/// Analyze with the default analysis cut-offs.
pub fn analyze(
    table: &ObservationTable,
    variable_groups: &[VariableGroup],
    station_name: &str,
) -> Result<DatasetStatistics, SummaryError> {
    analyze_with(table, variable_groups, station_name, &AnalysisSettings::default())
}

/// Build the full statistics bundle.
///
/// Fails only on an empty table, for which the dataset period is undefined.
pub fn analyze_with(
    table: &ObservationTable,
    variable_groups: &[VariableGroup],
    station_name: &str,
    settings: &AnalysisSettings,
) -> Result<DatasetStatistics, SummaryError> {
    let basic = basic_info(table, station_name)?;

    let mut groups = Vec::new();
    for group in variable_groups {
        match analyze_group(table, group, settings) {
            Some(stats) => groups.push(stats),
            None => logging::debug(
                Stage::Analyzer,
                Some(group.name.as_str()),
                &format!("primary column '{}' not in data, skipped", group.primary),
            ),
        }
    }
    logging::log_analysis_summary(
        variable_groups.len(),
        groups.len(),
        variable_groups.len() - groups.len(),
    );

    // Patterns read the finished per-group bundles
    let patterns = patterns::detect_cross_variable_patterns(table, variable_groups, &groups, settings);

    Ok(DatasetStatistics {
        basic,
        groups,
        patterns,
    })
}

fn basic_info(table: &ObservationTable, station_name: &str) -> Result<BasicInfo, SummaryError> {
    let dates = table.dates();
    let (Some(start_date), Some(end_date)) = (dates.iter().min(), dates.iter().max()) else {
        return Err(SummaryError::EmptyTable);
    };

    Ok(BasicInfo {
        start_date: *start_date,
        end_date: *end_date,
        n_records: table.len(),
        n_years: (*end_date - *start_date).num_days() as f64 / 365.25,
        station_name: station_name.to_string(),
    })
}

/// Statistics for one group, or `None` when its primary column is absent.
pub fn analyze_group(
    table: &ObservationTable,
    group: &VariableGroup,
    settings: &AnalysisSettings,
) -> Option<GroupStatistics> {
    let values = table.column(&group.primary)?;
    let dates = table.dates();

    Some(GroupStatistics {
        name: group.name.clone(),
        kind: group.kind(),
        summary: descriptive::summarize(values),
        range: descriptive::value_range(table, group),
        trend: trend::detect_trend(dates, values),
        seasonal: calendar::seasonal_means(dates, values),
        yearly: calendar::yearly_comparison(dates, values),
        extremes: descriptive::extremes(table, group),
        optional_features: descriptive::comparison_features(table, group, settings.comparison_difference),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
