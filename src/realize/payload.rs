//! Per-fact payload preparation.
//!
//! Turns a fact's raw statistics into the named, already formatted strings
//! its templates substitute: trend descriptions, relationship words, dates,
//! unit labels and derived totals. A field that cannot be derived is simply
//! left out; the template that needs it then reports it missing.

use crate::config::UnitSystem;
use crate::lexicon::{describe_temperature, describe_trend, format_date};
use crate::model::{
    BasicInfo, Correlation, ExtremeValue, Extremes, GroupStatistics, Relationship, Seasonal,
    Summary, TrendHighlight, ValueRange, VariableKind, Yearly,
};
use crate::planner::Fact;

/// Named template fields, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Vec<(&'static str, String)>,
}

impl Payload {
    /// Sets a field, replacing an earlier value of the same name.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    fn set_opt(&mut self, name: &'static str, value: Option<String>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

/// Unit label appended to values of a variable kind; empty when unitless.
pub fn unit_label(kind: VariableKind, units: UnitSystem) -> &'static str {
    match kind {
        VariableKind::Temperature => units.temperature_label(),
        VariableKind::Precipitation | VariableKind::Rain => units.precipitation_label(),
        VariableKind::Snow => units.snow_label(),
        VariableKind::Wind => units.wind_label(),
        VariableKind::Humidity => "%",
        VariableKind::PrecipitationHours => "hours",
        VariableKind::Sunshine => "seconds",
        VariableKind::Other => "",
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn prepare(fact: &Fact, units: UnitSystem) -> Payload {
    let mut payload = Payload::default();

    match fact {
        Fact::Overview { basic } => overview(&mut payload, basic),
        Fact::Summary { kind, summary, range, .. } => {
            payload.set("unit", unit_label(*kind, units));
            summary_fields(&mut payload, summary, *range);
        }
        Fact::Trend { kind, trend, .. } => {
            payload.set("trend_desc", describe_trend(trend.slope, trend.r_squared, *kind));
        }
        Fact::Seasonal { kind, seasonal, .. } => {
            payload.set("unit", unit_label(*kind, units));
            seasonal_fields(&mut payload, seasonal, *kind, units);
        }
        Fact::Yearly { kind, yearly, .. } => {
            payload.set("unit", unit_label(*kind, units));
            yearly_fields(&mut payload, yearly);
        }
        Fact::Extremes { kind, extremes, .. } => {
            payload.set("unit", unit_label(*kind, units));
            extremes_fields(&mut payload, extremes, *kind);
        }
        Fact::OtherConditions { variables } => {
            payload.set_opt("conditions_desc", describe_conditions(variables, units));
        }
        Fact::PatternTrends { trends } => pattern_trend_fields(&mut payload, trends),
        Fact::PatternCorrelation { correlation } => correlation_fields(&mut payload, correlation),
    }

    payload
}

// ---------------------------------------------------------------------------
// Per-fact fields
// ---------------------------------------------------------------------------

fn overview(payload: &mut Payload, basic: &BasicInfo) {
    payload.set("station", basic.station_name.clone());
    payload.set("start_date", format_date(basic.start_date));
    payload.set("end_date", format_date(basic.end_date));
    payload.set("n_records", basic.n_records.to_string());
    payload.set("years", one_decimal(basic.n_years));
}

/// Range sides fall back to the primary column's own min and max.
fn summary_fields(payload: &mut Payload, summary: &Summary, range: Option<&ValueRange>) {
    let absolute_min = range.and_then(|r| r.absolute_min).unwrap_or(summary.min);
    let absolute_max = range.and_then(|r| r.absolute_max).unwrap_or(summary.max);

    payload.set("mean", one_decimal(summary.mean));
    payload.set("absolute_min", one_decimal(absolute_min));
    payload.set("absolute_max", one_decimal(absolute_max));
    payload.set("total", one_decimal(summary.mean * summary.count as f64));
    payload.set("annual_avg", one_decimal(summary.mean * 365.25));
}

fn seasonal_fields(payload: &mut Payload, seasonal: &Seasonal, kind: VariableKind, units: UnitSystem) {
    let seasons = [
        ("Winter", "winter", "winter_desc", seasonal.winter),
        ("Spring", "spring", "spring_desc", seasonal.spring),
        ("Summer", "summer", "summer_desc", seasonal.summer),
        ("Fall", "fall", "fall_desc", seasonal.fall),
    ];

    for (_, field, desc_field, mean) in seasons {
        let Some(mean) = mean else { continue };
        payload.set(field, one_decimal(mean));
        if kind == VariableKind::Temperature {
            payload.set(desc_field, describe_temperature(mean, units));
        }
    }
    payload.set("range", one_decimal(seasonal.range));

    // First season wins ties
    let present: Vec<(&str, f64)> = seasons
        .iter()
        .filter_map(|(label, _, _, mean)| mean.map(|m| (*label, m)))
        .collect();
    let wettest = present.iter().copied().reduce(|best, s| if s.1 > best.1 { s } else { best });
    let driest = present.iter().copied().reduce(|best, s| if s.1 < best.1 { s } else { best });
    if let (Some(wettest), Some(driest)) = (wettest, driest) {
        payload.set("wettest_season", wettest.0);
        payload.set("wettest_value", format!("{:.2}", wettest.1));
        payload.set("driest_season", driest.0);
        payload.set("driest_value", format!("{:.2}", driest.1));
    }
}

fn yearly_fields(payload: &mut Payload, yearly: &Yearly) {
    payload.set("highest_year", yearly.highest_year.to_string());
    payload.set("highest_value", one_decimal(yearly.highest_value));
    payload.set("lowest_year", yearly.lowest_year.to_string());
    payload.set("lowest_value", one_decimal(yearly.lowest_value));
}

/// Precipitation extremes keep two decimals; small daily totals matter.
fn extremes_fields(payload: &mut Payload, extremes: &Extremes, kind: VariableKind) {
    let value = |e: &ExtremeValue| match kind {
        VariableKind::Precipitation | VariableKind::Rain => format!("{:.2}", e.value),
        _ => one_decimal(e.value),
    };

    if let Some(highest) = &extremes.highest {
        payload.set("highest_value", value(highest));
        payload.set("highest_date", format_date(highest.date));
    }
    if let Some(lowest) = &extremes.lowest {
        payload.set("lowest_value", value(lowest));
        payload.set("lowest_date", format_date(lowest.date));
    }
}

fn pattern_trend_fields(payload: &mut Payload, trends: &[TrendHighlight]) {
    if let Some(first) = trends.first() {
        payload.set("var1", spaced(&first.name));
        payload.set("direction1", first.direction.to_string());
    }
    if let Some(second) = trends.get(1) {
        payload.set("var2", spaced(&second.name));
        payload.set("direction2", second.direction.to_string());
    }
}

fn correlation_fields(payload: &mut Payload, correlation: &Correlation) {
    payload.set(
        "vars",
        format!("{} and {}", spaced(&correlation.first), spaced(&correlation.second)),
    );
    payload.set(
        "relationship",
        match correlation.relationship {
            Relationship::Inverse => "inverse",
            Relationship::Direct => "positive",
        },
    );
    payload.set("r", format!("{:.2}", correlation.correlation));
}

fn spaced(name: &str) -> String {
    name.replace('_', " ")
}

// ---------------------------------------------------------------------------
// Combined conditions
// ---------------------------------------------------------------------------

/// One phrase per secondary variable, joined as natural-language list.
/// `None` for an empty list.
pub fn describe_conditions(groups: &[&GroupStatistics], units: UnitSystem) -> Option<String> {
    let phrases: Vec<String> = groups.iter().map(|g| condition_phrase(g, units)).collect();
    join_phrases(&phrases)
}

fn condition_phrase(group: &GroupStatistics, units: UnitSystem) -> String {
    let mean = group.summary.mean;
    match group.kind {
        VariableKind::Wind => format!("winds averaging {:.1} {}", mean, units.wind_label()),
        VariableKind::Humidity => format!("{:.1}% humidity", mean),
        VariableKind::Rain => format!("rain averaging {:.1} {}", mean, units.precipitation_label()),
        VariableKind::Snow => format!("snowfall averaging {:.1} {}", mean, units.snow_label()),
        VariableKind::Precipitation => {
            format!("precipitation averaging {:.1} {}", mean, units.precipitation_label())
        }
        VariableKind::Temperature => format!("temperatures averaging {:.1}{}", mean, units.temperature_label()),
        VariableKind::PrecipitationHours => format!("{:.1} hours of precipitation per day", mean),
        // Sunshine duration is recorded in seconds
        VariableKind::Sunshine => format!("{:.1} hours of sunshine per day", mean / 3600.0),
        VariableKind::Other => format!("{} averaging {:.1}", spaced(&group.name), mean),
    }
}

/// "a", "a and b", "a, b, and c".
pub fn join_phrases(phrases: &[String]) -> Option<String> {
    match phrases {
        [] => None,
        [only] => Some(only.clone()),
        [first, second] => Some(format!("{} and {}", first, second)),
        [init @ .., last] => Some(format!("{}, and {}", init.join(", "), last)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
