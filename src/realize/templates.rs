//! Template bank and placeholder substitution.
//!
//! Templates are plain strings with `{field}` placeholders. Every phrasing
//! listed under one key is interchangeable; the realizer picks one at random.

use crate::planner::Fact;

use super::payload::Payload;

/// Phrasings per template key.
static TEMPLATES: &[(&str, &[&str])] = &[
    (
        "overview",
        &[
            "This analysis covers daily weather observations from {station}, spanning {start_date} to {end_date}.",
            "Covering {years} years from {start_date} to {end_date}, this summary draws on {n_records} daily observations from {station}.",
        ],
    ),
    (
        "temperature_summary",
        &[
            "Temperatures averaged {mean}{unit}, ranging from {absolute_min}{unit} to {absolute_max}{unit}.",
            "Over this period, temperatures ranged from {absolute_min}{unit} to {absolute_max}{unit}, with a mean of {mean}{unit}.",
        ],
    ),
    ("temperature_trend", &["Temperature {trend_desc} over the study period."]),
    (
        "temperature_seasonal",
        &[
            "Seasonally, summer months averaged {summer}{unit} while winter months averaged {winter}{unit}, showing a {range}{unit} seasonal variation.",
            "Summers were typically {summer_desc} at {summer}{unit} on average, while winters were {winter_desc} at {winter}{unit}.",
        ],
    ),
    (
        "temperature_yearly",
        &["{highest_year} was the warmest year at {highest_value}{unit}, while {lowest_year} was the coolest at {lowest_value}{unit}."],
    ),
    (
        "temperature_extremes",
        &["The hottest temperature recorded was {highest_value}{unit} on {highest_date}, and the coldest was {lowest_value}{unit} on {lowest_date}."],
    ),
    (
        "precipitation_summary",
        &[
            "Precipitation totaled {total} {unit} over the period, averaging {annual_avg} {unit} annually.",
            "Annual precipitation averaged {annual_avg} {unit}, with a total of {total} {unit} recorded.",
        ],
    ),
    ("precipitation_trend", &["Precipitation {trend_desc} over time."]),
    (
        "precipitation_seasonal",
        &["{wettest_season} was the wettest season at {wettest_value} {unit} per day, while {driest_season} was the driest at {driest_value} {unit}."],
    ),
    (
        "precipitation_yearly",
        &["{highest_year} was the wettest year, averaging {highest_value} {unit} per day, while {lowest_year} was the driest at {lowest_value} {unit}."],
    ),
    (
        "precipitation_extremes",
        &["The heaviest single-day precipitation was {highest_value} {unit} on {highest_date}."],
    ),
    ("other_conditions", &["Other conditions included {conditions_desc}."]),
    (
        "pattern_trends_single",
        &["Notably, {var1} showed a strong {direction1} trend over the period."],
    ),
    (
        "pattern_trends_multi",
        &["Notably, {var1} and {var2} both showed strong trends over the period."],
    ),
    (
        "pattern_correlation",
        &[
            "The variables {vars} were the most strongly correlated, and their relationship was {relationship}.",
            "The strongest relationship in the data was between {vars}, with a correlation of {r} ({relationship}).",
        ],
    ),
];

/// Registry key for a fact. Trend patterns switch phrasing by how many
/// variables they name.
pub fn template_key(fact: &Fact) -> String {
    match fact {
        Fact::PatternTrends { trends } if trends.len() == 1 => "pattern_trends_single".to_string(),
        Fact::PatternTrends { .. } => "pattern_trends_multi".to_string(),
        _ => fact.kind(),
    }
}

pub fn templates_for(key: &str) -> Option<&'static [&'static str]> {
    TEMPLATES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, phrasings)| *phrasings)
}

/// Substitutes every `{field}` in `template`. Returns the first field the
/// payload lacks as the error.
pub fn fill(template: &'static str, payload: &Payload) -> Result<String, &'static str> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // Unbalanced brace: keep the remainder verbatim
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let field = &after[..close];
        out.push_str(payload.get(field).ok_or(field)?);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
