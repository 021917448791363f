/// Word choices for numbers.
///
/// Maps trend slopes, coefficients of variation and temperatures onto short
/// qualitative phrases. Every function here is pure.

use chrono::NaiveDate;

use crate::config::UnitSystem;
use crate::model::VariableKind;

/// R² below which any trend is described as stable.
pub const STABLE_R2: f64 = 0.2;

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Verb phrase for a trend, e.g. "showed moderate warming".
///
/// Strength tiers depend on the variable kind: temperature uses |slope| > 0.5
/// and > 0.2 per year, precipitation > 2 and > 1. Other kinds get direction
/// only.
pub fn describe_trend(slope: f64, r_squared: f64, kind: VariableKind) -> String {
    if r_squared < STABLE_R2 {
        return "remained relatively stable".to_string();
    }

    let magnitude = slope.abs();
    let rising = slope > 0.0;

    match kind {
        VariableKind::Temperature => {
            let strength = if magnitude > 0.5 {
                "significant"
            } else if magnitude > 0.2 {
                "moderate"
            } else {
                "slight"
            };
            let direction = if rising { "warming" } else { "cooling" };
            format!("showed {} {}", strength, direction)
        }
        VariableKind::Precipitation => {
            let strength = if magnitude > 2.0 {
                "substantially"
            } else if magnitude > 1.0 {
                "moderately"
            } else {
                "slightly"
            };
            format!("showed a {} {} trend", strength, direction_word(rising))
        }
        _ if rising => "showed an increasing trend".to_string(),
        _ => "showed a decreasing trend".to_string(),
    }
}

fn direction_word(rising: bool) -> &'static str {
    if rising { "increasing" } else { "decreasing" }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

const CELSIUS_BREAKPOINTS: [f64; 5] = [0.0, 8.0, 16.0, 25.0, 32.0];
const FAHRENHEIT_BREAKPOINTS: [f64; 5] = [32.0, 50.0, 65.0, 75.0, 85.0];
const TEMPERATURE_WORDS: [&str; 6] = ["freezing", "cold", "cool", "mild", "warm", "hot"];

/// Adjective for a temperature in the given unit system.
pub fn describe_temperature(value: f64, units: UnitSystem) -> &'static str {
    let breakpoints = match units {
        UnitSystem::Metric => &CELSIUS_BREAKPOINTS,
        UnitSystem::Imperial => &FAHRENHEIT_BREAKPOINTS,
    };
    let bucket = breakpoints.iter().take_while(|b| value >= **b).count();
    TEMPERATURE_WORDS[bucket]
}

// ---------------------------------------------------------------------------
// Variability
// ---------------------------------------------------------------------------

pub fn describe_variability(cv: f64) -> &'static str {
    if cv > 1.0 {
        "highly variable"
    } else if cv > 0.6 {
        "quite variable"
    } else if cv > 0.3 {
        "moderately variable"
    } else {
        "relatively stable"
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Long-form date with a zero-padded day, e.g. "March 04, 2021".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_fit_is_stable_regardless_of_slope() {
        assert_eq!(describe_trend(5.0, 0.1, VariableKind::Temperature), "remained relatively stable");
        assert_eq!(describe_trend(-5.0, 0.19, VariableKind::Precipitation), "remained relatively stable");
        assert_eq!(describe_trend(0.0, 0.0, VariableKind::Wind), "remained relatively stable");
    }

    #[test]
    fn test_temperature_tiers() {
        assert_eq!(describe_trend(0.8, 0.9, VariableKind::Temperature), "showed significant warming");
        assert_eq!(describe_trend(-0.3, 0.9, VariableKind::Temperature), "showed moderate cooling");
        assert_eq!(describe_trend(0.1, 0.9, VariableKind::Temperature), "showed slight warming");
        // Tier bounds are exclusive
        assert_eq!(describe_trend(0.5, 0.9, VariableKind::Temperature), "showed moderate warming");
    }

    #[test]
    fn test_precipitation_tiers() {
        assert_eq!(
            describe_trend(2.5, 0.5, VariableKind::Precipitation),
            "showed a substantially increasing trend"
        );
        assert_eq!(
            describe_trend(-1.5, 0.5, VariableKind::Precipitation),
            "showed a moderately decreasing trend"
        );
        assert_eq!(
            describe_trend(0.4, 0.5, VariableKind::Precipitation),
            "showed a slightly increasing trend"
        );
    }

    #[test]
    fn test_other_kinds_have_no_strength_tier() {
        assert_eq!(describe_trend(9.0, 0.5, VariableKind::Wind), "showed an increasing trend");
        assert_eq!(describe_trend(-0.01, 0.5, VariableKind::Humidity), "showed a decreasing trend");
    }

    #[test]
    fn test_temperature_ladder_celsius() {
        let words: Vec<_> = [-3.0, 0.0, 10.0, 20.0, 30.0, 35.0]
            .iter()
            .map(|t| describe_temperature(*t, UnitSystem::Metric))
            .collect();
        assert_eq!(words, vec!["freezing", "cold", "cool", "mild", "warm", "hot"]);
    }

    #[test]
    fn test_temperature_ladder_fahrenheit() {
        assert_eq!(describe_temperature(20.0, UnitSystem::Imperial), "freezing");
        assert_eq!(describe_temperature(45.0, UnitSystem::Imperial), "cold");
        assert_eq!(describe_temperature(60.0, UnitSystem::Imperial), "cool");
        assert_eq!(describe_temperature(70.0, UnitSystem::Imperial), "mild");
        assert_eq!(describe_temperature(80.0, UnitSystem::Imperial), "warm");
        assert_eq!(describe_temperature(95.0, UnitSystem::Imperial), "hot");
        // A mild Celsius value reads as freezing on the Fahrenheit scale
        assert_ne!(
            describe_temperature(20.0, UnitSystem::Metric),
            describe_temperature(20.0, UnitSystem::Imperial)
        );
    }

    #[test]
    fn test_variability_ladder() {
        assert_eq!(describe_variability(1.2), "highly variable");
        assert_eq!(describe_variability(0.7), "quite variable");
        assert_eq!(describe_variability(0.4), "moderately variable");
        assert_eq!(describe_variability(0.3), "relatively stable");
        assert_eq!(describe_variability(0.0), "relatively stable");
    }

    #[test]
    fn test_format_date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
        assert_eq!(format_date(date), "March 04, 2021");
    }
}
