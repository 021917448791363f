/// Template realization: facts in, sentences out.
///
/// Each fact kind maps to one or more interchangeable phrasings; one is drawn
/// per call from the realizer's random source. Pass a seeded `StdRng` to get
/// repeatable output. A fact that cannot be rendered is returned as
/// `Realization::Skipped` with the reason, never as an error.

pub mod payload;
pub mod templates;

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::UnitSystem;
use crate::logging::{self, SkipSeverity};
use crate::model::GroupStatistics;
use crate::planner::Fact;

use payload::{Payload, describe_conditions, prepare};
use templates::{fill, template_key, templates_for};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No phrasing is registered for the fact kind.
    NoTemplate,
    /// The chosen phrasing needs a field the fact could not supply.
    MissingField(&'static str),
}

impl SkipReason {
    pub fn severity(&self) -> SkipSeverity {
        match self {
            SkipReason::NoTemplate => SkipSeverity::Expected,
            SkipReason::MissingField(_) => SkipSeverity::Unexpected,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoTemplate => write!(f, "no template registered"),
            SkipReason::MissingField(field) => write!(f, "missing field '{}'", field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Realization {
    Text(String),
    Skipped { kind: String, reason: SkipReason },
}

impl Realization {
    pub fn text(&self) -> Option<&str> {
        match self {
            Realization::Text(text) => Some(text.as_str()),
            Realization::Skipped { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Realizer
// ---------------------------------------------------------------------------

pub struct TemplateRealizer<R: Rng = StdRng> {
    units: UnitSystem,
    rng: R,
}

impl TemplateRealizer<StdRng> {
    /// Realizer with an entropy-seeded phrasing choice.
    pub fn new(units: UnitSystem) -> Self {
        Self::with_rng(units, StdRng::from_entropy())
    }

    pub fn with_seed(units: UnitSystem, seed: u64) -> Self {
        Self::with_rng(units, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TemplateRealizer<R> {
    pub fn with_rng(units: UnitSystem, rng: R) -> Self {
        Self { units, rng }
    }

    /// Renders one fact.
    pub fn realize(&mut self, fact: &Fact) -> Realization {
        let key = template_key(fact);
        let payload = prepare(fact, self.units);
        self.render(fact.kind(), &key, &payload)
    }

    /// Renders the secondary-variable sentence directly from group bundles.
    /// An empty list renders nothing and the skip is logged.
    pub fn realize_combined_conditions(&mut self, groups: &[&GroupStatistics]) -> String {
        let mut payload = Payload::default();
        if let Some(desc) = describe_conditions(groups, self.units) {
            payload.set("conditions_desc", desc);
        }

        let kind = "other_conditions".to_string();
        match self.render(kind.clone(), &kind, &payload) {
            Realization::Text(text) => text,
            Realization::Skipped { kind, reason } => {
                logging::log_skipped_fact(&kind, reason.severity(), &reason.to_string());
                String::new()
            }
        }
    }

    fn render(&mut self, kind: String, key: &str, payload: &Payload) -> Realization {
        let Some(template) = templates_for(key).and_then(|t| t.choose(&mut self.rng)).copied() else {
            return Realization::Skipped {
                kind,
                reason: SkipReason::NoTemplate,
            };
        };

        match fill(template, payload) {
            Ok(text) => Realization::Text(text),
            Err(field) => Realization::Skipped {
                kind,
                reason: SkipReason::MissingField(field),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BasicInfo, Correlation, Relationship, Seasonal, Summary, Trend, TrendDirection,
        TrendHighlight, ValueRange, VariableKind,
    };
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn basic() -> BasicInfo {
        BasicInfo {
            start_date: day(2019, 1, 1),
            end_date: day(2021, 12, 31),
            n_records: 1096,
            n_years: 2.9979,
            station_name: "Peoria, IL".to_string(),
        }
    }

    fn temperature_trend(slope: f64, r_squared: f64) -> Trend {
        Trend {
            slope,
            r_value: r_squared.sqrt(),
            r_squared,
            p_value: 0.0,
            direction: TrendDirection::Increasing,
        }
    }

    fn secondary(name: &str, mean: f64) -> GroupStatistics {
        GroupStatistics {
            name: name.to_string(),
            kind: VariableKind::from_group_name(name),
            summary: Summary {
                count: 10,
                mean,
                std: mean,
                min: 0.0,
                max: 2.0 * mean,
                coefficient_of_variation: 1.0,
            },
            range: None,
            trend: Trend::degenerate(),
            seasonal: None,
            yearly: None,
            extremes: None,
            optional_features: None,
        }
    }

    #[test]
    fn test_overview_is_one_of_its_phrasings() {
        let basic = basic();
        let mut realizer = TemplateRealizer::new(UnitSystem::Metric);
        let text = realizer
            .realize(&Fact::Overview { basic: &basic })
            .text()
            .map(str::to_string)
            .expect("overview renders");
        let expected = [
            "This analysis covers daily weather observations from Peoria, IL, spanning January 01, 2019 to December 31, 2021.",
            "Covering 3.0 years from January 01, 2019 to December 31, 2021, this summary draws on 1096 daily observations from Peoria, IL.",
        ];
        assert!(expected.contains(&text.as_str()), "unexpected overview: {}", text);
    }

    #[test]
    fn test_temperature_summary_units() {
        let summary = Summary { count: 3, mean: 52.04, std: 1.0, min: 40.0, max: 60.0, coefficient_of_variation: 0.02 };
        let range = ValueRange { absolute_min: Some(-3.0), absolute_max: Some(98.6) };
        let fact = Fact::Summary {
            variable: "temperature",
            kind: VariableKind::Temperature,
            summary: &summary,
            range: Some(&range),
        };
        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Imperial, 7);
        let text = realizer.realize(&fact).text().map(str::to_string).expect("summary renders");
        assert!(text.contains("52.0°F"), "{}", text);
        assert!(text.contains("-3.0°F") && text.contains("98.6°F"), "{}", text);
    }

    #[test]
    fn test_trend_sentence_never_stable_for_strong_warming() {
        let trend = temperature_trend(3.3, 0.99);
        let fact = Fact::Trend { variable: "temperature", kind: VariableKind::Temperature, trend: &trend };
        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Metric, 1);
        assert_eq!(
            realizer.realize(&fact),
            Realization::Text("Temperature showed significant warming over the study period.".to_string())
        );

        let flat = Trend::degenerate();
        let fact = Fact::Trend { variable: "temperature", kind: VariableKind::Temperature, trend: &flat };
        assert_eq!(
            realizer.realize(&fact).text(),
            Some("Temperature remained relatively stable over the study period.")
        );
    }

    #[test]
    fn test_missing_season_skips_with_reason() {
        let seasonal = Seasonal { winter: None, spring: Some(10.0), summer: Some(22.0), fall: Some(12.0), range: 12.0 };
        let fact = Fact::Seasonal { variable: "temperature", kind: VariableKind::Temperature, seasonal: &seasonal };
        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Metric, 3);
        match realizer.realize(&fact) {
            Realization::Skipped { kind, reason } => {
                assert_eq!(kind, "temperature_seasonal");
                assert!(matches!(reason, SkipReason::MissingField("winter") | SkipReason::MissingField("winter_desc")));
                assert_eq!(reason.severity(), SkipSeverity::Unexpected);
            }
            other => panic!("expected a skip, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_kind_is_expected_skip() {
        let summary = Summary { count: 3, mean: 5.0, std: 1.0, min: 4.0, max: 6.0, coefficient_of_variation: 0.2 };
        let fact = Fact::Summary { variable: "wind", kind: VariableKind::Wind, summary: &summary, range: None };
        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Metric, 0);
        let result = realizer.realize(&fact);
        assert_eq!(
            result,
            Realization::Skipped { kind: "wind_summary".to_string(), reason: SkipReason::NoTemplate }
        );
        assert_eq!(SkipReason::NoTemplate.severity(), SkipSeverity::Expected);
    }

    #[test]
    fn test_combined_conditions_joining() {
        let wind = secondary("wind", 14.0);
        let humidity = secondary("humidity", 65.0);
        let snow = secondary("snow", 2.5);
        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Metric, 0);

        assert_eq!(realizer.realize_combined_conditions(&[]), "");
        assert_eq!(
            realizer.realize_combined_conditions(&[&wind]),
            "Other conditions included winds averaging 14.0 km/h."
        );
        assert_eq!(
            realizer.realize_combined_conditions(&[&wind, &humidity]),
            "Other conditions included winds averaging 14.0 km/h and 65.0% humidity."
        );
        assert_eq!(
            realizer.realize_combined_conditions(&[&wind, &humidity, &snow]),
            "Other conditions included winds averaging 14.0 km/h, 65.0% humidity, and snowfall averaging 2.5 cm."
        );

        let fact = Fact::OtherConditions { variables: vec![&wind, &humidity] };
        assert_eq!(
            realizer.realize(&fact).text(),
            Some("Other conditions included winds averaging 14.0 km/h and 65.0% humidity.")
        );
    }

    #[test]
    fn test_empty_combined_conditions_are_logged() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("realize.log");
        logging::init_logger(logging::LogLevel::Debug, path.to_str(), false);

        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Metric, 0);
        assert_eq!(realizer.realize_combined_conditions(&[]), "");

        let written = std::fs::read_to_string(&path).expect("log file should exist");
        assert!(
            written.contains("WARN REALIZE [other_conditions]: sentence dropped [UNEXPECTED]: missing field 'conditions_desc'"),
            "{}",
            written
        );
    }

    #[test]
    fn test_pattern_trends_phrasing_by_count() {
        let highlight = |name: &str| TrendHighlight {
            name: name.to_string(),
            r_squared: 0.9,
            direction: TrendDirection::Decreasing,
            slope: -1.0,
        };
        let one = [highlight("relative_humidity")];
        let two = [highlight("temperature"), highlight("wind_speed")];
        let mut realizer = TemplateRealizer::with_seed(UnitSystem::Metric, 0);

        assert_eq!(
            realizer.realize(&Fact::PatternTrends { trends: &one }).text(),
            Some("Notably, relative humidity showed a strong decreasing trend over the period.")
        );
        assert_eq!(
            realizer.realize(&Fact::PatternTrends { trends: &two }).text(),
            Some("Notably, temperature and wind speed both showed strong trends over the period.")
        );
    }

    #[test]
    fn test_correlation_sentence_membership() {
        let corr = Correlation {
            pair: "temperature_and_humidity".to_string(),
            first: "temperature".to_string(),
            second: "humidity".to_string(),
            correlation: 0.81,
            relationship: Relationship::Direct,
        };
        let mut realizer = TemplateRealizer::new(UnitSystem::Metric);
        let text = realizer
            .realize(&Fact::PatternCorrelation { correlation: &corr })
            .text()
            .map(str::to_string)
            .expect("correlation renders");
        let expected = [
            "The variables temperature and humidity were the most strongly correlated, and their relationship was positive.",
            "The strongest relationship in the data was between temperature and humidity, with a correlation of 0.81 (positive).",
        ];
        assert!(expected.contains(&text.as_str()), "unexpected sentence: {}", text);
    }

    #[test]
    fn test_seeded_realizers_agree() {
        let basic = basic();
        let fact = Fact::Overview { basic: &basic };
        let mut a = TemplateRealizer::with_seed(UnitSystem::Metric, 42);
        let mut b = TemplateRealizer::with_seed(UnitSystem::Metric, 42);
        for _ in 0..10 {
            assert_eq!(a.realize(&fact), b.realize(&fact));
        }
    }
}
