//! Summary configuration.
//!
//! Thresholds, unit system and variable schema are read once at startup from
//! an optional TOML file, then overridden by command-line flags. Every field
//! has a default, so an empty file (or no file) is a valid configuration.
//!
//! ```toml
//! station_name = "Peoria, IL"
//! units = "imperial"
//! preset = "standard"
//!
//! [thresholds]
//! r2_threshold = 0.3
//! p_value_threshold = 0.05
//! extreme_threshold = 2.0
//!
//! [planner]
//! primary_variables = ["temperature", "precipitation"]
//! correlation_ranking = "absolute"
//!
//! [[variables]]
//! name = "temperature"
//! primary = "temp_mean"
//! supporting = ["temp_min", "temp_max"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{SummaryError, VariableGroup};
use crate::variables::Preset;

/// Station name used when neither the config nor the data supplies one.
pub const UNKNOWN_STATION: &str = "unknown";

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Measurement system of the source data. Selects temperature adjective
/// breakpoints and the unit labels used in rendered sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// °C, mm, km/h, cm
    #[default]
    Metric,
    /// °F, inches, mph, inches
    Imperial,
}

impl UnitSystem {
    pub fn temperature_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn precipitation_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "mm",
            UnitSystem::Imperial => "inches",
        }
    }

    pub fn snow_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "inches",
        }
    }

    pub fn wind_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(UnitSystem::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(UnitSystem::Imperial),
            other => Err(format!("unknown unit system '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold sections
// ---------------------------------------------------------------------------

/// Significance thresholds used by the content planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum R² for a trend to be narrated.
    pub r2_threshold: f64,
    /// Maximum p-value for a trend to be narrated.
    pub p_value_threshold: f64,
    /// Z-score a yearly mean must reach to be called out.
    pub extreme_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            r2_threshold: 0.3,
            p_value_threshold: 0.05,
            extreme_threshold: 2.0,
        }
    }
}

/// Fixed cut-offs used while building the statistics bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Mean absolute difference a comparison column must exceed to be reported.
    pub comparison_difference: f64,
    /// R² a group's trend must exceed to appear in `strongest_trends`.
    pub trend_pattern_r2: f64,
    /// CV the most variable group must exceed to be reported.
    pub most_variable_cv: f64,
    /// |r| a pair must exceed to be reported as correlated.
    pub correlation_strength: f64,
    pub max_strongest_trends: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            comparison_difference: 5.0,
            trend_pattern_r2: 0.3,
            most_variable_cv: 0.5,
            correlation_strength: 0.5,
            max_strongest_trends: 2,
        }
    }
}

/// How the planner picks the single correlation to narrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationRanking {
    /// Strongest |r|; inverse relationships compete with direct ones.
    #[default]
    Absolute,
    /// Highest signed r; only positive correlations can win.
    Signed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Variables narrated in full, in this order.
    pub primary_variables: Vec<String>,
    /// CV above which a secondary variable counts as notable.
    pub secondary_cv_threshold: f64,
    pub correlation_ranking: CorrelationRanking,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            primary_variables: vec!["temperature".to_string(), "precipitation".to_string()],
            secondary_cv_threshold: 0.6,
            correlation_ranking: CorrelationRanking::Absolute,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub station_name: Option<String>,
    pub units: UnitSystem,
    pub preset: Preset,
    /// Rename common header variants while loading; defaults to the preset's
    /// preference.
    pub standardize_columns: Option<bool>,
    pub thresholds: Thresholds,
    pub analysis: AnalysisSettings,
    pub planner: PlannerSettings,
    /// Explicit schema; the preset registry is used when empty.
    pub variables: Vec<VariableGroup>,
}

impl SummaryConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, SummaryError> {
        let config: SummaryConfig =
            toml::from_str(content).map_err(|e| SummaryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, SummaryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SummaryError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Checks threshold ranges and schema consistency.
    pub fn validate(&self) -> Result<(), SummaryError> {
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.r2_threshold) {
            return Err(SummaryError::Config(format!(
                "r2_threshold must be within [0, 1], got {}",
                t.r2_threshold
            )));
        }
        if !(t.p_value_threshold > 0.0 && t.p_value_threshold <= 1.0) {
            return Err(SummaryError::Config(format!(
                "p_value_threshold must be within (0, 1], got {}",
                t.p_value_threshold
            )));
        }
        if !(t.extreme_threshold.is_finite() && t.extreme_threshold >= 0.0) {
            return Err(SummaryError::Config(format!(
                "extreme_threshold must be a non-negative number, got {}",
                t.extreme_threshold
            )));
        }
        if !(self.analysis.comparison_difference.is_finite() && self.analysis.comparison_difference >= 0.0) {
            return Err(SummaryError::Config(
                "comparison_difference must be a non-negative number".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.variables {
            if group.name.trim().is_empty() {
                return Err(SummaryError::Config("variable name must not be empty".to_string()));
            }
            if group.primary.trim().is_empty() {
                return Err(SummaryError::Config(format!(
                    "variable '{}' has an empty primary column",
                    group.name
                )));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(SummaryError::Config(format!(
                    "duplicate variable '{}'",
                    group.name
                )));
            }
        }
        Ok(())
    }

    /// Schema in effect: explicit `[[variables]]` or the preset registry.
    pub fn variable_groups(&self) -> Vec<VariableGroup> {
        if self.variables.is_empty() {
            self.preset.variable_groups()
        } else {
            self.variables.clone()
        }
    }

    pub fn standardizes_columns(&self) -> bool {
        self.standardize_columns
            .unwrap_or_else(|| self.variables.is_empty() && self.preset.standardizes_columns())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
