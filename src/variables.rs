/// Built-in variable-group registries.
///
/// Two column-naming conventions are supported out of the box: the short
/// "standard" names produced by the loader's column standardization
/// (`temp_mean`, `precipitation_mean`, ...) and the column headers of an
/// Open-Meteo daily export (`temperature_2m_mean (°C)`, ...). A config file
/// may replace either with its own `[[variables]]` list; everything else
/// should take its default schema from here rather than hardcoding columns.

use serde::Deserialize;

use crate::model::{VariableGroup, VariableKind};

// ---------------------------------------------------------------------------
// Registry entries
// ---------------------------------------------------------------------------

/// Static description of one variable group.
pub struct VariableSpec {
    /// Logical name used in fact kinds (`temperature_trend`, ...).
    pub name: &'static str,
    pub primary: &'static str,
    pub supporting: &'static [&'static str],
    pub comparison: &'static [&'static str],
    pub kind: VariableKind,
}

impl VariableSpec {
    pub fn to_group(&self) -> VariableGroup {
        VariableGroup {
            name: self.name.to_string(),
            primary: self.primary.to_string(),
            supporting: self.supporting.iter().map(|c| c.to_string()).collect(),
            comparison: self.comparison.iter().map(|c| c.to_string()).collect(),
            kind: Some(self.kind),
        }
    }
}

/// Short column names, as emitted by `ingest::daily_csv::standardize_column_name`.
pub static STANDARD_VARIABLES: &[VariableSpec] = &[
    VariableSpec {
        name: "temperature",
        primary: "temp_mean",
        supporting: &["temp_min", "temp_max"],
        comparison: &["temp_real_feel_mean"],
        kind: VariableKind::Temperature,
    },
    VariableSpec {
        name: "precipitation",
        primary: "precipitation_mean",
        supporting: &["precipitation_max"],
        comparison: &[],
        kind: VariableKind::Precipitation,
    },
    VariableSpec {
        name: "wind",
        primary: "wind_speed_mean",
        supporting: &["wind_speed_max"],
        comparison: &[],
        kind: VariableKind::Wind,
    },
    VariableSpec {
        name: "humidity",
        primary: "humidity_mean",
        supporting: &[],
        comparison: &[],
        kind: VariableKind::Humidity,
    },
];

/// Column headers of an Open-Meteo historical daily export.
pub static OPEN_METEO_VARIABLES: &[VariableSpec] = &[
    VariableSpec {
        name: "temperature",
        primary: "temperature_2m_mean (°C)",
        supporting: &["temperature_2m_min (°C)", "temperature_2m_max (°C)"],
        comparison: &["apparent_temperature_mean (°C)"],
        kind: VariableKind::Temperature,
    },
    VariableSpec {
        name: "precipitation",
        primary: "precipitation_sum (mm)",
        supporting: &[],
        comparison: &[],
        kind: VariableKind::Precipitation,
    },
    VariableSpec {
        name: "rain",
        primary: "rain_sum (mm)",
        supporting: &[],
        comparison: &[],
        kind: VariableKind::Rain,
    },
    VariableSpec {
        name: "snow",
        primary: "snowfall_sum (cm)",
        supporting: &[],
        comparison: &[],
        kind: VariableKind::Snow,
    },
    VariableSpec {
        name: "precipitation_hours",
        primary: "precipitation_hours (h)",
        supporting: &[],
        comparison: &[],
        kind: VariableKind::PrecipitationHours,
    },
    VariableSpec {
        name: "wind_speed",
        primary: "wind_speed_10m_mean (km/h)",
        supporting: &["wind_speed_10m_min (km/h)", "wind_speed_10m_max (km/h)"],
        comparison: &["wind_gusts_10m_mean (km/h)"],
        kind: VariableKind::Wind,
    },
    VariableSpec {
        name: "relative_humidity",
        primary: "relative_humidity_2m_mean (%)",
        supporting: &["relative_humidity_2m_min (%)", "relative_humidity_2m_max (%)"],
        comparison: &[],
        kind: VariableKind::Humidity,
    },
    VariableSpec {
        name: "sunshine_duration",
        primary: "sunshine_duration (s)",
        supporting: &[],
        comparison: &[],
        kind: VariableKind::Sunshine,
    },
];

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Standard,
    OpenMeteo,
}

impl Preset {
    pub fn registry(self) -> &'static [VariableSpec] {
        match self {
            Preset::Standard => STANDARD_VARIABLES,
            Preset::OpenMeteo => OPEN_METEO_VARIABLES,
        }
    }

    /// Owned variable groups for this preset, in registry order.
    pub fn variable_groups(self) -> Vec<VariableGroup> {
        self.registry().iter().map(VariableSpec::to_group).collect()
    }

    /// Open-Meteo headers are already canonical; the standard preset relies
    /// on the loader renaming common header variants.
    pub fn standardizes_columns(self) -> bool {
        matches!(self, Preset::Standard)
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(Preset::Standard),
            "open_meteo" => Ok(Preset::OpenMeteo),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_variable_names() {
        for preset in [Preset::Standard, Preset::OpenMeteo] {
            let mut seen = std::collections::HashSet::new();
            for spec in preset.registry() {
                assert!(
                    seen.insert(spec.name),
                    "duplicate variable '{}' found in {:?} registry",
                    spec.name,
                    preset
                );
            }
        }
    }

    #[test]
    fn test_both_registries_start_with_primary_narrative_variables() {
        // The planner narrates temperature then precipitation in full; both
        // presets must define them.
        for preset in [Preset::Standard, Preset::OpenMeteo] {
            let names: Vec<_> = preset.registry().iter().map(|v| v.name).collect();
            assert_eq!(&names[..2], &["temperature", "precipitation"], "{:?}", preset);
        }
    }

    #[test]
    fn test_supporting_columns_carry_min_max_tokens() {
        // Range and extremes resolve supporting columns by their min/max token.
        for preset in [Preset::Standard, Preset::OpenMeteo] {
            for spec in preset.registry() {
                for col in spec.supporting {
                    let lower = col.to_lowercase();
                    assert!(
                        lower.contains("min") || lower.contains("max"),
                        "supporting column '{}' of '{}' has no min/max token",
                        col,
                        spec.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_primary_column_not_repeated_in_supporting() {
        for preset in [Preset::Standard, Preset::OpenMeteo] {
            for spec in preset.registry() {
                assert!(!spec.supporting.contains(&spec.primary), "{}", spec.name);
                assert!(!spec.comparison.contains(&spec.primary), "{}", spec.name);
            }
        }
    }

    #[test]
    fn test_to_group_copies_columns_and_kind() {
        let group = STANDARD_VARIABLES[0].to_group();
        assert_eq!(group.name, "temperature");
        assert_eq!(group.supporting, vec!["temp_min", "temp_max"]);
        assert_eq!(group.kind(), VariableKind::Temperature);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("open-meteo".parse::<Preset>(), Ok(Preset::OpenMeteo));
        assert_eq!("Standard".parse::<Preset>(), Ok(Preset::Standard));
        assert!("daily".parse::<Preset>().is_err());
    }
}
