/// Core data types for the weather summary pipeline.
///
/// This module defines the shared domain model imported by all other modules:
/// the observation table the analyzer reads, the variable-group schema that
/// says which columns feed which analyses, the statistics bundle the analyzer
/// produces, and the error type for malformed input at the boundary.
/// It contains no analysis logic and no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Name of the required calendar-date column in source files.
pub const DATE_COLUMN: &str = "date";

/// Name of the optional text column that carries the station name.
pub const STATION_COLUMN: &str = "station";

// ---------------------------------------------------------------------------
// Variable schema
// ---------------------------------------------------------------------------

/// Broad family of a variable group. Chooses trend wording in the lexicon and
/// unit phrasing in the realizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Temperature,
    Precipitation,
    PrecipitationHours,
    Rain,
    Snow,
    Wind,
    Humidity,
    Sunshine,
    Other,
}

impl VariableKind {
    /// Infers the kind from a group name such as `"wind_speed"` or
    /// `"relative_humidity"`. Unknown names map to `Other`.
    pub fn from_group_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        match lower.as_str() {
            "temperature" => VariableKind::Temperature,
            "precipitation" => VariableKind::Precipitation,
            "precipitation_hours" => VariableKind::PrecipitationHours,
            "rain" => VariableKind::Rain,
            "snow" | "snowfall" => VariableKind::Snow,
            _ if lower.starts_with("wind") => VariableKind::Wind,
            _ if lower.contains("humid") => VariableKind::Humidity,
            _ if lower.starts_with("sunshine") => VariableKind::Sunshine,
            _ => VariableKind::Other,
        }
    }
}

/// Declares which table columns feed the analyses for one logical variable.
///
/// - `primary`: the main measured quantity (e.g. daily mean temperature).
/// - `supporting`: auxiliary columns; names containing `min`/`max` refine
///   the range and extremes of the primary column.
/// - `comparison`: columns compared against the primary column (e.g.
///   apparent vs. actual temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableGroup {
    pub name: String,
    pub primary: String,
    #[serde(default)]
    pub supporting: Vec<String>,
    #[serde(default)]
    pub comparison: Vec<String>,
    /// Explicit kind; inferred from `name` when omitted.
    #[serde(default)]
    pub kind: Option<VariableKind>,
}

impl VariableGroup {
    pub fn new(name: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: primary.into(),
            supporting: Vec::new(),
            comparison: Vec::new(),
            kind: None,
        }
    }

    pub fn with_supporting(mut self, columns: &[&str]) -> Self {
        self.supporting = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_comparison(mut self, columns: &[&str]) -> Self {
        self.comparison = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
            .unwrap_or_else(|| VariableKind::from_group_name(&self.name))
    }
}

// ---------------------------------------------------------------------------
// Observation table
// ---------------------------------------------------------------------------

/// Daily observations: one calendar date per row plus named numeric columns.
///
/// Rows need not be contiguous or sorted. Every column has exactly one value
/// per row and every value is finite; missing cells are expected to have been
/// dropped by the loader before the table is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
}

impl ObservationTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Builder form of [`ObservationTable::add_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, SummaryError> {
        self.add_column(name, values)?;
        Ok(self)
    }

    /// Appends a numeric column. Rejects length mismatches, duplicate names
    /// and non-finite values.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), SummaryError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(SummaryError::ColumnLengthMismatch {
                column: name,
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        if self.has_column(&name) {
            return Err(SummaryError::DuplicateColumn(name));
        }
        if let Some((row, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SummaryError::NonNumericValue {
                row,
                column: name,
                value: value.to_string(),
            });
        }
        self.columns.push((name, values));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}

// ---------------------------------------------------------------------------
// Statistics bundle
// ---------------------------------------------------------------------------

/// Dataset-level facts, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub n_records: usize,
    /// Span between first and last date, in years of 365.25 days.
    pub n_years: f64,
    pub station_name: String,
}

/// Descriptive statistics of a primary column.
///
/// `std` is the sample standard deviation (n − 1 denominator), 0 for fewer
/// than two values. `coefficient_of_variation` is `std / mean`, or 0 when the
/// mean is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub coefficient_of_variation: f64,
}

/// Absolute bounds from `min`/`max` supporting columns. At least one side is
/// present whenever the range itself is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRange {
    pub absolute_min: Option<f64>,
    pub absolute_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Flat => write!(f, "flat"),
        }
    }
}

/// Ordinary least-squares fit of the primary column against fractional year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    /// Units of the primary column per year.
    pub slope: f64,
    pub r_value: f64,
    pub r_squared: f64,
    /// Two-sided p-value for a zero slope.
    pub p_value: f64,
    pub direction: TrendDirection,
}

impl Trend {
    /// Trend reported when the fit is undefined (fewer than two distinct
    /// time points, or no variation to explain).
    pub fn degenerate() -> Self {
        Self {
            slope: 0.0,
            r_value: 0.0,
            r_squared: 0.0,
            p_value: 1.0,
            direction: TrendDirection::Flat,
        }
    }
}

/// Mean of the primary column per meteorological season.
/// `range` is the spread between the highest and lowest present season mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seasonal {
    pub winter: Option<f64>,
    pub spring: Option<f64>,
    pub summer: Option<f64>,
    pub fall: Option<f64>,
    pub range: f64,
}

/// Comparison of calendar-year means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yearly {
    pub yearly_mean: f64,
    pub yearly_std: f64,
    pub highest_year: i32,
    pub highest_value: f64,
    pub highest_zscore: f64,
    pub lowest_year: i32,
    pub lowest_value: f64,
    pub lowest_zscore: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeValue {
    pub value: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremes {
    pub highest: Option<ExtremeValue>,
    pub lowest: Option<ExtremeValue>,
}

/// A comparison column that differs notably from the primary column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonFeature {
    pub column: String,
    /// Mean absolute difference, comparison minus primary.
    pub avg_difference: f64,
    /// True when the comparison column is lower than the primary on average.
    pub is_negative: bool,
}

/// Everything the analyzer derives for one variable group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub name: String,
    pub kind: VariableKind,
    pub summary: Summary,
    pub range: Option<ValueRange>,
    pub trend: Trend,
    pub seasonal: Option<Seasonal>,
    pub yearly: Option<Yearly>,
    pub extremes: Option<Extremes>,
    pub optional_features: Option<Vec<ComparisonFeature>>,
}

/// A group whose trend cleared the pattern R² bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendHighlight {
    pub name: String,
    pub r_squared: f64,
    pub direction: TrendDirection,
    pub slope: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostVariable {
    pub variable: String,
    pub cv: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Direct,
    Inverse,
}

/// Pearson correlation between the primary columns of two groups.
///
/// `pair` is `"{first}_and_{second}"` with `first` preceding `second` in
/// schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub pair: String,
    pub first: String,
    pub second: String,
    pub correlation: f64,
    pub relationship: Relationship,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CrossVariablePatterns {
    /// At most two entries, strongest R² first.
    pub strongest_trends: Vec<TrendHighlight>,
    pub most_variable: Option<MostVariable>,
    /// One entry per unordered pair, in schema order.
    pub correlations: Vec<Correlation>,
}

impl CrossVariablePatterns {
    /// Looks up the correlation between two groups in either order.
    pub fn correlation_between(&self, a: &str, b: &str) -> Option<&Correlation> {
        self.correlations.iter().find(|c| {
            (c.first == a && c.second == b) || (c.first == b && c.second == a)
        })
    }
}

/// Full analyzer output. `groups` follows schema order and holds only groups
/// whose primary column exists in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStatistics {
    pub basic: BasicInfo,
    pub groups: Vec<GroupStatistics>,
    pub patterns: CrossVariablePatterns,
}

impl DatasetStatistics {
    pub fn group(&self, name: &str) -> Option<&GroupStatistics> {
        self.groups.iter().find(|g| g.name == name)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised at the boundary of the pipeline: malformed input tables,
/// unreadable files and invalid configuration. Degenerate statistics and
/// template gaps are not errors.
#[derive(Debug, PartialEq)]
pub enum SummaryError {
    /// The source file has no `date` column.
    MissingDateColumn,
    /// A `date` cell could not be parsed as a calendar date.
    UnparseableDate { row: usize, value: String },
    /// A numeric column contains a value that is not a finite number.
    NonNumericValue {
        row: usize,
        column: String,
        value: String,
    },
    /// A column does not have one value per row.
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    DuplicateColumn(String),
    /// The table has no rows, so there is nothing to summarize.
    EmptyTable,
    /// The configuration could not be parsed or failed validation.
    Config(String),
    /// Reading or writing a file failed.
    Io(String),
}

impl std::fmt::Display for SummaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryError::MissingDateColumn => write!(f, "Missing required '{}' column", DATE_COLUMN),
            SummaryError::UnparseableDate { row, value } => {
                write!(f, "Unparseable date '{}' at row {}", value, row)
            }
            SummaryError::NonNumericValue { row, column, value } => {
                write!(f, "Non-numeric value '{}' in column '{}' at row {}", value, column, row)
            }
            SummaryError::ColumnLengthMismatch { column, expected, actual } => write!(
                f,
                "Column '{}' has {} values, expected {}",
                column, actual, expected
            ),
            SummaryError::DuplicateColumn(name) => write!(f, "Duplicate column: {}", name),
            SummaryError::EmptyTable => write!(f, "No observations to summarize"),
            SummaryError::Config(msg) => write!(f, "Config error: {}", msg),
            SummaryError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for SummaryError {}

impl From<std::io::Error> for SummaryError {
    fn from(err: std::io::Error) -> Self {
        SummaryError::Io(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
