/// Daily weather CSV loader
///
/// Reads a comma-separated export with a header row and one row per day.
/// The `date` column is required; every other column is either numeric
/// (every non-missing cell parses as a number) or text. Text columns are
/// ignored except `station`, whose first value names the station.
///
/// Missing cells (`""`, `null`, `NaN`, `NA`) are allowed in the file, but any
/// row missing a numeric value is dropped before the table is built, so the
/// analyzer only ever sees complete rows. Row numbers in errors count data
/// rows from 1, excluding the header and including skipped rows.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::logging::{self, Stage};
use crate::model::{ObservationTable, SummaryError, DATE_COLUMN, STATION_COLUMN};

// ============================================================================
// Loaded Data
// ============================================================================

/// Result of loading one file.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: ObservationTable,
    /// First value of the `station` column, if the file has one.
    pub station_name: Option<String>,
    /// Rows skipped because they were incomplete or had missing values.
    pub dropped_rows: usize,
}

// ============================================================================
// Loading
// ============================================================================

/// Read and parse a daily CSV file.
pub fn load_daily_csv(path: &Path, standardize: bool) -> Result<LoadedTable, SummaryError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SummaryError::Io(format!("{}: {}", path.display(), e)))?;
    logging::debug(
        Stage::Loader,
        None,
        &format!("read {} bytes from {}", text.len(), path.display()),
    );
    parse_daily_csv(&text, standardize)
}

/// Parse daily CSV text into an observation table.
///
/// With `standardize`, common header variants are renamed to the short
/// names of the standard variable registry (see [`standardize_column_name`]).
pub fn parse_daily_csv(csv: &str, standardize: bool) -> Result<LoadedTable, SummaryError> {
    let mut lines = csv
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(SummaryError::MissingDateColumn);
    };

    let raw_headers: Vec<String> = split_fields(header_line.trim_start_matches('\u{feff}'))
        .into_iter()
        .map(|h| h.to_string())
        .collect();

    let date_idx = raw_headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(DATE_COLUMN))
        .ok_or(SummaryError::MissingDateColumn)?;
    let station_idx = raw_headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(STATION_COLUMN));

    let headers = column_names(&raw_headers, standardize);

    let mut dates = Vec::new();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut dropped_rows = 0;

    for (index, (line_no, line)) in lines.enumerate() {
        let row = index + 1;
        let fields = split_fields(line);
        if fields.len() != headers.len() {
            dropped_rows += 1;
            logging::debug(
                Stage::Loader,
                None,
                &format!("line {}: expected {} fields, got {}", line_no + 1, headers.len(), fields.len()),
            );
            continue; // Skip incomplete rows
        }

        let date = parse_date(fields[date_idx]).ok_or_else(|| SummaryError::UnparseableDate {
            row,
            value: fields[date_idx].to_string(),
        })?;
        dates.push(date);

        for (i, field) in fields.iter().enumerate() {
            cells[i].push(if is_missing(field) { None } else { Some(field.to_string()) });
        }
    }

    let station_name = station_idx
        .and_then(|i| cells[i].iter().flatten().next().cloned());

    // Numeric columns, in header order
    let mut numeric: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    for (i, name) in headers.iter().enumerate() {
        if i == date_idx || Some(i) == station_idx {
            continue;
        }
        match parse_numeric_column(&cells[i]) {
            ColumnType::Numeric(values) => numeric.push((name.clone(), values)),
            ColumnType::Text { numeric_cells: 0 } => {
                logging::debug(Stage::Loader, Some(name.as_str()), "text column ignored");
            }
            ColumnType::Text { numeric_cells } => logging::warn(
                Stage::Loader,
                Some(name.as_str()),
                &format!("column mixes {} numbers with text, ignored", numeric_cells),
            ),
        }
    }

    // Drop rows with any missing numeric value
    let keep: Vec<bool> = (0..dates.len())
        .map(|row| numeric.iter().all(|(_, values)| values[row].is_some()))
        .collect();
    dropped_rows += keep.iter().filter(|k| !**k).count();

    let kept_dates = dates
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(d, _)| *d)
        .collect();
    let mut table = ObservationTable::new(kept_dates);
    for (name, values) in numeric {
        let complete: Vec<f64> = values
            .into_iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .filter_map(|(v, _)| v)
            .collect();
        table.add_column(name, complete)?;
    }

    if dropped_rows > 0 {
        logging::info(
            Stage::Loader,
            None,
            &format!("dropped {} incomplete rows, kept {}", dropped_rows, table.len()),
        );
    }

    Ok(LoadedTable {
        table,
        station_name,
        dropped_rows,
    })
}

// ============================================================================
// Field Helpers
// ============================================================================

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',')
        .map(|f| f.trim().trim_matches('"').trim())
        .collect()
}

fn is_missing(field: &str) -> bool {
    field.is_empty()
        || field.eq_ignore_ascii_case("null")
        || field.eq_ignore_ascii_case("nan")
        || field.eq_ignore_ascii_case("na")
}

/// Accepts plain dates and date-times; only the calendar date is kept.
fn parse_date(field: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(field, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(field, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(field).ok().map(|dt| dt.date_naive())
}

enum ColumnType {
    Numeric(Vec<Option<f64>>),
    /// At least one present cell is not a number.
    Text { numeric_cells: usize },
}

/// A column is numeric when it has a present cell and every present cell
/// parses.
fn parse_numeric_column(cells: &[Option<String>]) -> ColumnType {
    let values: Vec<Option<Option<f64>>> = cells
        .iter()
        .map(|cell| cell.as_deref().map(parse_number))
        .collect();

    let present = values.iter().flatten().count();
    let numeric_cells = values.iter().flatten().flatten().count();
    if present == 0 || numeric_cells < present {
        return ColumnType::Text { numeric_cells };
    }
    ColumnType::Numeric(values.into_iter().map(Option::flatten).collect())
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// Column Standardization
// ============================================================================

fn column_names(raw: &[String], standardize: bool) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for header in raw {
        let renamed = if standardize {
            standardize_column_name(header)
                .filter(|canonical| {
                    // First header wins a canonical name
                    !names.iter().any(|n| n == canonical) && !raw.iter().any(|r| r == canonical && r != header)
                })
                .map(str::to_string)
        } else {
            None
        };
        names.push(renamed.unwrap_or_else(|| header.clone()));
    }
    names
}

/// Maps common header variants onto the standard registry's column names.
/// Returns `None` when the header is not recognized.
pub fn standardize_column_name(header: &str) -> Option<&'static str> {
    let lower = header.to_lowercase();
    let has = |token: &str| lower.contains(token);

    if has("temp") && (has("feel") || has("apparent")) {
        Some("temp_real_feel_mean")
    } else if (has("temp") && (has("mean") || has("avg"))) || lower == "tavg" {
        Some("temp_mean")
    } else if (has("temp") && has("min")) || lower == "tmin" {
        Some("temp_min")
    } else if (has("temp") && has("max")) || lower == "tmax" {
        Some("temp_max")
    } else if has("precip") || lower == "prcp" {
        if has("hour") {
            None
        } else if has("mean") || has("avg") {
            Some("precipitation_mean")
        } else if has("max") {
            Some("precipitation_max")
        } else if !has("min") {
            Some("precipitation_mean")
        } else {
            None
        }
    } else if has("wind") && has("speed") {
        if has("mean") || has("avg") {
            Some("wind_speed_mean")
        } else if has("max") {
            Some("wind_speed_max")
        } else {
            None
        }
    } else if has("humid") && (has("mean") || has("avg") || lower == "humidity") {
        Some("humidity_mean")
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,station,TAVG,tmin,tmax,PRCP
2021-03-04,KPIA,10.5,4.0,15.0,0.0
2021-03-05,KPIA,11.0,5.5,16.5,2.5
2021-03-06,KPIA,,3.0,12.0,1.0
";

    #[test]
    fn test_parses_standardized_columns_and_station() {
        let loaded = parse_daily_csv(SAMPLE, true).expect("sample should parse");
        let table = &loaded.table;
        assert_eq!(loaded.station_name.as_deref(), Some("KPIA"));
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["temp_mean", "temp_min", "temp_max", "precipitation_mean"]
        );
        // Third row is missing TAVG and is dropped
        assert_eq!(table.len(), 2);
        assert_eq!(loaded.dropped_rows, 1);
        assert_eq!(table.column("temp_max"), Some(&[15.0, 16.5][..]));
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2021, 3, 4).unwrap());
    }

    #[test]
    fn test_keeps_raw_names_without_standardization() {
        let loaded = parse_daily_csv(SAMPLE, false).expect("sample should parse");
        assert!(loaded.table.has_column("TAVG"));
        assert!(!loaded.table.has_column("temp_mean"));
    }

    #[test]
    fn test_missing_date_column_is_rejected() {
        let err = parse_daily_csv("day,temp_mean\n2021-01-01,3.0\n", true).unwrap_err();
        assert_eq!(err, SummaryError::MissingDateColumn);
    }

    #[test]
    fn test_unparseable_date_reports_row() {
        let err = parse_daily_csv("date,temp_mean\n2021-01-01,3.0\nyesterday,4.0\n", false).unwrap_err();
        assert_eq!(
            err,
            SummaryError::UnparseableDate {
                row: 2,
                value: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn test_mixed_text_column_is_ignored() {
        let loaded = parse_daily_csv("date,temp_mean,notes\n2021-01-01,3.0,1\n2021-01-02,4.0,cloudy\n", false)
            .expect("unreferenced text column should not abort the load");
        assert_eq!(loaded.table.column_names().collect::<Vec<_>>(), vec!["temp_mean"]);
        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.dropped_rows, 0);
    }

    #[test]
    fn test_unparseable_date_row_counts_skipped_rows() {
        let err = parse_daily_csv("date,a,b\n2021-01-01,1\nbad,1,2\n", false).unwrap_err();
        assert_eq!(
            err,
            SummaryError::UnparseableDate {
                row: 2,
                value: "bad".to_string()
            }
        );
    }

    #[test]
    fn test_datetime_cells_keep_calendar_date() {
        let loaded = parse_daily_csv(
            "date,x\n2021-01-01T00:00,1\n2021-01-02 06:30:00,2\n2021-01-03T00:00:00+00:00,3\n",
            false,
        )
        .expect("datetime formats should parse");
        let days: Vec<u32> = loaded.table.dates().iter().map(|d| chrono::Datelike::day(d)).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_open_meteo_headers_pass_through_unchanged() {
        let csv = "date,temperature_2m_mean (°C),precipitation_sum (mm)\n2021-01-01,1.5,0.2\n";
        let loaded = parse_daily_csv(csv, false).expect("should parse");
        assert!(loaded.table.has_column("temperature_2m_mean (°C)"));
        assert!(loaded.table.has_column("precipitation_sum (mm)"));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let loaded = parse_daily_csv("date,a,b\n2021-01-01,1,2\n2021-01-02,3\n", false).expect("should parse");
        assert_eq!(loaded.table.len(), 1);
        assert_eq!(loaded.dropped_rows, 1);
    }

    #[test]
    fn test_standardize_column_name_variants() {
        assert_eq!(standardize_column_name("Temp Mean"), Some("temp_mean"));
        assert_eq!(standardize_column_name("tmin"), Some("temp_min"));
        assert_eq!(standardize_column_name("temp_real_feel_mean"), Some("temp_real_feel_mean"));
        assert_eq!(standardize_column_name("precip_total"), Some("precipitation_mean"));
        assert_eq!(standardize_column_name("precip_max"), Some("precipitation_max"));
        assert_eq!(standardize_column_name("Wind Speed Avg"), Some("wind_speed_mean"));
        assert_eq!(standardize_column_name("humidity"), Some("humidity_mean"));
        assert_eq!(standardize_column_name("pressure"), None);
    }
}
