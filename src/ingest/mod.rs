/// Boundary loaders that turn source files into an `ObservationTable`.
///
/// Submodules:
/// - `daily_csv` — daily weather CSV exports (one row per day).

pub mod daily_csv;
