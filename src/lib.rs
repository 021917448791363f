/// Weather summary library.
///
/// Turns daily weather observations into a short narrative: the analyzer
/// computes per-variable statistics and cross-variable patterns, the planner
/// picks the notable findings, and the realizer renders them through a
/// template bank. `summarizer::Summarizer` runs the three in order.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod lexicon;
pub mod logging;
pub mod model;
pub mod planner;
pub mod realize;
pub mod summarizer;
pub mod variables;
