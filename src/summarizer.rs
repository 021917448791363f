/// Pipeline orchestration: analyze → plan → realize → join.
///
/// `Summarizer` owns the configuration and the realizer (and through it the
/// random source for phrasing). Skipped sentences are logged here, once, with
/// a level that reflects whether the gap was expected.

use rand::Rng;
use rand::rngs::StdRng;

use crate::analysis;
use crate::config::{SummaryConfig, UNKNOWN_STATION};
use crate::logging::{self, Stage};
use crate::model::{DatasetStatistics, ObservationTable, SummaryError, VariableGroup};
use crate::planner::{self, Fact};
use crate::realize::{Realization, TemplateRealizer};

pub struct Summarizer<R: Rng = StdRng> {
    config: SummaryConfig,
    variable_groups: Vec<VariableGroup>,
    realizer: TemplateRealizer<R>,
}

impl Summarizer<StdRng> {
    pub fn new(config: SummaryConfig) -> Self {
        let realizer = TemplateRealizer::new(config.units);
        Self::with_realizer(config, realizer)
    }

    /// Summarizer whose phrasing choices repeat for the same seed.
    pub fn seeded(config: SummaryConfig, seed: u64) -> Self {
        let realizer = TemplateRealizer::with_seed(config.units, seed);
        Self::with_realizer(config, realizer)
    }
}

impl<R: Rng> Summarizer<R> {
    pub fn with_realizer(config: SummaryConfig, realizer: TemplateRealizer<R>) -> Self {
        let variable_groups = config.variable_groups();
        Self {
            config,
            variable_groups,
            realizer,
        }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Station name from the config, else `fallback`, else "unknown".
    pub fn station_name<'a>(&'a self, fallback: Option<&'a str>) -> &'a str {
        self.config
            .station_name
            .as_deref()
            .or(fallback)
            .unwrap_or(UNKNOWN_STATION)
    }

    pub fn analyze(&self, table: &ObservationTable, station_name: &str) -> Result<DatasetStatistics, SummaryError> {
        analysis::analyze_with(table, &self.variable_groups, station_name, &self.config.analysis)
    }

    pub fn plan<'a>(&self, stats: &'a DatasetStatistics) -> Vec<Fact<'a>> {
        planner::select_content(stats, &self.config.thresholds, &self.config.planner)
    }

    /// Renders facts in order and joins the non-empty sentences with single
    /// spaces.
    pub fn render(&mut self, facts: &[Fact]) -> String {
        let mut sentences = Vec::with_capacity(facts.len());

        for fact in facts {
            match self.realizer.realize(fact) {
                Realization::Text(text) if !text.is_empty() => sentences.push(text),
                Realization::Text(_) => {}
                Realization::Skipped { kind, reason } => {
                    logging::log_skipped_fact(&kind, reason.severity(), &reason.to_string());
                }
            }
        }

        logging::debug(
            Stage::Realizer,
            None,
            &format!("{} of {} facts rendered", sentences.len(), facts.len()),
        );
        sentences.join(" ")
    }

    /// Full pipeline over one table.
    pub fn generate_summary(&mut self, table: &ObservationTable, station_name: &str) -> Result<String, SummaryError> {
        let stats = self.analyze(table, station_name)?;
        let facts = self.plan(&stats);
        Ok(self.render(&facts))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
