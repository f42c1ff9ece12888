use forensic_core::{
    CanonicalVariable, CanonicalVariableSet, Diagnostic, FiscalYear, RawStatementTable,
    Recommendation, ScoreBoard,
};
use forensic_scores::{ForensicScoreEngine, ScoreInterpretation};
use serde::{Deserialize, Serialize};
use statement_normalizer::{DataQualitySummary, LineItemNormalizer, SynonymTable};
use std::collections::BTreeMap;

use crate::{aggregate, classify, normalize_board, AlphaSeries, NormalizationMode};

/// Knobs for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub normalization: NormalizationMode,
    /// Extra line-item labels on top of the built-in synonyms
    #[serde(default)]
    pub aliases: Vec<(String, CanonicalVariable)>,
}

/// Everything derived from one statement table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForensicReport {
    pub years: Vec<FiscalYear>,
    pub variables: CanonicalVariableSet,
    pub scores: ScoreBoard,
    pub normalized: ScoreBoard,
    pub alpha: AlphaSeries,
    pub recommendations: BTreeMap<FiscalYear, Recommendation>,
    pub interpretations: BTreeMap<FiscalYear, ScoreInterpretation>,
    pub diagnostics: Vec<Diagnostic>,
    pub quality: DataQualitySummary,
}

impl ForensicReport {
    /// Recommendation for the most recent year that has one
    pub fn latest(&self) -> Option<(&FiscalYear, Recommendation)> {
        self.recommendations.iter().next_back().map(|(y, r)| (y, *r))
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Runs normalization, scoring, standardization and aggregation in order
pub struct ForensicAlphaEngine {
    normalizer: LineItemNormalizer,
    scorer: ForensicScoreEngine,
    normalization: NormalizationMode,
}

impl ForensicAlphaEngine {
    pub fn new(config: &PipelineConfig) -> Self {
        let synonyms = SynonymTable::standard().with_aliases(&config.aliases);
        Self {
            normalizer: LineItemNormalizer::new(synonyms),
            scorer: ForensicScoreEngine::new(),
            normalization: config.normalization,
        }
    }

    pub fn run(&self, table: &RawStatementTable) -> ForensicReport {
        tracing::info!(
            "Starting forensic scan: {} rows over {} years",
            table.rows().len(),
            table.years().len()
        );

        let normalized_statements = self.normalizer.normalize(table);
        let variables = normalized_statements.variables;

        let scores = self.scorer.score(&variables);
        let normalized = normalize_board(&scores, self.normalization);
        let alpha = aggregate(&normalized);
        let recommendations = classify(&alpha);

        let interpretations = variables
            .years()
            .iter()
            .map(|year| (year.clone(), ScoreInterpretation::interpret(&scores, year)))
            .collect();

        let mut warnings = 0usize;
        for diagnostic in &normalized_statements.diagnostics {
            if diagnostic.is_warning() {
                warnings += 1;
            }
            tracing::debug!("{}", diagnostic);
        }
        if warnings > 0 {
            tracing::warn!("{} input problems recovered; see diagnostics", warnings);
        }

        tracing::info!(
            "Forensic scan complete: {} of {} years with alpha ({:?} normalization)",
            alpha.len(),
            variables.years().len(),
            self.normalization
        );
        for (year, rec) in &recommendations {
            tracing::debug!("{}: {}", year, rec);
        }

        ForensicReport {
            years: variables.years().to_vec(),
            variables,
            scores,
            normalized,
            alpha,
            recommendations,
            interpretations,
            diagnostics: normalized_statements.diagnostics,
            quality: normalized_statements.quality,
        }
    }
}

/// Run the whole pipeline over `table`.
///
/// Deterministic: the same table and config always produce a report that
/// serializes to the same bytes.
pub fn run_pipeline(table: &RawStatementTable, config: &PipelineConfig) -> ForensicReport {
    ForensicAlphaEngine::new(config).run(table)
}
