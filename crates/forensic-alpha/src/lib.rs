//! Forensic alpha
//!
//! Standardizes the four forensic score series, combines them into a single
//! weighted alpha per year and maps each alpha to a recommendation.
//! [`run_pipeline`] drives the whole chain from a raw statement table.

pub mod aggregator;
pub mod classifier;
pub mod normalization;
pub mod pipeline;

pub use aggregator::{aggregate, AlphaRow, AlphaSeries};
pub use classifier::classify;
pub use normalization::{normalize_board, normalize_series, NormalizationMode};
pub use pipeline::{run_pipeline, ForensicAlphaEngine, ForensicReport, PipelineConfig};
