use thiserror::Error;

/// Structural problems that stop the pipeline before any scoring happens.
///
/// Cell-level and formula-level problems are not errors: they surface as
/// absent values and [`Diagnostic`](crate::Diagnostic)s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForensicError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("No year columns supplied")]
    NoYears,

    #[error("Duplicate year column: {0}")]
    DuplicateYear(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),
}
