use thiserror::Error;

/// Failures of the parse / normalize / aggregate / assemble pipeline.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("line {line}: {reason} (got {content:?})")]
    Format {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("expected {expected} data rows, input ended after {found}")]
    Truncated { expected: usize, found: usize },

    #[error("normalization divisor is zero or not finite at x = {x}")]
    Division { x: f64 },

    #[error("series has no measured values")]
    EmptySeries,

    #[error("invalid axis configuration: {0}")]
    InvalidAxis(String),

    #[error("reading measurements: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub(crate) fn format(line: usize, content: &str, reason: impl Into<String>) -> Self {
        DataError::Format {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}
