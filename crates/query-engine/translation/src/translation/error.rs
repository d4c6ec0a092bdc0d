//! Errors for filter translation.

use query_engine_sql::sql;

/// A type for translation errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a filter must be an object, found {0}")]
    NotAFilter(&'static str),
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("invalid operand for '{operator}': {reason}")]
    InvalidOperand { operator: String, reason: String },
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("filter is nested deeper than the limit of {limit}")]
    NestingTooDeep { limit: usize },
    #[error(transparent)]
    Format(#[from] sql::format::Error),
    #[error("invalid filter document: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_operand(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOperand {
            operator: operator.into(),
            reason: reason.into(),
        }
    }
}
