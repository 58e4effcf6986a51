//! Error types for the core engine.
//!
//! Only three things can go wrong inside the engine: the dataset fails to
//! load, a caller names a period that does not exist, or a caller talks to
//! a session whose dataset is not available. Everything else (toggling
//! filters, selecting, exiting a site) is total.

use thiserror::Error;

/// The initial dataset fetch, parse or validation failed.
///
/// A session that sees this error never publishes a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch dataset from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid dataset: {0}")]
    Invalid(String),
}

impl LoadError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        LoadError::Invalid(message.into())
    }
}

/// A period id outside the closed set of timeline segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("unknown period id: {0}")]
    InvalidPeriod(String),
}

/// An attribute name outside `order`, `morphology`, `age`, `date`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute: {0}")]
pub struct UnknownAttribute(pub String);

/// The session cannot serve requests in its current load state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("dataset is still loading")]
    Loading,
    #[error("dataset unavailable: {0}")]
    NoData(String),
    #[error("dataset load already completed")]
    AlreadySettled,
}
