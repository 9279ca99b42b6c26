//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, QuestionError};
use quiz_core::rank::RankError;

/// Errors emitted while loading a question catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Errors emitted by the quiz history.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error("history store lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Rank(#[from] RankError),
}
