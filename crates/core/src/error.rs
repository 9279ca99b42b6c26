use thiserror::Error;

use crate::model::{BankError, QuestionError, SettingsError};
use crate::rank::RankError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Rank(#[from] RankError),
}
