#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod history;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{CatalogError, HistoryError};
pub use history::{HistoryService, InMemoryHistory, PlayerStats, QuizHistory, QuizRecord};
pub use sessions::{
    AdvanceOutcome, AnswerFeedback, FeedbackView, FinalScore, QuizLoopService, QuizPhase,
    QuizProgress, QuizRun, QuizSession, QuizView, ShuffledQuestion,
};
