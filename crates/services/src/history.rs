use chrono::{DateTime, Utc};
use log::debug;
use std::sync::{Arc, Mutex};

use quiz_core::rank::RankName;

use crate::error::HistoryError;

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// One finished session, as the profile statistics consume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRecord {
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub rank: RankName,
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Append-only store of finished sessions.
pub trait QuizHistory: Send + Sync {
    /// Appends a finished session.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the store is unusable.
    fn append(&self, record: QuizRecord) -> Result<(), HistoryError>;

    /// All records in completion order.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the store is unusable.
    fn records(&self) -> Result<Vec<QuizRecord>, HistoryError>;
}

/// In-memory history; contents reset with the process.
///
/// Durable statistics are out of scope, so this is the only store shipped.
/// Cloning shares the underlying records.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistory {
    records: Arc<Mutex<Vec<QuizRecord>>>,
}

impl InMemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuizHistory for InMemoryHistory {
    fn append(&self, record: QuizRecord) -> Result<(), HistoryError> {
        let mut records = self.records.lock().map_err(|_| HistoryError::Poisoned)?;
        debug!("recording quiz result {}/{}", record.score, record.total);
        records.push(record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<QuizRecord>, HistoryError> {
        let records = self.records.lock().map_err(|_| HistoryError::Poisoned)?;
        Ok(records.clone())
    }
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Aggregate numbers the profile screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub total_quizzes: u32,
    pub best_score: u32,
    /// Mean score per quiz, rounded to the nearest whole answer.
    pub average_score: u32,
    pub total_correct: u32,
    pub total_questions: u32,
    /// Rank earned by the most recent session, if any.
    pub current_rank: Option<RankName>,
}

/// Statistics facade that hides the store from the presentation layer.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn QuizHistory>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn QuizHistory>) -> Self {
        Self { history }
    }

    /// A service over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryHistory::new()))
    }

    /// Aggregates every recorded session.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the store is unusable.
    pub fn stats(&self) -> Result<PlayerStats, HistoryError> {
        let records = self.history.records()?;

        let total_quizzes = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let total_correct: u32 = records.iter().map(|record| record.score).sum();
        let total_questions: u32 = records.iter().map(|record| record.total).sum();
        let best_score = records.iter().map(|record| record.score).max().unwrap_or(0);
        let average_score = if total_quizzes == 0 {
            0
        } else {
            // Integer rounding to the nearest whole answer.
            (total_correct + total_quizzes / 2) / total_quizzes
        };

        Ok(PlayerStats {
            total_quizzes,
            best_score,
            average_score,
            total_correct,
            total_questions,
            current_rank: records.last().map(|record| record.rank),
        })
    }

    /// Latest records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the store is unusable.
    pub fn recent(&self, limit: usize) -> Result<Vec<QuizRecord>, HistoryError> {
        let mut records = self.history.records()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
