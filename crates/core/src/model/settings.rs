use chrono::Duration;
use thiserror::Error;

use crate::rank::RankThresholds;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("feedback delay must be at most 60000 ms")]
    InvalidFeedbackDelay,

    #[error("max incorrect must be > 0")]
    InvalidMaxIncorrect,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunable knobs for one quiz session.
///
/// Defaults are the shipped product values: 1.5 s of feedback before the
/// auto-advance, failure on the 10th wrong answer, rank cutoffs at thirds of
/// the bank size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    feedback_delay_ms: u32,
    max_incorrect: u32,
    thresholds: RankThresholds,
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// A zero feedback delay is allowed (the advance fires on the next tick),
    /// which is what deterministic tests use.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when the delay exceeds a minute or the failure
    /// threshold is zero.
    pub fn new(
        feedback_delay_ms: u32,
        max_incorrect: u32,
        thresholds: RankThresholds,
    ) -> Result<Self, SettingsError> {
        if feedback_delay_ms > 60_000 {
            return Err(SettingsError::InvalidFeedbackDelay);
        }
        if max_incorrect == 0 {
            return Err(SettingsError::InvalidMaxIncorrect);
        }

        Ok(Self {
            feedback_delay_ms,
            max_incorrect,
            thresholds,
        })
    }

    #[must_use]
    pub fn feedback_delay_ms(&self) -> u32 {
        self.feedback_delay_ms
    }

    /// Feedback display interval as a duration.
    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        Duration::milliseconds(i64::from(self.feedback_delay_ms))
    }

    /// Number of incorrect answers that fails the session.
    #[must_use]
    pub fn max_incorrect(&self) -> u32 {
        self.max_incorrect
    }

    #[must_use]
    pub fn thresholds(&self) -> RankThresholds {
        self.thresholds
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 1_500,
            max_incorrect: 10,
            thresholds: RankThresholds::thirds(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
