use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has a blank prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} needs at least 2 options, got {len}")]
    TooFewOptions { id: QuestionId, len: usize },

    #[error("question {id} option {index} is blank")]
    EmptyOption { id: QuestionId, index: usize },

    #[error("question {id} marks option {index} correct but only has {len} options")]
    CorrectAnswerOutOfBounds {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question.
///
/// Validated at construction: a `Question` that exists is well-formed, so a
/// bad correct-answer index surfaces at bank-load time and never mid-quiz.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or any option is blank, fewer
    /// than two options are given, or `correct_answer` does not index into
    /// `options`.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                len: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { id, index });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfBounds {
                id,
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_answer,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in their authored order; presentation order is derived per
    /// session.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option within `options`.
    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
