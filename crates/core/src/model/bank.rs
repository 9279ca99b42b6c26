use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

/// The full static set of questions available to a session.
///
/// Non-empty, ids unique, order as authored. Sessions draw a fresh random
/// permutation from it at start; the bank itself is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

#[allow(clippy::len_without_is_empty)]
impl QuestionBank {
    /// Builds a bank from already-validated questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list and
    /// `BankError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId(question.id()));
            }
        }

        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions; always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["a".to_string(), "b".to_string()],
            0,
            "",
        )
        .unwrap()
    }

    #[test]
    fn empty_bank_is_rejected() {
        let err = QuestionBank::new(Vec::new()).unwrap_err();
        assert!(matches!(err, BankError::Empty));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = QuestionBank::new(vec![question(1), question(2), question(1)]).unwrap_err();
        assert_eq!(err, BankError::DuplicateId(QuestionId::new(1)));
    }

    #[test]
    fn lookup_by_id() {
        let bank = QuestionBank::new(vec![question(1), question(2)]).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(QuestionId::new(2)).map(Question::id), Some(QuestionId::new(2)));
        assert!(bank.get(QuestionId::new(3)).is_none());
    }
}
