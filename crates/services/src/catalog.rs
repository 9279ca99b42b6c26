//! Question content: the built-in bank and the JSON loading path.

use serde::{Deserialize, Serialize};

use quiz_core::model::{Question, QuestionBank, QuestionError, QuestionId};

use crate::error::CatalogError;

/// Raw shape of a question as authored in catalog files.
///
/// This mirrors the domain `Question` so catalogs can be serialized without
/// leaking file-format concerns into the domain layer; `into_question` is
/// where validation happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            question: question.prompt().to_owned(),
            options: question.options().to_vec(),
            correct_answer: question.correct_answer(),
            explanation: question.explanation().to_owned(),
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for malformed content (blank text, too few
    /// options, correct answer out of bounds).
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new(self.id),
            self.question,
            self.options,
            self.correct_answer,
            self.explanation,
        )
    }
}

/// Builds a bank from raw records, validating every question.
///
/// # Errors
///
/// Returns `CatalogError` when any record is malformed or the set does not
/// form a valid bank (empty, duplicate ids).
pub fn bank_from_records(records: Vec<QuestionRecord>) -> Result<QuestionBank, CatalogError> {
    let questions = records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionBank::new(questions)?)
}

/// Loads a bank from a JSON array of question records.
///
/// # Errors
///
/// Returns `CatalogError` for malformed JSON or invalid question data.
pub fn bank_from_json(raw: &str) -> Result<QuestionBank, CatalogError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
    bank_from_records(records)
}

/// The built-in wig-knowledge bank shipped with the app.
///
/// # Panics
///
/// Panics if the bundled catalog fails validation, which would be a packaging
/// error caught by the tests below.
#[must_use]
pub fn builtin_bank() -> QuestionBank {
    bank_from_json(include_str!("../data/questions.json"))
        .expect("bundled question catalog is valid")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
