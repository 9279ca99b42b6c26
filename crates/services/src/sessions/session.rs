use log::{debug, warn};
use rand::Rng;
use std::fmt;

use quiz_core::model::{Question, QuestionBank, QuizSettings};

use super::progress::QuizProgress;
use super::shuffle::{ShuffledQuestion, shuffle_answers, shuffled};

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of the current question attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for the user to pick an option.
    AwaitingAnswer,
    /// An answer was recorded; correctness is on display.
    ShowingFeedback,
    /// The session advanced past the last question.
    Completed,
    /// The incorrect-answer threshold was reached mid-session.
    Failed,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Final result emitted when a session completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub total: u32,
}

/// What `select_answer` recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    /// True when this answer tripped the failure threshold.
    pub failed: bool,
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion,
    Completed(FinalScore),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at the question bank, from start to completion or failure.
///
/// The session owns a random permutation of the bank and steps through it via
/// explicit transitions. Invalid transitions are silent no-ops rather than
/// errors: duplicate taps and stray input events reach the machine unfiltered
/// and must not corrupt it or double-score a question.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    shuffled: ShuffledQuestion,
    score: u32,
    incorrect: u32,
    selected: Option<usize>,
    phase: QuizPhase,
    settings: QuizSettings,
}

impl QuizSession {
    /// Starts a session over a fresh random permutation of the bank.
    #[must_use]
    pub fn start<R: Rng + ?Sized>(
        bank: &QuestionBank,
        settings: QuizSettings,
        rng: &mut R,
    ) -> Self {
        let questions = shuffled(bank.questions(), rng);
        debug!("shuffled {} questions for a new session", questions.len());
        let first = derive_answer_order(&questions[0], rng);

        Self {
            questions,
            current: 0,
            shuffled: first,
            score: 0,
            incorrect: 0,
            selected: None,
            phase: QuizPhase::AwaitingAnswer,
            settings,
        }
    }

    /// Records the user's selection for the current question.
    ///
    /// At most one answer is scored per question: outside `AwaitingAnswer`
    /// the call is ignored and returns `None`, as is an index that names no
    /// option. An incorrect answer that reaches the configured threshold
    /// fails the session instead of moving it to feedback; that check
    /// supersedes normal advancement.
    pub fn select_answer(&mut self, index: usize) -> Option<AnswerFeedback> {
        if self.phase != QuizPhase::AwaitingAnswer {
            return None;
        }
        if index >= self.shuffled.options().len() {
            warn!("ignoring out-of-range answer index {index}");
            return None;
        }

        let correct_index = self.shuffled.correct_index();
        let is_correct = index == correct_index;
        self.selected = Some(index);
        if is_correct {
            self.score += 1;
            debug!("correct answer, score now {}", self.score);
        } else {
            self.incorrect += 1;
            debug!("incorrect answer, {} wrong so far", self.incorrect);
        }

        self.phase = if !is_correct && self.incorrect >= self.settings.max_incorrect() {
            QuizPhase::Failed
        } else {
            QuizPhase::ShowingFeedback
        };

        Some(AnswerFeedback {
            selected: index,
            correct_index,
            is_correct,
            failed: self.phase == QuizPhase::Failed,
        })
    }

    /// Moves past the feedback display.
    ///
    /// Only meaningful while feedback is showing; a failed session never
    /// advances (its resolution is `restart_after_failure`). The next
    /// question gets a freshly shuffled answer order; advancing past the
    /// last question is the only way to reach `Completed`.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<AdvanceOutcome> {
        if self.phase != QuizPhase::ShowingFeedback {
            return None;
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
            self.shuffled = derive_answer_order(&self.questions[self.current], rng);
            self.phase = QuizPhase::AwaitingAnswer;
            Some(AdvanceOutcome::NextQuestion)
        } else {
            self.phase = QuizPhase::Completed;
            Some(AdvanceOutcome::Completed(FinalScore {
                score: self.score,
                total: self.total(),
            }))
        }
    }

    /// Restarts after the failure threshold was hit.
    ///
    /// The only recovery path out of `Failed`: reshuffles the full bank and
    /// zeroes every counter. No-op (returns false) from any other phase.
    pub fn restart_after_failure<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != QuizPhase::Failed {
            return false;
        }
        self.reset(rng);
        true
    }

    /// "Try again" from the results screen: same reset, from `Completed`.
    pub fn restart_fresh<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != QuizPhase::Completed {
            return false;
        }
        self.reset(rng);
        true
    }

    fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions = shuffled(&self.questions, rng);
        self.current = 0;
        self.score = 0;
        self.incorrect = 0;
        self.selected = None;
        self.shuffled = derive_answer_order(&self.questions[0], rng);
        self.phase = QuizPhase::AwaitingAnswer;
        debug!("session reset over {} questions", self.questions.len());
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect
    }

    /// The selection recorded for the current question, if any.
    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    /// The question currently on display (the last one once the session is
    /// over).
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// The current question's options in presentation order.
    #[must_use]
    pub fn shuffled_question(&self) -> &ShuffledQuestion {
        &self.shuffled
    }

    /// Number of questions in this session.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Session order of the questions, a permutation of the bank.
    #[must_use]
    pub fn question_order(&self) -> &[Question] {
        &self.questions
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            number: self.current + 1,
            total: self.questions.len(),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.phase == QuizPhase::Failed
    }

    /// Final `{score, total}` once the session has completed.
    #[must_use]
    pub fn final_score(&self) -> Option<FinalScore> {
        if self.is_complete() {
            Some(FinalScore {
                score: self.score,
                total: self.total(),
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }
}

fn derive_answer_order<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> ShuffledQuestion {
    shuffle_answers(question.options(), question.correct_answer(), rng)
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("incorrect", &self.incorrect)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, QuizSettings};
    use quiz_core::rank::RankThresholds;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_bank(n: u32) -> QuestionBank {
        let questions = (1..=n)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec![
                        format!("q{id} a"),
                        format!("q{id} b"),
                        format!("q{id} c"),
                        format!("q{id} d"),
                    ],
                    (id as usize) % 4,
                    format!("because of q{id}"),
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    fn start(n: u32) -> (QuizSession, StdRng) {
        let mut rng = rng();
        let session = QuizSession::start(&build_bank(n), QuizSettings::default(), &mut rng);
        (session, rng)
    }

    fn answer_correctly(session: &mut QuizSession) -> AnswerFeedback {
        let correct = session.shuffled_question().correct_index();
        session.select_answer(correct).unwrap()
    }

    fn answer_incorrectly(session: &mut QuizSession) -> AnswerFeedback {
        let correct = session.shuffled_question().correct_index();
        let wrong = (correct + 1) % session.shuffled_question().options().len();
        session.select_answer(wrong).unwrap()
    }

    #[test]
    fn session_order_is_a_permutation_of_the_bank() {
        let bank = build_bank(20);
        let mut rng = rng();
        let session = QuizSession::start(&bank, QuizSettings::default(), &mut rng);

        let mut session_ids: Vec<_> =
            session.question_order().iter().map(Question::id).collect();
        let mut bank_ids: Vec<_> = bank.questions().iter().map(Question::id).collect();
        session_ids.sort();
        bank_ids.sort();
        assert_eq!(session_ids, bank_ids);
    }

    #[test]
    fn correct_answer_scores_and_shows_feedback() {
        let (mut session, _) = start(3);
        let feedback = answer_correctly(&mut session);

        assert!(feedback.is_correct);
        assert!(!feedback.failed);
        assert_eq!(session.score(), 1);
        assert_eq!(session.incorrect_count(), 0);
        assert_eq!(session.phase(), QuizPhase::ShowingFeedback);
        assert_eq!(session.selected_answer(), Some(feedback.selected));
    }

    #[test]
    fn second_selection_in_the_same_question_is_ignored() {
        let (mut session, _) = start(3);
        answer_correctly(&mut session);
        let score = session.score();
        let incorrect = session.incorrect_count();

        assert!(session.select_answer(0).is_none());
        assert_eq!(session.score(), score);
        assert_eq!(session.incorrect_count(), incorrect);
        assert_eq!(session.phase(), QuizPhase::ShowingFeedback);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let (mut session, _) = start(3);
        assert!(session.select_answer(99).is_none());
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn advance_requires_feedback() {
        let (mut session, mut rng) = start(3);
        assert!(session.advance(&mut rng).is_none());
        assert_eq!(session.progress().number, 1);
    }

    #[test]
    fn advance_moves_to_the_next_question_with_fresh_answer_order() {
        let (mut session, mut rng) = start(3);
        answer_correctly(&mut session);

        assert_eq!(session.advance(&mut rng), Some(AdvanceOutcome::NextQuestion));
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);
        assert_eq!(session.selected_answer(), None);
        assert_eq!(session.progress().number, 2);

        let question = session.current_question();
        let shuffled = session.shuffled_question();
        assert_eq!(
            shuffled.options()[shuffled.correct_index()],
            question.options()[question.correct_answer()]
        );
    }

    #[test]
    fn completing_every_question_emits_the_final_score() {
        let (mut session, mut rng) = start(3);

        for expected in 1..=3u32 {
            answer_correctly(&mut session);
            assert_eq!(session.score(), expected);
            let outcome = session.advance(&mut rng).unwrap();
            if expected < 3 {
                assert_eq!(outcome, AdvanceOutcome::NextQuestion);
            } else {
                assert_eq!(
                    outcome,
                    AdvanceOutcome::Completed(FinalScore { score: 3, total: 3 })
                );
            }
        }

        assert!(session.is_complete());
        assert_eq!(session.final_score(), Some(FinalScore { score: 3, total: 3 }));
    }

    #[test]
    fn score_and_incorrect_count_partition_a_full_run() {
        let (mut session, mut rng) = start(8);

        let mut answered = 0u32;
        loop {
            if answered % 3 == 0 {
                answer_incorrectly(&mut session);
            } else {
                answer_correctly(&mut session);
            }
            answered += 1;
            match session.advance(&mut rng) {
                Some(AdvanceOutcome::NextQuestion) => {}
                Some(AdvanceOutcome::Completed(final_score)) => {
                    assert_eq!(final_score.total, 8);
                    assert_eq!(
                        final_score.score + session.incorrect_count(),
                        final_score.total
                    );
                    assert!(final_score.score <= final_score.total);
                    break;
                }
                None => panic!("advance must progress after feedback"),
            }
        }
        assert_eq!(answered, 8);
    }

    #[test]
    fn tenth_incorrect_answer_fails_the_session() {
        let (mut session, mut rng) = start(20);

        for nth in 1..=10u32 {
            let feedback = answer_incorrectly(&mut session);
            assert_eq!(session.incorrect_count(), nth);
            if nth < 10 {
                assert!(!feedback.failed);
                assert_eq!(session.advance(&mut rng), Some(AdvanceOutcome::NextQuestion));
            } else {
                assert!(feedback.failed);
            }
        }

        assert!(session.is_failed());
        // Questions remain, but a failed session never advances.
        assert!(session.advance(&mut rng).is_none());
        assert!(session.select_answer(0).is_none());
    }

    #[test]
    fn lower_threshold_fails_sooner() {
        let settings = QuizSettings::new(1_500, 2, RankThresholds::thirds()).unwrap();
        let mut rng = rng();
        let mut session = QuizSession::start(&build_bank(5), settings, &mut rng);

        answer_incorrectly(&mut session);
        session.advance(&mut rng);
        let feedback = answer_incorrectly(&mut session);

        assert!(feedback.failed);
        assert!(session.is_failed());
    }

    #[test]
    fn restart_after_failure_resets_everything() {
        let bank = build_bank(12);
        let mut rng = rng();
        let mut session = QuizSession::start(&bank, QuizSettings::default(), &mut rng);

        answer_correctly(&mut session);
        session.advance(&mut rng);
        for _ in 0..10 {
            answer_incorrectly(&mut session);
            session.advance(&mut rng);
        }
        assert!(session.is_failed());

        assert!(session.restart_after_failure(&mut rng));
        assert_eq!(session.score(), 0);
        assert_eq!(session.incorrect_count(), 0);
        assert_eq!(session.selected_answer(), None);
        assert_eq!(session.progress().number, 1);
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);

        let mut ids: Vec<_> = session.question_order().iter().map(Question::id).collect();
        let mut bank_ids: Vec<_> = bank.questions().iter().map(Question::id).collect();
        ids.sort();
        bank_ids.sort();
        assert_eq!(ids, bank_ids);
    }

    #[test]
    fn restart_after_failure_is_a_no_op_elsewhere() {
        let (mut session, _) = start(3);
        assert!(!session.restart_after_failure(&mut rng()));
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);
    }

    #[test]
    fn restart_fresh_only_applies_to_a_completed_session() {
        let (mut session, mut rng) = start(2);
        assert!(!session.restart_fresh(&mut rng));

        answer_correctly(&mut session);
        session.advance(&mut rng);
        answer_incorrectly(&mut session);
        session.advance(&mut rng);
        assert!(session.is_complete());

        assert!(session.restart_fresh(&mut rng));
        assert_eq!(session.score(), 0);
        assert_eq!(session.incorrect_count(), 0);
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);
    }
}
