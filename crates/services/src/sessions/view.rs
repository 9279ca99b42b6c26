use chrono::{DateTime, Utc};

use super::session::QuizPhase;
use super::workflow::QuizRun;

/// Presentation-agnostic snapshot of a live run.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling or localization assumptions
///
/// The UI decides how to render option states, the progress bar and the
/// feedback card from these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub phase: QuizPhase,
    /// 1-based number of the question on display.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    /// Options in presentation order.
    pub options: Vec<String>,
    pub selected: Option<usize>,
    /// Present while correctness is on display (including on failure).
    pub feedback: Option<FeedbackView>,
    pub score: u32,
    pub incorrect_count: u32,
    pub paused: bool,
    pub advance_due_at: Option<DateTime<Utc>>,
}

/// Correctness details for the feedback interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

impl QuizView {
    /// Captures the run as the presentation layer should currently see it.
    #[must_use]
    pub fn from_run(run: &QuizRun) -> Self {
        let session = run.session();
        let progress = session.progress();
        let shuffled = session.shuffled_question();

        let feedback = match (session.phase(), session.selected_answer()) {
            (QuizPhase::ShowingFeedback | QuizPhase::Failed, Some(selected)) => {
                Some(FeedbackView {
                    selected,
                    correct_index: shuffled.correct_index(),
                    is_correct: selected == shuffled.correct_index(),
                    explanation: session.current_question().explanation().to_owned(),
                })
            }
            _ => None,
        };

        Self {
            phase: session.phase(),
            number: progress.number,
            total: progress.total,
            prompt: session.current_question().prompt().to_owned(),
            options: shuffled.options().to_vec(),
            selected: session.selected_answer(),
            feedback,
            score: session.score(),
            incorrect_count: session.incorrect_count(),
            paused: run.paused(),
            advance_due_at: run.pending_advance_at(),
        }
    }

    /// Progress through the bank in `[0, 1]`, counting the current question.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.number as f32 / self.total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistory;
    use crate::sessions::QuizLoopService;
    use quiz_core::Clock;
    use quiz_core::model::{Question, QuestionBank, QuestionId, QuizSettings};
    use quiz_core::time::fixed_now;
    use std::sync::Arc;

    fn bank() -> QuestionBank {
        let questions = (1..=2u32)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec![format!("a{id}"), format!("b{id}")],
                    1,
                    format!("why {id}"),
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn service() -> QuizLoopService {
        QuizLoopService::new(
            Clock::fixed(fixed_now()),
            QuizSettings::default(),
            Arc::new(InMemoryHistory::new()),
        )
        .with_rng_seed(5)
    }

    #[test]
    fn awaiting_view_has_no_feedback() {
        let service = service();
        let run = service.start(&bank());
        let view = QuizView::from_run(&run);

        assert_eq!(view.phase, QuizPhase::AwaitingAnswer);
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 2);
        assert_eq!(view.options.len(), 2);
        assert!(view.feedback.is_none());
        assert!(view.selected.is_none());
        assert!(!view.paused);
        assert!((view.progress_fraction() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn feedback_view_carries_the_explanation() {
        let service = service();
        let mut run = service.start(&bank());
        let correct = run.session().shuffled_question().correct_index();
        service.select_answer(&mut run, correct);

        let view = QuizView::from_run(&run);
        assert_eq!(view.phase, QuizPhase::ShowingFeedback);
        let feedback = view.feedback.expect("feedback is on display");
        assert!(feedback.is_correct);
        assert_eq!(feedback.selected, correct);
        assert!(feedback.explanation.starts_with("why "));
        assert!(view.advance_due_at.is_some());
    }

    #[test]
    fn paused_flag_is_reflected() {
        let service = service();
        let mut run = service.start(&bank());
        service.pause(&mut run);
        assert!(QuizView::from_run(&run).paused);
    }
}
