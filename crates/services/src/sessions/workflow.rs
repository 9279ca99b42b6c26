use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{QuestionBank, QuizSettings};
use quiz_core::rank::compute_rank;

use crate::error::HistoryError;
use crate::history::{QuizHistory, QuizRecord};
use super::session::{AdvanceOutcome, AnswerFeedback, FinalScore, QuizPhase, QuizSession};

//
// ─── RUN ───────────────────────────────────────────────────────────────────────
//

/// One live session attempt with its scheduling state.
///
/// The run owns everything mutable about the attempt: the state machine, its
/// random source, the pending advance deadline and the pause flag. The
/// deadline is plain data, not a detached timer — dropping the run cancels it
/// with the run, so nothing can fire into a torn-down session.
pub struct QuizRun {
    session: QuizSession,
    rng: StdRng,
    pending_advance: Option<DateTime<Utc>>,
    paused: bool,
}

impl QuizRun {
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Deadline of the scheduled auto-advance, if one is armed.
    #[must_use]
    pub fn pending_advance_at(&self) -> Option<DateTime<Utc>> {
        self.pending_advance
    }
}

impl fmt::Debug for QuizRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRun")
            .field("session", &self.session)
            .field("pending_advance", &self.pending_advance)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

//
// ─── LOOP SERVICE ──────────────────────────────────────────────────────────────
//

/// Drives quiz runs against a clock and records finished sessions.
///
/// The presentation layer calls `select_answer` on taps and `tick` on its
/// render/timer cadence; the service decides when the scheduled advance is
/// actually due. It owns the time source and the history store; it does not
/// own any UI concern.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    history: Arc<dyn QuizHistory>,
    rng_seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, settings: QuizSettings, history: Arc<dyn QuizHistory>) -> Self {
        Self {
            clock,
            settings,
            history,
            rng_seed: None,
        }
    }

    /// Seeds every run's random source, making shuffles reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Starts a fresh run over the bank.
    ///
    /// Question order and answer orders are reshuffled on every start, so
    /// going home and coming back yields a new arrangement.
    #[must_use]
    pub fn start(&self, bank: &QuestionBank) -> QuizRun {
        let mut rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let session = QuizSession::start(bank, self.settings.clone(), &mut rng);
        info!("quiz started with {} questions", session.total());

        QuizRun {
            session,
            rng,
            pending_advance: None,
            paused: false,
        }
    }

    /// Records a tap on option `index`.
    ///
    /// Ignored while paused (pausing gates input). When feedback is recorded
    /// the auto-advance is scheduled one feedback delay from now; a failed
    /// session schedules nothing and waits for its restart.
    pub fn select_answer(&self, run: &mut QuizRun, index: usize) -> Option<AnswerFeedback> {
        if run.paused {
            return None;
        }

        let feedback = run.session.select_answer(index)?;
        if feedback.failed {
            warn!(
                "failure threshold reached after {} incorrect answers",
                run.session.incorrect_count()
            );
            run.pending_advance = None;
        } else {
            let due_at = self.clock.now() + self.settings.feedback_delay();
            run.pending_advance = Some(due_at);
            debug!("advance scheduled for {due_at}");
        }
        Some(feedback)
    }

    /// Fires the scheduled advance once its deadline passes.
    ///
    /// Call on every render/timer tick. Does nothing while paused, with no
    /// deadline armed, or before the deadline. A completed session is
    /// appended to the history exactly once, from here.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` when the finished result cannot be recorded.
    pub fn tick(&self, run: &mut QuizRun) -> Result<Option<AdvanceOutcome>, HistoryError> {
        if run.paused {
            return Ok(None);
        }
        let Some(due_at) = run.pending_advance else {
            return Ok(None);
        };
        if self.clock.now() < due_at {
            return Ok(None);
        }

        run.pending_advance = None;
        let outcome = run.session.advance(&mut run.rng);
        if let Some(AdvanceOutcome::Completed(final_score)) = outcome {
            info!(
                "quiz complete: {}/{}",
                final_score.score, final_score.total
            );
            self.record(final_score)?;
        }
        Ok(outcome)
    }

    /// Pauses the run: input is gated and the pending advance is cancelled.
    pub fn pause(&self, run: &mut QuizRun) {
        run.paused = true;
        run.pending_advance = None;
        debug!("run paused");
    }

    /// Resumes the run; if feedback is still on display the advance is
    /// re-armed with a full feedback delay.
    pub fn resume(&self, run: &mut QuizRun) {
        if !run.paused {
            return;
        }
        run.paused = false;
        if run.session.phase() == QuizPhase::ShowingFeedback {
            run.pending_advance = Some(self.clock.now() + self.settings.feedback_delay());
        }
        debug!("run resumed");
    }

    /// Restarts a failed run over a reshuffled bank.
    pub fn restart_after_failure(&self, run: &mut QuizRun) -> bool {
        run.pending_advance = None;
        let restarted = run.session.restart_after_failure(&mut run.rng);
        if restarted {
            info!("session restarted after failure");
        }
        restarted
    }

    /// Restarts a completed run ("try again" on the results screen).
    pub fn restart_fresh(&self, run: &mut QuizRun) -> bool {
        run.pending_advance = None;
        let restarted = run.session.restart_fresh(&mut run.rng);
        if restarted {
            info!("session restarted from results");
        }
        restarted
    }

    fn record(&self, final_score: FinalScore) -> Result<(), HistoryError> {
        let tier = compute_rank(
            final_score.score,
            final_score.total,
            &self.settings.thresholds(),
        )?;
        self.history.append(QuizRecord {
            completed_at: self.clock.now(),
            score: final_score.score,
            total: final_score.total,
            rank: tier.name,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
