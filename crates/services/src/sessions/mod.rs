mod progress;
mod session;
mod shuffle;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use progress::QuizProgress;
pub use session::{AdvanceOutcome, AnswerFeedback, FinalScore, QuizPhase, QuizSession};
pub use shuffle::{ShuffledQuestion, shuffle_answers, shuffled};
pub use view::{FeedbackView, QuizView};
pub use workflow::{QuizLoopService, QuizRun};
