mod bank;
mod ids;
mod question;
mod settings;

pub use bank::{BankError, QuestionBank};
pub use ids::QuestionId;
pub use question::{Question, QuestionError};
pub use settings::{QuizSettings, SettingsError};
