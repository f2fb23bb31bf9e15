pub mod answer;
pub mod plan;
pub mod quiz;
pub mod submission;

pub use answer::{coerce_answer, AnswerValue};
pub use plan::{Plan, TaskType};
pub use quiz::{QuizPage, QuizRound, QuizTask, SessionSummary};
pub use submission::{SubmissionPayload, SubmissionResult, Transition};
