//! Quiz model: questions, their answer spaces and the run-wide registry.

pub mod answer_space;
pub mod hypothesis;
pub mod question;
pub mod question_type;
pub mod records;
pub mod registry;

pub use hypothesis::{Correctness, Hypothesis};
pub use question::{AnswerOption, Question};
pub use question_type::QuestionType;
pub use records::{
    AnsweredOption, AnsweredQuestion, AnsweredRound, RawAnswer, RawQuestion, RoundSubmission,
};
pub use registry::{QuestionRef, Registry};
