//! Domain error types

use crate::quiz::question_type::QuestionType;
use thiserror::Error;

/// Domain-level errors
///
/// Variants fall into two classes. Validation errors describe bad input
/// (malformed questions, malformed feedback, out-of-bounds windows) and leave
/// the solver untouched. Internal errors mean the inference state contradicts
/// itself; a run that hits one must be aborted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Question has no answers")]
    NoOptions,

    #[error("Question has {count} answers, at most {max} are supported")]
    TooManyOptions { count: usize, max: usize },

    #[error("Question of type {kind} has {count} answers, at most {max} are supported")]
    TooManyOptionsForType {
        kind: QuestionType,
        count: usize,
        max: usize,
    },

    #[error("Duplicate answer in question: '{0}'")]
    DuplicateOption(String),

    #[error("Unknown question type '{0}'. Valid types: chooseOne, chooseOneOrMore, chooseZeroOrMore")]
    UnknownQuestionType(String),

    #[error("Unknown strategy '{0}'. Valid strategies: Alpha, NegativeAlpha, Beta, NegativeBeta")]
    UnknownStrategy(String),

    #[error("No answered round is waiting for feedback")]
    NoPendingRound,

    #[error("Score and max score must be finite (got {score} / {max_score})")]
    NonFiniteScore { score: f64, max_score: f64 },

    #[error("Score must not be negative (got {0})")]
    NegativeScore(f64),

    #[error("Max score must be positive (got {0})")]
    NonPositiveMaxScore(f64),

    #[error("Score {score} exceeds max score {max_score}")]
    ScoreExceedsMax { score: f64, max_score: f64 },

    #[error("Window size {requested} is out of bounds (1..={capacity})")]
    WindowOutOfBounds { requested: usize, capacity: usize },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("{strategy}: cannot resample question {question}, only {unknown} unknown hypotheses left")]
    ResampleExhausted {
        strategy: &'static str,
        question: String,
        unknown: usize,
    },

    #[error("Question {0} already has a correct hypothesis but is not solved")]
    AlreadyResolved(String),

    #[error("Every hypothesis of question {0} has been ruled out")]
    AllEliminated(String),

    #[error("Question {0} scored perfectly with a hypothesis already ruled out")]
    ContradictoryResolution(String),
}

impl DomainError {
    /// Check if this error means the inference state is inconsistent
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::ResampleExhausted { .. }
                | DomainError::AlreadyResolved(_)
                | DomainError::AllEliminated(_)
                | DomainError::ContradictoryResolution(_)
        )
    }
}
