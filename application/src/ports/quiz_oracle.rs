//! Quiz oracle port
//!
//! The oracle is the only source of rounds and scores. It knows the answer
//! key; the solver never sees it.

use quizsolver_domain::{AnsweredRound, RoundSubmission};
use thiserror::Error;

/// Errors raised by a quiz oracle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Round of {requested} questions requested, only {available} available")]
    RoundTooLarge { requested: usize, available: usize },

    #[error("Answered round contains unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question '{question}' was answered with {given} answers, expected {expected}")]
    AnswerCountMismatch {
        question: String,
        given: usize,
        expected: usize,
    },

    #[error("Oracle error: {0}")]
    Other(String),
}

/// Source of quiz rounds and their aggregate scores
pub trait QuizOracle {
    /// Number of distinct questions the oracle can ask
    fn question_count(&self) -> usize;

    /// Draw a round of `size` distinct questions, without the answer key
    fn next_round(&mut self, size: usize) -> Result<RoundSubmission, OracleError>;

    /// Score an answered round; the result lies in `[0, max_score()]`
    fn score(&self, round: &AnsweredRound) -> Result<f64, OracleError>;

    fn max_score(&self) -> f64 {
        1.0
    }
}
