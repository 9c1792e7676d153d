//! Domain layer for quizsolver
//!
//! This crate contains the inference engine's entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Questions and hypotheses
//!
//! A [`Question`] is identified by the digest of its content and expands into
//! every [`Hypothesis`] its [`QuestionType`] admits. Hypotheses start
//! unknown and only ever narrow to true or false.
//!
//! ## Strategies
//!
//! The only signal available is the aggregate score of a round. The
//! [`WinnerStrategy`] and [`LoserStrategy`] exploit perfect and zero rounds;
//! the answering strategies ([`AlphaStrategy`], [`BetaStrategy`]) learn from
//! how a round's score compares with a [`MovingAverage`] of earlier ones.

pub mod config;
pub mod core;
pub mod moving_average;
pub mod quiz;
pub mod strategy;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{content_id::ContentId, error::DomainError};
pub use moving_average::MovingAverage;
pub use quiz::{
    AnswerOption, AnsweredOption, AnsweredQuestion, AnsweredRound, Correctness, Hypothesis,
    Question, QuestionRef, QuestionType, RawAnswer, RawQuestion, Registry, RoundSubmission,
};
pub use strategy::{
    EPSILON, FeedbackStrategy, Polarity, ReportDetails, RoundContext, RoundEntry, ScoreFeedback,
    Strategy, StrategyKind, StrategyReport, alpha::AlphaStrategy, beta::BetaStrategy,
    dynamic_window_size, loser::LoserStrategy, winner::WinnerStrategy,
};
