//! Application layer for quizsolver
//!
//! This crate contains the solver orchestrator, use cases, port definitions,
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod solver;
pub mod use_cases;

// Re-export commonly used types
pub use config::SolverConfig;
pub use ports::{
    epoch_logger::{EpochEvent, EpochLogger, NoEpochLogger},
    progress::{NoProgress, ProgressNotifier},
    quiz_oracle::{OracleError, QuizOracle},
};
pub use solver::{FeedbackResult, QuizSolver, SolverSnapshot, SolverStatistics};
pub use use_cases::run_quiz::{RunQuizInput, RunQuizOutput, RunQuizUseCase, SolveQuizError};
