//! Run Quiz use case.
//!
//! Drives a [`QuizSolver`] against a [`QuizOracle`] until the solver reports
//! that the run is finished.
//!
//! Each iteration:
//! 1. Draw a round from the oracle
//! 2. Answer it with the solver
//! 3. Have the oracle score the answered round
//! 4. Feed the score back and notify progress / the epoch log

use crate::ports::epoch_logger::{EpochEvent, EpochLogger, NoEpochLogger};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::quiz_oracle::{OracleError, QuizOracle};
use crate::solver::{FeedbackResult, QuizSolver, SolverSnapshot};
use quizsolver_domain::DomainError;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while solving a quiz.
#[derive(Error, Debug)]
pub enum SolveQuizError {
    #[error("Solver error: {0}")]
    Solver(#[from] DomainError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Oracle returned an empty round")]
    EmptyRound,
}

impl SolveQuizError {
    /// Whether the run failed because the solver's state became inconsistent
    pub fn is_internal(&self) -> bool {
        matches!(self, SolveQuizError::Solver(e) if e.is_internal())
    }
}

/// Input for the [`RunQuizUseCase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunQuizInput {
    /// Questions drawn per round.
    pub round_size: usize,
}

impl RunQuizInput {
    pub fn new(round_size: usize) -> Self {
        Self { round_size }
    }

    /// Round size as a fraction of the quiz, at least one question
    pub fn from_fraction(question_count: usize, fraction: f64) -> Self {
        let size = (question_count as f64 * fraction) as usize;
        Self::new(size.clamp(1, question_count.max(1)))
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunQuizOutput {
    pub result: FeedbackResult,
    pub snapshot: SolverSnapshot,
}

/// Use case for solving a quiz round by round.
pub struct RunQuizUseCase<O: QuizOracle> {
    oracle: O,
    logger: Arc<dyn EpochLogger>,
}

impl<O: QuizOracle> RunQuizUseCase<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            logger: Arc::new(NoEpochLogger),
        }
    }

    /// Create with an epoch logger.
    pub fn with_logger(mut self, logger: Arc<dyn EpochLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Run until finished without progress reporting.
    pub fn execute(
        &mut self,
        solver: &mut QuizSolver,
        input: RunQuizInput,
    ) -> Result<RunQuizOutput, SolveQuizError> {
        self.execute_with_progress(solver, input, &NoProgress)
    }

    /// Run until finished, reporting each round to `progress`.
    pub fn execute_with_progress(
        &mut self,
        solver: &mut QuizSolver,
        input: RunQuizInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunQuizOutput, SolveQuizError> {
        info!(
            "Starting quiz run: {} questions, {} per round",
            self.oracle.question_count(),
            input.round_size
        );
        progress.on_start(self.oracle.question_count());
        let max_score = self.oracle.max_score();

        loop {
            let submission = self.oracle.next_round(input.round_size)?;
            if submission.questions.is_empty() {
                return Err(SolveQuizError::EmptyRound);
            }

            let answered = solver.answer(&submission)?;
            progress.on_round_answered(solver.epoch(), answered.questions.len());
            debug!(
                "Round {} answered ({} questions)",
                solver.epoch() + 1,
                answered.questions.len()
            );

            let score = self.oracle.score(&answered)?;
            let result = solver.feedback(score, max_score)?;

            progress.on_feedback(&result, solver);
            self.logger.log(EpochEvent::new(
                "feedback",
                json!({
                    "result": result,
                    "questions": answered.questions.len(),
                    "solved": solver.registry().solved_count(),
                    "registered": solver.registry().len(),
                }),
            ));

            if result.finished {
                info!(
                    "Quiz run finished after {} epochs (score {:.5}, solved {}/{})",
                    result.epoch,
                    result.score,
                    solver.registry().solved_count(),
                    solver.registry().len()
                );
                let snapshot = solver.snapshot();
                self.logger.log(EpochEvent::new(
                    "finished",
                    json!({
                        "result": result,
                        "statistics": snapshot.statistics,
                    }),
                ));
                progress.on_finish(&result, solver);
                return Ok(RunQuizOutput { result, snapshot });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_size_from_fraction() {
        assert_eq!(RunQuizInput::from_fraction(100, 0.9).round_size, 90);
        assert_eq!(RunQuizInput::from_fraction(3, 0.1).round_size, 1);
        assert_eq!(RunQuizInput::from_fraction(10, 2.0).round_size, 10);
    }

    #[test]
    fn test_internal_errors_are_detected() {
        let error = SolveQuizError::from(DomainError::AllEliminated("ab".to_string()));
        assert!(error.is_internal());
        assert!(!SolveQuizError::EmptyRound.is_internal());
    }
}
