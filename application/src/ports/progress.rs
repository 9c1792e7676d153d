//! Progress notification port
//!
//! Defines the interface for reporting progress while a quiz is solved.

use crate::solver::{FeedbackResult, QuizSolver};

/// Callback for progress updates during a solving run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first round
    fn on_start(&self, _question_count: usize) {}

    /// Called after a round has been answered, before it is scored
    fn on_round_answered(&self, _epoch: u64, _questions: usize) {}

    /// Called after the solver processed a round's score
    fn on_feedback(&self, result: &FeedbackResult, solver: &QuizSolver);

    /// Called once when the run finished
    fn on_finish(&self, _result: &FeedbackResult, _solver: &QuizSolver) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_feedback(&self, _result: &FeedbackResult, _solver: &QuizSolver) {}
}
