//! Feedback results and solver snapshots

use super::statistics::SolverStatistics;
use quizsolver_domain::{StrategyKind, StrategyReport};
use serde::{Deserialize, Serialize};

/// Outcome of processing one round's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    /// 1-based count of completed rounds
    pub epoch: u64,
    /// Strategy that answered the scored round
    pub strategy_in_use: StrategyKind,
    pub score: f64,
    pub max_epochs_reached: bool,
    pub targeted_score_reached: bool,
    pub all_questions_solved: bool,
    pub finished: bool,
}

/// Everything needed to render the solver's state
#[derive(Debug, Clone, Serialize)]
pub struct SolverSnapshot {
    pub statistics: SolverStatistics,
    pub latest: Option<FeedbackResult>,
    pub active_strategy: StrategyKind,
    /// Fraction of registered questions solved
    pub progress: f64,
    pub winner: StrategyReport,
    pub loser: StrategyReport,
    /// Reports of all answering strategies, in [`StrategyKind::ALL`] order
    pub strategies: Vec<StrategyReport>,
}

impl SolverSnapshot {
    /// Report of the strategy that answers the next round
    pub fn active_report(&self) -> Option<&StrategyReport> {
        self.strategies
            .iter()
            .find(|r| r.name == self.active_strategy.as_str())
    }
}
