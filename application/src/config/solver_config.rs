//! Solver configuration: engine behavior and termination.
//!
//! [`SolverConfig`] is the immutable configuration a
//! [`QuizSolver`](crate::solver::QuizSolver) is built with. Every field has
//! a default; file and CLI layers override individual fields through the
//! builder methods.

use quizsolver_domain::StrategyKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Score factor at which a run counts as finished.
    pub targeted_score: f64,
    /// Number of completed rounds after which a run stops.
    pub max_epochs: u64,
    /// Always use this answering strategy instead of choosing adaptively.
    pub preferred_strategy: Option<StrategyKind>,
    /// Fixed Alpha moving-average window instead of the dynamic one.
    pub moving_average_window_size_override: Option<usize>,
    /// Branch-window cycles per Beta measurement.
    pub measurement_rounds_of_beta_strategies: usize,
    /// Questions trained per Beta measurement.
    pub beta_minibatch_size: usize,
    /// Seed for the solver's random source; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Seconds between statistics redraws; negative disables redrawing.
    pub redraw_console_interval: f64,
    /// Seconds between plot renders; negative disables. Plots are not rendered.
    pub render_plots_interval: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            targeted_score: 0.95,
            max_epochs: 10_000_000,
            preferred_strategy: None,
            moving_average_window_size_override: None,
            measurement_rounds_of_beta_strategies: 1,
            beta_minibatch_size: 1,
            seed: None,
            redraw_console_interval: 0.25,
            render_plots_interval: -1.0,
        }
    }
}

impl SolverConfig {
    /// Redraw interval, or `None` when redrawing is disabled or the interval
    /// is not representable
    pub fn redraw_interval(&self) -> Option<Duration> {
        if self.redraw_console_interval < 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(self.redraw_console_interval).ok()
    }

    // ==================== Builder Methods ====================

    pub fn with_targeted_score(mut self, score: f64) -> Self {
        self.targeted_score = score;
        self
    }

    pub fn with_max_epochs(mut self, max: u64) -> Self {
        self.max_epochs = max;
        self
    }

    pub fn with_preferred_strategy(mut self, strategy: Option<StrategyKind>) -> Self {
        self.preferred_strategy = strategy;
        self
    }

    pub fn with_window_override(mut self, window: Option<usize>) -> Self {
        self.moving_average_window_size_override = window;
        self
    }

    pub fn with_beta_measurement_rounds(mut self, rounds: usize) -> Self {
        self.measurement_rounds_of_beta_strategies = rounds;
        self
    }

    pub fn with_beta_minibatch_size(mut self, size: usize) -> Self {
        self.beta_minibatch_size = size;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_redraw_console_interval(mut self, seconds: f64) -> Self {
        self.redraw_console_interval = seconds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = SolverConfig::default();
        assert_eq!(config.targeted_score, 0.95);
        assert_eq!(config.max_epochs, 10_000_000);
        assert!(config.preferred_strategy.is_none());
        assert!(config.moving_average_window_size_override.is_none());
        assert_eq!(config.measurement_rounds_of_beta_strategies, 1);
        assert_eq!(config.beta_minibatch_size, 1);
        assert_eq!(config.render_plots_interval, -1.0);
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::default()
            .with_targeted_score(1.0)
            .with_max_epochs(500)
            .with_preferred_strategy(Some(StrategyKind::NegativeBeta))
            .with_seed(Some(7));

        assert_eq!(config.targeted_score, 1.0);
        assert_eq!(config.max_epochs, 500);
        assert_eq!(config.preferred_strategy, Some(StrategyKind::NegativeBeta));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_redraw_interval() {
        assert_eq!(
            SolverConfig::default().redraw_interval(),
            Some(Duration::from_millis(250))
        );
        assert!(
            SolverConfig::default()
                .with_redraw_console_interval(-1.0)
                .redraw_interval()
                .is_none()
        );
    }

    #[test]
    fn test_redraw_interval_out_of_range_disables_redraw() {
        for seconds in [f64::INFINITY, f64::NAN, 1e300] {
            assert!(
                SolverConfig::default()
                    .with_redraw_console_interval(seconds)
                    .redraw_interval()
                    .is_none(),
                "{seconds} should not produce an interval"
            );
        }
    }
}
