//! Solver configuration from TOML (`[solver]` section)

use quizsolver_application::SolverConfig;
use quizsolver_domain::moving_average::DEFAULT_CAPACITY;
use quizsolver_domain::{ConfigIssue, ConfigIssueCode, Severity, StrategyKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw solver configuration from TOML
///
/// Field names match [`SolverConfig`]; the strategy is kept as a string so
/// that a misspelled name becomes a [`ConfigIssue`] instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSolverConfig {
    pub targeted_score: f64,
    pub max_epochs: u64,
    pub preferred_strategy: Option<String>,
    pub moving_average_window_size_override: Option<usize>,
    pub measurement_rounds_of_beta_strategies: usize,
    pub beta_minibatch_size: usize,
    pub seed: Option<u64>,
    pub redraw_console_interval: f64,
    pub render_plots_interval: f64,
}

impl Default for FileSolverConfig {
    fn default() -> Self {
        let defaults = SolverConfig::default();
        Self {
            targeted_score: defaults.targeted_score,
            max_epochs: defaults.max_epochs,
            preferred_strategy: None,
            moving_average_window_size_override: defaults.moving_average_window_size_override,
            measurement_rounds_of_beta_strategies: defaults.measurement_rounds_of_beta_strategies,
            beta_minibatch_size: defaults.beta_minibatch_size,
            seed: defaults.seed,
            redraw_console_interval: defaults.redraw_console_interval,
            render_plots_interval: defaults.render_plots_interval,
        }
    }
}

impl FileSolverConfig {
    /// Parse `preferred_strategy`, falling back to adaptive selection
    pub fn parse_strategy(&self) -> (Option<StrategyKind>, Vec<ConfigIssue>) {
        let Some(name) = self.preferred_strategy.as_deref() else {
            return (None, vec![]);
        };
        match name.parse::<StrategyKind>() {
            Ok(kind) => (Some(kind), vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "solver.preferred_strategy".to_string(),
                        value: name.to_string(),
                        valid_values: StrategyKind::ALL
                            .iter()
                            .map(|k| k.as_str().to_string())
                            .collect(),
                    },
                    message: format!("solver.preferred_strategy: unknown strategy '{}'", name),
                };
                (None, vec![issue])
            }
        }
    }

    /// Report values outside their accepted ranges
    pub fn check_ranges(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut out_of_range = |field: &str, value: String, expected: &str| {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::OutOfRange {
                    field: format!("solver.{field}"),
                    value: value.clone(),
                },
                message: format!("solver.{field}: {value} is out of range, expected {expected}"),
            });
        };

        if self.targeted_score.is_nan() || self.targeted_score <= 0.0 {
            out_of_range("targeted_score", self.targeted_score.to_string(), "a positive factor");
        }
        if self.max_epochs == 0 {
            out_of_range("max_epochs", "0".to_string(), "at least 1");
        }
        if let Some(window) = self.moving_average_window_size_override
            && !(1..=DEFAULT_CAPACITY).contains(&window)
        {
            out_of_range(
                "moving_average_window_size_override",
                window.to_string(),
                &format!("1..={DEFAULT_CAPACITY}"),
            );
        }
        if self.measurement_rounds_of_beta_strategies == 0 {
            out_of_range("measurement_rounds_of_beta_strategies", "0".to_string(), "at least 1");
        }
        if self.beta_minibatch_size == 0 {
            out_of_range("beta_minibatch_size", "0".to_string(), "at least 1");
        }
        if !self.redraw_console_interval.is_finite()
            || Duration::try_from_secs_f64(self.redraw_console_interval.max(0.0)).is_err()
        {
            out_of_range(
                "redraw_console_interval",
                self.redraw_console_interval.to_string(),
                "a finite number of seconds",
            );
        }

        if self.render_plots_interval >= 0.0 {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::Unused {
                    field: "solver.render_plots_interval".to_string(),
                },
                message: "solver.render_plots_interval is set but plots are not rendered"
                    .to_string(),
            });
        }
        issues
    }

    /// Build the engine configuration; invalid strategy names fall back to
    /// adaptive selection
    pub fn to_solver_config(&self) -> SolverConfig {
        SolverConfig {
            targeted_score: self.targeted_score,
            max_epochs: self.max_epochs,
            preferred_strategy: self.parse_strategy().0,
            moving_average_window_size_override: self.moving_average_window_size_override,
            measurement_rounds_of_beta_strategies: self.measurement_rounds_of_beta_strategies,
            beta_minibatch_size: self.beta_minibatch_size,
            seed: self.seed,
            redraw_console_interval: self.redraw_console_interval,
            render_plots_interval: self.render_plots_interval,
        }
    }
}
