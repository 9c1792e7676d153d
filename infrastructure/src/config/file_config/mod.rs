//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod generator;
mod logging;
mod output;
mod solver;

pub use generator::FileGeneratorConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use solver::FileSolverConfig;

use quizsolver_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Solver behavior and termination
    pub solver: FileSolverConfig,
    /// Synthetic quiz generation
    pub generator: FileGeneratorConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Epoch log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. The preferred strategy name
    /// 2. Solver value ranges
    /// 3. Generator value ranges and answer-count constraints
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.solver.parse_strategy().1);
        issues.extend(self.solver.check_ranges());
        issues.extend(self.generator.check());

        issues
    }
}
