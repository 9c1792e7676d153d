//! CLI command definitions

use clap::{Parser, ValueEnum};
use quizsolver_domain::StrategyKind;
use std::path::PathBuf;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full statistics with every strategy report
    Full,
    /// Only the final result
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for quizsolver_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

fn parse_strategy(value: &str) -> Result<StrategyKind, String> {
    value.parse::<StrategyKind>().map_err(|e| e.to_string())
}

/// CLI arguments for quizsolver
#[derive(Parser, Debug)]
#[command(name = "quizsolver")]
#[command(author, version, about = "Infer a quiz's answer key from aggregate round scores")]
#[command(long_about = r#"
quizsolver answers rounds of a generated quiz and learns the correct answers
from nothing but each round's total score.

Perfect rounds prove every exposed answer, zero rounds rule them out, and in
between the Alpha and Beta strategies compare scores against moving averages.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. QUIZSOLVER_<SECTION>__<KEY> environment variables
3. ./quizsolver.toml        Project-level config
4. ~/.config/quizsolver/config.toml   Global config

Example:
  quizsolver --questions 500 --seed 7
  quizsolver --strategy beta --target 1.0 -o json
"#)]
pub struct Cli {
    /// Always answer with this strategy (Alpha, NegativeAlpha, Beta, NegativeBeta)
    #[arg(long, value_name = "NAME", value_parser = parse_strategy)]
    pub strategy: Option<StrategyKind>,

    /// Score factor at which the run stops
    #[arg(long, value_name = "FACTOR")]
    pub target: Option<f64>,

    /// Maximum number of rounds
    #[arg(long, value_name = "N")]
    pub max_epochs: Option<u64>,

    /// Number of questions in the generated quiz
    #[arg(long, value_name = "N")]
    pub questions: Option<usize>,

    /// Minimum answers per generated question
    #[arg(long, value_name = "N")]
    pub min_answers: Option<usize>,

    /// Maximum answers per generated question
    #[arg(long, value_name = "N")]
    pub max_answers: Option<usize>,

    /// Share of the quiz asked per round
    #[arg(long, value_name = "FRACTION")]
    pub round_fraction: Option<f64>,

    /// Seed for quiz generation and the solver
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Fixed moving-average window for the Alpha strategies
    #[arg(long, value_name = "N")]
    pub window_override: Option<usize>,

    /// Branch-window cycles per Beta measurement
    #[arg(long, value_name = "N")]
    pub beta_rounds: Option<usize>,

    /// Write one JSON line per scored round to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "quizsolver",
            "--strategy",
            "negative-beta",
            "--target",
            "1.0",
            "--questions",
            "50",
            "--seed",
            "3",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.strategy, Some(StrategyKind::NegativeBeta));
        assert_eq!(cli.target, Some(1.0));
        assert_eq!(cli.questions, Some(50));
        assert_eq!(cli.seed, Some(3));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(cli.max_epochs.is_none());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        assert!(Cli::try_parse_from(["quizsolver", "--strategy", "gamma"]).is_err());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            quizsolver_domain::OutputFormat::from(OutputFormat::Summary),
            quizsolver_domain::OutputFormat::Summary
        );
    }
}
