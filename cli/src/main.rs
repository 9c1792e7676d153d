//! CLI entrypoint for quizsolver
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use quizsolver_application::{
    NoProgress, ProgressNotifier, QuizOracle, QuizSolver, RunQuizInput, RunQuizUseCase,
    SolveQuizError,
};
use quizsolver_domain::{ConfigIssue, OutputFormat};
use quizsolver_infrastructure::{ConfigLoader, FileConfig, JsonlEpochLogger, SyntheticQuiz};
use quizsolver_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line flags take precedence over every configuration source
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(strategy) = cli.strategy {
        config.solver.preferred_strategy = Some(strategy.as_str().to_string());
    }
    if let Some(target) = cli.target {
        config.solver.targeted_score = target;
    }
    if let Some(max_epochs) = cli.max_epochs {
        config.solver.max_epochs = max_epochs;
    }
    if let Some(window) = cli.window_override {
        config.solver.moving_average_window_size_override = Some(window);
    }
    if let Some(rounds) = cli.beta_rounds {
        config.solver.measurement_rounds_of_beta_strategies = rounds;
    }
    if let Some(seed) = cli.seed {
        config.solver.seed = Some(seed);
        config.generator.seed = Some(seed);
    }
    if let Some(questions) = cli.questions {
        config.generator.questions_count = questions;
    }
    if let Some(min_answers) = cli.min_answers {
        config.generator.min_answers = min_answers;
    }
    if let Some(max_answers) = cli.max_answers {
        config.generator.max_answers = max_answers;
    }
    if let Some(fraction) = cli.round_fraction {
        config.generator.round_fraction = fraction;
    }
    if let Some(path) = &cli.log_file {
        config.logging.epoch_log = Some(path.clone());
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
    if cli.quiet {
        config.output.show_progress = false;
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Failed to load configuration: {e}"))
}

fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        if issue.is_error() {
            error!("{}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = load_config(&cli)?;
    apply_cli_overrides(&cli, &mut config);
    report_issues(&config.validate())?;

    if !config.output.color {
        ConsoleFormatter::disable_color();
    }
    let format = config.output.format.unwrap_or_default();

    info!("Starting quizsolver");

    // === Dependency Injection ===
    let quiz = SyntheticQuiz::generate(&config.generator.to_settings())?;
    let input = RunQuizInput::from_fraction(quiz.question_count(), config.generator.round_fraction);
    let mut use_case = RunQuizUseCase::new(quiz);

    if let Some(path) = &config.logging.epoch_log {
        match JsonlEpochLogger::new(path) {
            Some(logger) => {
                info!("Writing epoch log to {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger));
            }
            None => warn!("Epoch log disabled, {} could not be created", path.display()),
        }
    }

    let mut solver = QuizSolver::new(config.solver.to_solver_config());
    let redraw = solver.config().redraw_interval();

    let progress: Box<dyn ProgressNotifier> =
        if !config.output.show_progress || format == OutputFormat::Json {
            Box::new(NoProgress)
        } else if std::io::stdout().is_terminal() {
            Box::new(ProgressReporter::new(redraw))
        } else {
            Box::new(SimpleProgress::new(redraw))
        };

    let output = match use_case.execute_with_progress(&mut solver, input, progress.as_ref()) {
        Ok(output) => output,
        Err(e @ SolveQuizError::Solver(_)) if e.is_internal() => {
            bail!("Solver state became inconsistent, aborting: {e}")
        }
        Err(e) => return Err(e.into()),
    };

    let text = match format {
        OutputFormat::Full => ConsoleFormatter::format(&output),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };

    println!("{}", text);

    Ok(())
}
