//! Console output formatter for solving runs

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use quizsolver_application::{FeedbackResult, RunQuizOutput, SolverSnapshot};
use quizsolver_domain::{ReportDetails, StrategyReport};

/// Width of the score bar in columns
pub const SCORE_BAR_WIDTH: usize = 50;

/// Formats solver statistics and results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn off ANSI colors for every later formatting call
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Format the complete report
    pub fn format(output: &RunQuizOutput) -> String {
        let mut text = String::new();

        text.push_str(&Self::header("Quiz Solver Results"));
        text.push('\n');
        text.push_str(&Self::format_statistics(&output.snapshot));
        text.push_str(&Self::section_header("Result"));
        text.push_str(&Self::result_lines(&output.result));

        text.push_str(&Self::section_header("Strategies"));
        for report in &output.snapshot.strategies {
            text.push_str(&format!("  {}\n", Self::report_line(report)));
        }

        text.push_str(&Self::footer());
        text
    }

    /// Render the live statistics block
    pub fn format_statistics(snapshot: &SolverSnapshot) -> String {
        let stats = &snapshot.statistics;
        let mut text = String::new();

        text.push_str(&format!(
            "{} {}   {} {:.2}s\n",
            "Epoch:".cyan().bold(),
            stats.epochs,
            "Elapsed:".cyan().bold(),
            stats.elapsed_seconds()
        ));
        text.push_str(&format!(
            "{} {} registered, {} answers, {} solved ({:.1}%)\n",
            "Questions:".cyan().bold(),
            stats.questions_total,
            stats.answers_total,
            stats.questions_solved,
            snapshot.progress * 100.0
        ));
        text.push_str(&format!(
            "{} {:.1} questions, {:.1} answers\n",
            "Per round:".cyan().bold(),
            stats.questions_per_round,
            stats.answers_per_round
        ));

        let latest = snapshot.latest.as_ref().map(|r| r.score);
        text.push_str(&format!(
            "{} {} [{}]\n",
            "Score:".cyan().bold(),
            Self::optional_score(latest),
            Self::score_bar(latest.unwrap_or(0.0))
        ));
        text.push_str(&format!(
            "{} {} (epoch {})   {} {} (epoch {})\n",
            "Min:".dimmed(),
            Self::optional_score(stats.min_score),
            Self::optional_epoch(stats.min_score_epoch),
            "Max:".dimmed(),
            Self::optional_score(stats.max_score),
            Self::optional_epoch(stats.max_score_epoch)
        ));

        let solved = match &snapshot.latest {
            Some(result) if result.all_questions_solved => "all questions solved".green(),
            _ => "unsolved questions remain".yellow(),
        };
        text.push_str(&format!("{} {}\n", "State:".cyan().bold(), solved));

        text.push_str(&format!(
            "{} {}   {} {}\n",
            "Winner triggers:".cyan().bold(),
            Self::triggers(&snapshot.winner),
            "Loser triggers:".cyan().bold(),
            Self::triggers(&snapshot.loser)
        ));

        match snapshot.active_report() {
            Some(report) => text.push_str(&format!(
                "{} {}\n",
                "Active:".cyan().bold(),
                Self::report_line(report)
            )),
            None => text.push_str(&format!(
                "{} {}\n",
                "Active:".cyan().bold(),
                snapshot.active_strategy
            )),
        }

        text
    }

    /// Format as JSON
    pub fn format_json(output: &RunQuizOutput) -> String {
        let value = serde_json::json!({
            "result": output.result,
            "statistics": output.snapshot.statistics,
            "progress": output.snapshot.progress,
            "winner": output.snapshot.winner,
            "loser": output.snapshot.loser,
            "strategies": output.snapshot.strategies,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final result only (concise output)
    pub fn format_summary(output: &RunQuizOutput) -> String {
        let mut text = String::new();
        text.push_str(&format!("{}\n\n", "=== Quiz Solver Result ===".cyan().bold()));
        text.push_str(&Self::result_lines(&output.result));
        text.push_str(&format!(
            "{} {}/{} questions solved in {:.2}s\n",
            "Solved:".bold(),
            output.snapshot.statistics.questions_solved,
            output.snapshot.statistics.questions_total,
            output.snapshot.statistics.elapsed_seconds()
        ));
        text
    }

    /// A `SCORE_BAR_WIDTH` column bar filled in proportion to `factor`
    pub fn score_bar(factor: f64) -> String {
        let filled = (factor.clamp(0.0, 1.0) * SCORE_BAR_WIDTH as f64).round() as usize;
        format!(
            "{}{}",
            "#".repeat(filled),
            "-".repeat(SCORE_BAR_WIDTH - filled)
        )
    }

    /// One-line description of a strategy report
    pub fn report_line(report: &StrategyReport) -> String {
        let details = match &report.details {
            ReportDetails::Resolver {
                triggers,
                questions_solved,
                hypotheses_closed,
            } => format!(
                "triggers {triggers}, solved {questions_solved}, closed {hypotheses_closed}"
            ),
            ReportDetails::Alpha {
                reinforcements,
                penalties,
                resamples,
                average_mean,
                window_size,
            } => format!(
                "+{reinforcements} / -{penalties}, resamples {resamples}, mean {}, window {}",
                Self::optional_score(*average_mean),
                Self::optional_epoch(window_size.map(|w| w as u64))
            ),
            ReportDetails::Beta {
                finished_measurements,
                branch_swaps,
                resamples,
                threshold_mean,
                threshold_window,
                training_batch,
            } => format!(
                "measurements {finished_measurements}, swaps {branch_swaps}, resamples {resamples}, \
                 threshold {}, window {}, batch {training_batch}",
                Self::optional_score(*threshold_mean),
                Self::optional_epoch(threshold_window.map(|w| w as u64))
            ),
        };
        format!(
            "{} ({} epochs): {}",
            report.name.yellow().bold(),
            report.feedback_epochs,
            details
        )
    }

    fn result_lines(result: &FeedbackResult) -> String {
        let flag = |set: bool| if set { "yes".green() } else { "no".normal() };
        format!(
            "{} {}\n{} {:.5}\n{} {}\n{} {}\n{} {}\n{} {}\n",
            "Epoch:".bold(),
            result.epoch,
            "Score:".bold(),
            result.score,
            "Strategy:".bold(),
            result.strategy_in_use,
            "Target reached:".bold(),
            flag(result.targeted_score_reached),
            "All solved:".bold(),
            flag(result.all_questions_solved),
            "Max epochs reached:".bold(),
            flag(result.max_epochs_reached)
        )
    }

    fn triggers(report: &StrategyReport) -> u64 {
        match report.details {
            ReportDetails::Resolver { triggers, .. } => triggers,
            _ => 0,
        }
    }

    fn optional_score(score: Option<f64>) -> String {
        score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.5}"))
    }

    fn optional_epoch(epoch: Option<u64>) -> String {
        epoch.map_or_else(|| "n/a".to_string(), |e| e.to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &RunQuizOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &RunQuizOutput) -> String {
        Self::format_json(output)
    }

    fn format_summary(&self, output: &RunQuizOutput) -> String {
        Self::format_summary(output)
    }
}
