//! Output formatter trait

use quizsolver_application::RunQuizOutput;

/// Trait for formatting the outcome of a solving run
pub trait OutputFormatter {
    /// Format the complete report
    fn format(&self, output: &RunQuizOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &RunQuizOutput) -> String;

    /// Format the final result only (concise output)
    fn format_summary(&self, output: &RunQuizOutput) -> String;
}
