//! Progress reporting for solving runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use quizsolver_application::ports::progress::ProgressNotifier;
use quizsolver_application::{FeedbackResult, QuizSolver};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Lets an action through at most once per interval
struct Throttle {
    interval: Option<Duration>,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Whether the action may run now; `None` intervals never allow it
    fn ready(&self) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        let Ok(mut last) = self.last.lock() else {
            return false;
        };
        let now = Instant::now();
        match *last {
            Some(previous) if now.duration_since(previous) < interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

/// Reports progress with a solved-questions bar and a statistics panel
pub struct ProgressReporter {
    multi: MultiProgress,
    solved_bar: Mutex<Option<ProgressBar>>,
    stats_panel: Mutex<Option<ProgressBar>>,
    redraw: Throttle,
}

impl ProgressReporter {
    /// `redraw_interval` of `None` disables the statistics panel
    pub fn new(redraw_interval: Option<Duration>) -> Self {
        Self {
            multi: MultiProgress::new(),
            solved_bar: Mutex::new(None),
            stats_panel: Mutex::new(None),
            redraw: Throttle::new(redraw_interval),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn panel_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_start(&self, question_count: usize) {
        let bar = self.multi.add(ProgressBar::new(question_count as u64));
        bar.set_style(Self::bar_style());
        bar.set_prefix("Solved");
        bar.set_message("Starting...");
        if let Ok(mut slot) = self.solved_bar.lock() {
            *slot = Some(bar);
        }

        if self.redraw.interval.is_some() {
            let panel = self.multi.add(ProgressBar::new_spinner());
            panel.set_style(Self::panel_style());
            if let Ok(mut slot) = self.stats_panel.lock() {
                *slot = Some(panel);
            }
        }
    }

    fn on_feedback(&self, result: &FeedbackResult, solver: &QuizSolver) {
        if let Ok(slot) = self.solved_bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            bar.set_length(solver.registry().len().max(1) as u64);
            bar.set_position(solver.registry().solved_count() as u64);
            bar.set_message(format!(
                "epoch {} score {:.5} ({})",
                result.epoch, result.score, result.strategy_in_use
            ));
        }

        if self.redraw.ready()
            && let Ok(slot) = self.stats_panel.lock()
            && let Some(panel) = slot.as_ref()
        {
            panel.set_message(ConsoleFormatter::format_statistics(&solver.snapshot()));
        }
    }

    fn on_finish(&self, result: &FeedbackResult, solver: &QuizSolver) {
        if let Ok(mut slot) = self.stats_panel.lock()
            && let Some(panel) = slot.take()
        {
            panel.finish_and_clear();
        }
        if let Ok(mut slot) = self.solved_bar.lock()
            && let Some(bar) = slot.take()
        {
            bar.set_position(solver.registry().solved_count() as u64);
            bar.finish_with_message(format!("finished after {} epochs", result.epoch).green().to_string());
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    redraw: Throttle,
}

impl SimpleProgress {
    pub fn new(redraw_interval: Option<Duration>) -> Self {
        Self {
            redraw: Throttle::new(redraw_interval),
        }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_start(&self, question_count: usize) {
        println!("{} solving {} questions", "->".cyan(), question_count);
    }

    fn on_feedback(&self, result: &FeedbackResult, solver: &QuizSolver) {
        if self.redraw.ready() {
            println!(
                "  epoch {:>8}  score {:.5}  solved {}/{}  {}",
                result.epoch,
                result.score,
                solver.registry().solved_count(),
                solver.registry().len(),
                result.strategy_in_use
            );
        }
    }

    fn on_finish(&self, result: &FeedbackResult, _solver: &QuizSolver) {
        println!("  {} finished after {} epochs", "v".green(), result.epoch);
    }
}
