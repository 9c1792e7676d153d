//! Running statistics of a solving run

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Completed rounds
    pub epochs: u64,
    pub min_score: Option<f64>,
    pub min_score_epoch: Option<u64>,
    pub max_score: Option<f64>,
    pub max_score_epoch: Option<u64>,
    pub questions_total: usize,
    pub answers_total: usize,
    pub questions_solved: usize,
    pub questions_sum: u64,
    pub answers_sum: u64,
    pub questions_per_round: f64,
    pub answers_per_round: f64,
}

impl SolverStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            epochs: 0,
            min_score: None,
            min_score_epoch: None,
            max_score: None,
            max_score_epoch: None,
            questions_total: 0,
            answers_total: 0,
            questions_solved: 0,
            questions_sum: 0,
            answers_sum: 0,
            questions_per_round: 0.0,
            answers_per_round: 0.0,
        }
    }

    /// Account for a scored round; `epoch` is the 1-based round number
    pub fn record_round(&mut self, epoch: u64, score: f64, questions: usize, answers: usize) {
        self.epochs = epoch;
        if self.min_score.is_none_or(|min| score < min) {
            self.min_score = Some(score);
            self.min_score_epoch = Some(epoch);
        }
        if self.max_score.is_none_or(|max| score > max) {
            self.max_score = Some(score);
            self.max_score_epoch = Some(epoch);
        }
        self.questions_sum += questions as u64;
        self.answers_sum += answers as u64;
        self.questions_per_round = self.questions_sum as f64 / epoch as f64;
        self.answers_per_round = self.answers_sum as f64 / epoch as f64;
    }

    pub fn record_registry(&mut self, questions_total: usize, answers_total: usize, solved: usize) {
        self.questions_total = questions_total;
        self.answers_total = answers_total;
        self.questions_solved = solved;
    }

    pub fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish (or now, while running)
    pub fn elapsed_seconds(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

impl Default for SolverStatistics {
    fn default() -> Self {
        Self::new()
    }
}
