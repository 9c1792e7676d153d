//! Inference strategies
//!
//! Two resolvers run after every scored round:
//!
//! - [`winner::WinnerStrategy`]: a perfect round proves every exposed hypothesis
//! - [`loser::LoserStrategy`]: a zero round disproves every exposed hypothesis
//!
//! Exactly one answering [`Strategy`] picks the hypotheses exposed in a round
//! and learns from the round's aggregate score:
//!
//! - [`alpha::AlphaStrategy`]: one guess per question with a confidence counter
//! - [`beta::BetaStrategy`]: two competing guesses measured against each other
//!
//! Both answering strategies come in a positive and a negative [`Polarity`].

pub mod alpha;
pub mod beta;
pub mod loser;
mod sampling;
pub mod state;
pub mod winner;

use crate::core::error::DomainError;
use crate::moving_average::DEFAULT_CAPACITY;
use crate::quiz::{Question, QuestionRef, Registry};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use sampling::inverse_square_likelihood;
pub use state::{Branches, Guess, Polarity, StrategyState};

/// Tolerance for score comparisons
pub const EPSILON: f64 = 1e-7;

/// Coverage fraction the dynamic window aims for
const WINDOW_COVERAGE: f64 = 0.69;

/// The selectable answering strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Alpha,
    NegativeAlpha,
    Beta,
    NegativeBeta,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Alpha,
        StrategyKind::NegativeAlpha,
        StrategyKind::Beta,
        StrategyKind::NegativeBeta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Alpha => "Alpha",
            StrategyKind::NegativeAlpha => "NegativeAlpha",
            StrategyKind::Beta => "Beta",
            StrategyKind::NegativeBeta => "NegativeBeta",
        }
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            StrategyKind::Alpha | StrategyKind::Beta => Polarity::Positive,
            StrategyKind::NegativeAlpha | StrategyKind::NegativeBeta => Polarity::Negative,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "alpha" => Ok(StrategyKind::Alpha),
            "negativealpha" => Ok(StrategyKind::NegativeAlpha),
            "beta" => Ok(StrategyKind::Beta),
            "negativebeta" => Ok(StrategyKind::NegativeBeta),
            _ => Err(DomainError::UnknownStrategy(s.to_string())),
        }
    }
}

/// A validated `(score, max_score)` pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFeedback {
    score: f64,
    max_score: f64,
}

impl ScoreFeedback {
    pub fn new(score: f64, max_score: f64) -> Result<Self, DomainError> {
        if !score.is_finite() || !max_score.is_finite() {
            return Err(DomainError::NonFiniteScore { score, max_score });
        }
        if score < 0.0 {
            return Err(DomainError::NegativeScore(score));
        }
        if max_score <= 0.0 {
            return Err(DomainError::NonPositiveMaxScore(max_score));
        }
        if max_score < score {
            return Err(DomainError::ScoreExceedsMax { score, max_score });
        }
        Ok(Self { score, max_score })
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// Score normalized to `[0, 1]`
    pub fn factor(&self) -> f64 {
        self.score / self.max_score
    }

    pub fn is_perfect(&self) -> bool {
        self.score >= self.max_score - EPSILON
    }

    pub fn is_zero(&self) -> bool {
        self.score <= EPSILON
    }
}

/// One question of a round and the hypothesis exposed for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEntry {
    pub question: QuestionRef,
    pub exposed: usize,
}

/// Read-only view of the round being scored
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    /// Zero-based index of the round
    pub epoch: u64,
    pub registry_len: usize,
    pub entries: &'a [RoundEntry],
}

impl RoundContext<'_> {
    /// Window size giving the round sample enough coverage of the registry
    pub fn dynamic_window(&self) -> usize {
        dynamic_window_size(self.entries.len(), self.registry_len)
    }

    /// Chance that a blind guess is right, averaged over the round
    pub fn blind_guess_chance(&self, registry: &Registry) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .entries
            .iter()
            .map(|e| 1.0 / registry.get(e.question).hypotheses().len() as f64)
            .sum();
        total / self.entries.len() as f64
    }

    /// Whether the epoch is zero or a power of two
    pub fn is_window_epoch(&self) -> bool {
        self.epoch & self.epoch.wrapping_sub(1) == 0
    }
}

/// Number of rounds of `round_len` questions, drawn from `registry_len`,
/// needed until about 69% of the registry has been covered, plus one.
pub fn dynamic_window_size(round_len: usize, registry_len: usize) -> usize {
    let coverage = if registry_len == 0 {
        0.0
    } else {
        (round_len as f64 / registry_len as f64).min(1.0)
    };
    let mut covered = 0.0;
    let mut remaining = 1.0;
    let mut iterations = 0;
    while covered < WINDOW_COVERAGE && iterations < DEFAULT_CAPACITY {
        let delta = coverage * remaining;
        covered += delta;
        remaining -= delta;
        iterations += 1;
    }
    iterations.max(1) + 1
}

/// What a strategy reports about itself for statistics output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    pub name: &'static str,
    pub feedback_epochs: u64,
    #[serde(flatten)]
    pub details: ReportDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportDetails {
    Resolver {
        triggers: u64,
        questions_solved: u64,
        hypotheses_closed: u64,
    },
    Alpha {
        reinforcements: u64,
        penalties: u64,
        resamples: u64,
        average_mean: Option<f64>,
        window_size: Option<usize>,
    },
    Beta {
        finished_measurements: u64,
        branch_swaps: u64,
        resamples: u64,
        threshold_mean: Option<f64>,
        threshold_window: Option<usize>,
        training_batch: usize,
    },
}

/// A strategy that learns from scored rounds
pub trait FeedbackStrategy {
    fn name(&self) -> &'static str;

    /// Update state from the score of the round described by `round`
    fn process_feedback(
        &mut self,
        feedback: ScoreFeedback,
        round: &RoundContext<'_>,
        registry: &mut Registry,
        rng: &mut StdRng,
    ) -> Result<(), DomainError>;

    fn report(&self) -> StrategyReport;
}

/// A strategy that also chooses the hypothesis exposed for each question
pub trait Strategy: FeedbackStrategy {
    fn kind(&self) -> StrategyKind;

    /// Attach this strategy's record to a newly registered question
    fn initialize_question(&mut self, question: &mut Question, rng: &mut StdRng);

    /// Hypothesis to expose for an unsolved question in the current round
    fn expose(
        &mut self,
        question_ref: QuestionRef,
        question: &mut Question,
        rng: &mut StdRng,
    ) -> Result<usize, DomainError>;
}
