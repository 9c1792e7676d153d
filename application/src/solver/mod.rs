//! The quiz solver
//!
//! [`QuizSolver`] owns the question registry and every strategy. A run
//! alternates two calls:
//!
//! 1. [`QuizSolver::answer`] registers the submitted questions and exposes a
//!    hypothesis for each, using the active answering strategy.
//! 2. [`QuizSolver::feedback`] routes the round's score to the Winner and
//!    Loser resolvers and to the active strategy, then picks the strategy for
//!    the next round.

pub mod result;
pub mod statistics;

pub use result::{FeedbackResult, SolverSnapshot};
pub use statistics::SolverStatistics;

use crate::config::SolverConfig;
use quizsolver_domain::{
    AlphaStrategy, AnsweredQuestion, AnsweredRound, BetaStrategy, DomainError, FeedbackStrategy,
    LoserStrategy, Polarity, Question, QuestionRef, RawQuestion, Registry, RoundContext,
    RoundEntry, RoundSubmission, ScoreFeedback, Strategy, StrategyKind, WinnerStrategy,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Share of the registry a round must cover for the Beta strategies
const BETA_COVERAGE: f64 = 0.9;

pub struct QuizSolver {
    config: SolverConfig,
    registry: Registry,
    winner: WinnerStrategy,
    loser: LoserStrategy,
    /// Answering strategies in [`StrategyKind::ALL`] order
    strategies: Vec<Box<dyn Strategy + Send>>,
    active: StrategyKind,
    epoch: u64,
    round: Vec<RoundEntry>,
    rng: StdRng,
    statistics: SolverStatistics,
    latest: Option<FeedbackResult>,
}

fn slot(kind: StrategyKind) -> usize {
    match kind {
        StrategyKind::Alpha => 0,
        StrategyKind::NegativeAlpha => 1,
        StrategyKind::Beta => 2,
        StrategyKind::NegativeBeta => 3,
    }
}

impl QuizSolver {
    pub fn new(config: SolverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let window = config.moving_average_window_size_override;
        let beta = |polarity| {
            BetaStrategy::new(polarity)
                .with_measurement_rounds(config.measurement_rounds_of_beta_strategies)
                .with_minibatch_size(config.beta_minibatch_size)
        };
        let strategies: Vec<Box<dyn Strategy + Send>> = vec![
            Box::new(AlphaStrategy::new(Polarity::Positive).with_window_override(window)),
            Box::new(AlphaStrategy::new(Polarity::Negative).with_window_override(window)),
            Box::new(beta(Polarity::Positive)),
            Box::new(beta(Polarity::Negative)),
        ];
        let active = config.preferred_strategy.unwrap_or(StrategyKind::Alpha);

        Self {
            config,
            registry: Registry::new(),
            winner: WinnerStrategy::new(),
            loser: LoserStrategy::new(),
            strategies,
            active,
            epoch: 0,
            round: Vec::new(),
            rng,
            statistics: SolverStatistics::new(),
            latest: None,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Zero-based index of the round being answered
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn active_strategy(&self) -> StrategyKind {
        self.active
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    pub fn latest_result(&self) -> Option<&FeedbackResult> {
        self.latest.as_ref()
    }

    /// Whether answered questions are waiting for a score
    pub fn is_pending(&self) -> bool {
        !self.round.is_empty()
    }

    /// Fraction of registered questions that are solved
    pub fn progress(&self) -> f64 {
        if self.registry.is_empty() {
            return 0.0;
        }
        self.registry.solved_count() as f64 / self.registry.len() as f64
    }

    /// Answer every question of a round.
    ///
    /// All questions are validated before any is registered, so a malformed
    /// question leaves the solver untouched.
    pub fn answer(&mut self, submission: &RoundSubmission) -> Result<AnsweredRound, DomainError> {
        let ids = submission
            .questions
            .iter()
            .map(Question::identify)
            .collect::<Result<Vec<_>, _>>()?;

        let mut questions = Vec::with_capacity(ids.len());
        for (raw, id) in submission.questions.iter().zip(ids) {
            let question_ref = match self.registry.lookup(&id) {
                Some(existing) => existing,
                None => self.register(Question::from_raw(raw)?),
            };
            questions.push(self.expose(question_ref)?);
        }
        debug!(
            "Answered {} questions with {} (epoch {})",
            questions.len(),
            self.active,
            self.epoch
        );
        Ok(AnsweredRound { questions })
    }

    /// Answer a single question, adding it to the pending round
    pub fn answer_question(&mut self, raw: &RawQuestion) -> Result<AnsweredQuestion, DomainError> {
        let id = Question::identify(raw)?;
        let question_ref = match self.registry.lookup(&id) {
            Some(existing) => existing,
            None => self.register(Question::from_raw(raw)?),
        };
        self.expose(question_ref)
    }

    fn register(&mut self, mut question: Question) -> QuestionRef {
        for strategy in self.strategies.iter_mut() {
            strategy.initialize_question(&mut question, &mut self.rng);
        }
        let (question_ref, _) = self.registry.insert(question);
        question_ref
    }

    fn expose(&mut self, question_ref: QuestionRef) -> Result<AnsweredQuestion, DomainError> {
        let question = self.registry.get_mut(question_ref);
        let exposed = match question.solution() {
            Some(solution) => solution,
            None => self.strategies[slot(self.active)].expose(question_ref, question, &mut self.rng)?,
        };
        self.round.push(RoundEntry {
            question: question_ref,
            exposed,
        });
        Ok(question.answered(exposed))
    }

    /// Process the score of the pending round.
    ///
    /// Malformed feedback is rejected before anything changes.
    pub fn feedback(&mut self, score: f64, max_score: f64) -> Result<FeedbackResult, DomainError> {
        if self.round.is_empty() {
            return Err(DomainError::NoPendingRound);
        }
        let feedback = ScoreFeedback::new(score, max_score)?;
        let winner_before = self.winner.triggers();
        let loser_before = self.loser.triggers();

        let round = RoundContext {
            epoch: self.epoch,
            registry_len: self.registry.len(),
            entries: &self.round,
        };
        self.winner
            .process_feedback(feedback, &round, &mut self.registry, &mut self.rng)?;
        self.loser
            .process_feedback(feedback, &round, &mut self.registry, &mut self.rng)?;
        self.strategies[slot(self.active)].process_feedback(
            feedback,
            &round,
            &mut self.registry,
            &mut self.rng,
        )?;

        if self.winner.triggers() > winner_before {
            info!("Perfect round at epoch {}: exposed hypotheses proven", self.epoch + 1);
        }
        if self.loser.triggers() > loser_before {
            info!("Zero round at epoch {}: exposed hypotheses ruled out", self.epoch + 1);
        }

        let completed = self.epoch + 1;
        let all_questions_solved = self.registry.all_solved();
        let max_epochs_reached = completed >= self.config.max_epochs;
        let targeted_score_reached = feedback.factor() >= self.config.targeted_score;
        let result = FeedbackResult {
            epoch: completed,
            strategy_in_use: self.active,
            score,
            max_epochs_reached,
            targeted_score_reached,
            all_questions_solved,
            finished: max_epochs_reached || all_questions_solved || targeted_score_reached,
        };

        let answers: usize = self
            .round
            .iter()
            .map(|e| self.registry.get(e.question).options().len())
            .sum();
        self.statistics
            .record_round(completed, score, self.round.len(), answers);
        self.statistics.record_registry(
            self.registry.len(),
            self.registry.answer_count(),
            self.registry.solved_count(),
        );
        if result.finished {
            self.statistics.mark_finished();
        }

        let next = self.select_strategy();
        if next != self.active {
            info!("Switching strategy from {} to {}", self.active, next);
            self.active = next;
        }
        debug!(
            "Epoch {} scored {:.5} ({} of {} questions solved)",
            completed,
            score,
            self.statistics.questions_solved,
            self.statistics.questions_total
        );

        self.epoch = completed;
        self.round.clear();
        self.latest = Some(result.clone());
        Ok(result)
    }

    /// Strategy for the next round, judged on the round just scored
    fn select_strategy(&self) -> StrategyKind {
        if let Some(preferred) = self.config.preferred_strategy {
            return preferred;
        }
        if self.registry.is_empty() || self.registry.all_solved() {
            return StrategyKind::Alpha;
        }
        let coverage = self.round.len() as f64 / self.registry.len() as f64;
        let broad = coverage > BETA_COVERAGE;
        match (self.config.targeted_score >= 1.0, broad) {
            (true, true) => StrategyKind::NegativeBeta,
            (true, false) => StrategyKind::NegativeAlpha,
            (false, true) => StrategyKind::Beta,
            (false, false) => StrategyKind::Alpha,
        }
    }

    /// Statistics plus every strategy's report
    pub fn snapshot(&self) -> SolverSnapshot {
        SolverSnapshot {
            statistics: self.statistics.clone(),
            latest: self.latest.clone(),
            active_strategy: self.active,
            progress: self.progress(),
            winner: self.winner.report(),
            loser: self.loser.report(),
            strategies: self.strategies.iter().map(|s| s.report()).collect(),
        }
    }
}
