//! Beta strategy: two competing guesses per question.
//!
//! Branch 1 is the guess normally exposed. For the few questions in the
//! current training minibatch, branch 2 is exposed on every other round.
//! Separate moving averages collect the score factor of "branch 1 rounds"
//! and "branch 2 rounds"; once a measurement cycle completes, their medians
//! are ranked against a slow threshold average and the ranking decides which
//! branch of the minibatch questions gains or loses confidence.

use super::sampling::{initial_guess, random_unknown, resample};
use super::state::{Branches, Guess, Polarity};
use super::{
    EPSILON, FeedbackStrategy, ReportDetails, RoundContext, ScoreFeedback, Strategy, StrategyKind,
    StrategyReport, inverse_square_likelihood,
};
use crate::core::error::DomainError;
use crate::moving_average::MovingAverage;
use crate::quiz::{Question, QuestionRef, Registry};
use rand::Rng;
use rand::rngs::StdRng;

const THRESHOLD_WINDOW: usize = 10;
const BRANCH_WINDOW: usize = 5;

/// Default number of questions trained per measurement
pub const DEFAULT_MINIBATCH_SIZE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Raise(Branch),
    Lower(Branch),
}

/// Counter adjustments for a ranking of the branch medians `m1`, `m2` and
/// the threshold `t`. Ties adjust nothing.
fn adjustments(polarity: Polarity, m1: f64, m2: f64, t: f64) -> &'static [Adjustment] {
    use Adjustment::{Lower, Raise};
    use Branch::{First, Second};

    match polarity {
        Polarity::Positive => {
            if m1 > m2 && m2 > t {
                &[Raise(First)]
            } else if m2 > m1 && m1 > t {
                &[Raise(Second), Lower(First)]
            } else if m2 > t && t > m1 {
                &[Raise(Second), Lower(First)]
            } else if m1 > t && t > m2 {
                &[Raise(First), Lower(Second)]
            } else if t > m1 && m1 > m2 {
                &[Lower(Second)]
            } else if t > m2 && m2 > m1 {
                &[Lower(First)]
            } else {
                &[]
            }
        }
        Polarity::Negative => {
            if m1 > m2 && m2 > t {
                &[Lower(First)]
            } else if m2 > m1 && m1 > t {
                &[Lower(Second), Raise(First)]
            } else if m2 > t && t > m1 {
                &[Lower(Second), Raise(First)]
            } else if m1 > t && t > m2 {
                &[Lower(First), Raise(Second)]
            } else if t > m1 && m1 > m2 {
                &[Lower(First), Raise(Second)]
            } else if t > m2 && m2 > m1 {
                &[Raise(Second), Raise(First)]
            } else {
                &[]
            }
        }
    }
}

/// Minimum inclusion likelihood of the training batch, by counter spread
fn min_likelihood(spread: f64) -> f64 {
    if spread < 2.5 {
        0.5
    } else if spread < 4.5 {
        0.3
    } else if spread < 8.5 {
        0.2
    } else {
        0.1
    }
}

#[derive(Debug, Clone)]
struct BetaAverages {
    threshold: MovingAverage,
    branch1: MovingAverage,
    branch2: MovingAverage,
}

impl BetaAverages {
    fn new(initial_value: f64) -> Self {
        Self {
            threshold: MovingAverage::with_initial(initial_value),
            branch1: MovingAverage::with_initial(initial_value),
            branch2: MovingAverage::with_initial(initial_value),
        }
    }

    fn apply_windows(&mut self) -> Result<(), DomainError> {
        self.threshold.set_window_size(THRESHOLD_WINDOW)?;
        self.branch1.set_window_size(BRANCH_WINDOW)?;
        self.branch2.set_window_size(BRANCH_WINDOW)
    }

    /// Rounds needed to refill both branch windows
    fn cycle_len(&self) -> u64 {
        (self.branch1.window_size() + self.branch2.window_size()) as u64
    }
}

#[derive(Debug)]
pub struct BetaStrategy {
    polarity: Polarity,
    measurement_rounds: usize,
    minibatch_size: usize,
    averages: Option<BetaAverages>,
    training_batch: Vec<QuestionRef>,
    training_minibatch: Vec<QuestionRef>,
    feedback_epochs: u64,
    finished_measurements: u64,
    branch_swaps: u64,
    resamples: u64,
}

impl BetaStrategy {
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            measurement_rounds: 1,
            minibatch_size: DEFAULT_MINIBATCH_SIZE,
            averages: None,
            training_batch: Vec::new(),
            training_minibatch: Vec::new(),
            feedback_epochs: 0,
            finished_measurements: 0,
            branch_swaps: 0,
            resamples: 0,
        }
    }

    /// Number of full branch-window cycles per measurement
    pub fn with_measurement_rounds(mut self, rounds: usize) -> Self {
        self.measurement_rounds = rounds.max(1);
        self
    }

    pub fn with_minibatch_size(mut self, size: usize) -> Self {
        self.minibatch_size = size.max(1);
        self
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn finished_measurements(&self) -> u64 {
        self.finished_measurements
    }

    pub fn training_minibatch(&self) -> &[QuestionRef] {
        &self.training_minibatch
    }

    fn branches(&self, question: &Question) -> Branches {
        *question.strategy_state().beta(self.polarity)
    }

    fn resample_branch2(&mut self, question: &mut Question, rng: &mut StdRng) -> Result<(), DomainError> {
        let branch1 = self.branches(question).branch1.hypothesis;
        let hypothesis = resample(self.name(), question, Some(branch1), rng)?;
        question.strategy_state_mut().beta_mut(self.polarity).branch2 = Guess::new(hypothesis);
        self.resamples += 1;
        Ok(())
    }

    /// Branch 2 takes over branch 1, then branch 2 is drawn anew
    fn promote_branch2(&mut self, question: &mut Question, rng: &mut StdRng) -> Result<(), DomainError> {
        let branch2 = self.branches(question).branch2.hypothesis;
        let successor = if question.hypothesis(branch2).is_unknown() {
            branch2
        } else {
            resample(self.name(), question, None, rng)?
        };
        question.strategy_state_mut().beta_mut(self.polarity).branch1 = Guess::new(successor);
        self.branch_swaps += 1;
        self.resample_branch2(question, rng)
    }

    /// Replace branches ruled out by the resolvers. Returns whether anything
    /// was replaced.
    fn repair(&mut self, question: &mut Question, rng: &mut StdRng) -> Result<bool, DomainError> {
        let mut repaired = false;
        if question.hypothesis(self.branches(question).branch2.hypothesis).is_false() {
            self.resample_branch2(question, rng)?;
            repaired = true;
        }
        if question.hypothesis(self.branches(question).branch1.hypothesis).is_false() {
            self.promote_branch2(question, rng)?;
            repaired = true;
        }
        Ok(repaired)
    }

    fn apply(
        &mut self,
        question: &mut Question,
        adjustment: Adjustment,
        rng: &mut StdRng,
    ) -> Result<(), DomainError> {
        let branches = question.strategy_state_mut().beta_mut(self.polarity);
        match adjustment {
            Adjustment::Raise(Branch::First) => branches.branch1.counter += 1,
            Adjustment::Raise(Branch::Second) => branches.branch2.counter += 1,
            Adjustment::Lower(Branch::First) => {
                branches.branch1.counter -= 1;
                if branches.branch1.counter <= 0 {
                    self.promote_branch2(question, rng)?;
                }
            }
            Adjustment::Lower(Branch::Second) => {
                branches.branch2.counter -= 1;
                if branches.branch2.counter <= 0 {
                    self.resample_branch2(question, rng)?;
                }
            }
        }
        Ok(())
    }

    /// Sample unsolved questions, favoring those whose branch 1 counter is low
    fn pick_training_batch(&mut self, registry: &Registry, rng: &mut StdRng) {
        let candidates: Vec<(QuestionRef, f64)> = registry
            .iter()
            .filter(|(_, q)| !q.is_solved())
            .map(|(r, q)| (r, self.branches(q).branch1.counter as f64))
            .collect();
        let Some(min) = candidates.iter().map(|(_, c)| *c).reduce(f64::min) else {
            self.training_batch.clear();
            return;
        };
        let max = candidates.iter().map(|(_, c)| *c).fold(min, f64::max);
        let floor = min_likelihood(max - min);

        self.training_batch = candidates
            .into_iter()
            .filter(|(_, counter)| {
                let likelihood = inverse_square_likelihood(*counter, min, max, floor, 1.0);
                rng.gen_range(0.0..=1.0) <= likelihood + EPSILON
            })
            .map(|(r, _)| r)
            .collect();
    }

    fn pick_training_minibatch(&mut self, registry: &Registry, rng: &mut StdRng) {
        if self.training_batch.is_empty() {
            self.pick_training_batch(registry, rng);
        }
        let picks = self.minibatch_size.min(self.training_batch.len());
        self.training_minibatch = (0..picks)
            .map(|_| {
                let index = rng.gen_range(0..self.training_batch.len());
                self.training_batch.swap_remove(index)
            })
            .collect();
    }
}

impl FeedbackStrategy for BetaStrategy {
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn process_feedback(
        &mut self,
        feedback: ScoreFeedback,
        round: &RoundContext<'_>,
        registry: &mut Registry,
        rng: &mut StdRng,
    ) -> Result<(), DomainError> {
        let factor = feedback.factor();
        let averages = self
            .averages
            .get_or_insert_with(|| BetaAverages::new(round.blind_guess_chance(registry)));
        if round.is_window_epoch() {
            averages.apply_windows()?;
        }
        if self.feedback_epochs % 2 == 0 {
            averages.branch1.add(factor);
        } else {
            averages.branch2.add(factor);
        }
        self.feedback_epochs += 1;

        let cycle = averages.cycle_len() * self.measurement_rounds as u64;
        if self.feedback_epochs % cycle != 0 {
            return Ok(());
        }

        let median1 = averages.branch1.median();
        let median2 = averages.branch2.median();
        averages.threshold.add(median1);
        let threshold = averages.threshold.mean();

        let minibatch = std::mem::take(&mut self.training_minibatch);
        for question_ref in minibatch {
            let question = registry.get_mut(question_ref);
            if question.is_solved() || self.repair(question, rng)? {
                continue;
            }
            let m1 = median1 - EPSILON * rng.gen_range(0.0..1.0);
            let m2 = median2 - EPSILON * rng.gen_range(0.0..1.0);
            let t = threshold - EPSILON * rng.gen_range(0.0..1.0);
            for adjustment in adjustments(self.polarity, m1, m2, t) {
                self.apply(question, *adjustment, rng)?;
            }
        }

        self.finished_measurements += 1;
        self.pick_training_minibatch(registry, rng);
        Ok(())
    }

    fn report(&self) -> StrategyReport {
        StrategyReport {
            name: self.name(),
            feedback_epochs: self.feedback_epochs,
            details: ReportDetails::Beta {
                finished_measurements: self.finished_measurements,
                branch_swaps: self.branch_swaps,
                resamples: self.resamples,
                threshold_mean: self.averages.as_ref().map(|a| a.threshold.mean()),
                threshold_window: self.averages.as_ref().map(|a| a.threshold.window_size()),
                training_batch: self.training_batch.len(),
            },
        }
    }
}

impl Strategy for BetaStrategy {
    fn kind(&self) -> StrategyKind {
        match self.polarity {
            Polarity::Positive => StrategyKind::Beta,
            Polarity::Negative => StrategyKind::NegativeBeta,
        }
    }

    fn initialize_question(&mut self, question: &mut Question, rng: &mut StdRng) {
        let branch1 = initial_guess(question, rng);
        let branch2 = random_unknown(question, None, rng).unwrap_or(branch1);
        *question.strategy_state_mut().beta_mut(self.polarity) = Branches {
            branch1: Guess::new(branch1),
            branch2: Guess::new(branch2),
        };
    }

    fn expose(
        &mut self,
        question_ref: QuestionRef,
        question: &mut Question,
        rng: &mut StdRng,
    ) -> Result<usize, DomainError> {
        if let Some(solution) = question.solution() {
            return Ok(solution);
        }
        self.repair(question, rng)?;
        let branches = self.branches(question);
        if self.feedback_epochs % 2 == 1 && self.training_minibatch.contains(&question_ref) {
            Ok(branches.branch2.hypothesis)
        } else {
            Ok(branches.branch1.hypothesis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuestionType;
    use crate::strategy::RoundEntry;
    use rand::SeedableRng;

    struct Fixture {
        registry: Registry,
        entries: Vec<RoundEntry>,
        rng: StdRng,
    }

    fn fixture(beta: &mut BetaStrategy) -> Fixture {
        let mut rng = StdRng::seed_from_u64(9);
        let mut registry = Registry::new();
        let mut q = Question::new("q", QuestionType::ChooseOne, ["a", "b", "c", "d"]).unwrap();
        beta.initialize_question(&mut q, &mut rng);
        *q.strategy_state_mut().beta_mut(beta.polarity()) = Branches {
            branch1: Guess::new(0),
            branch2: Guess::new(1),
        };
        let (question, _) = registry.insert(q);
        Fixture {
            registry,
            entries: vec![RoundEntry {
                question,
                exposed: 0,
            }],
            rng,
        }
    }

    /// Feed rounds `from..to`, alternating a high factor for branch 1
    /// rounds and a low one for branch 2 rounds
    fn feed_alternating_from(beta: &mut BetaStrategy, fx: &mut Fixture, from: u64, to: u64) {
        for epoch in from..to {
            let factor = if epoch % 2 == 0 { 0.9 } else { 0.1 };
            let round = RoundContext {
                epoch,
                registry_len: fx.registry.len(),
                entries: &fx.entries,
            };
            beta.process_feedback(
                ScoreFeedback::new(factor, 1.0).unwrap(),
                &round,
                &mut fx.registry,
                &mut fx.rng,
            )
            .unwrap();
        }
    }

    fn feed_alternating(beta: &mut BetaStrategy, fx: &mut Fixture, rounds: u64) {
        feed_alternating_from(beta, fx, 0, rounds);
    }

    fn branches(beta: &BetaStrategy, fx: &Fixture) -> Branches {
        *fx.registry
            .get(fx.entries[0].question)
            .strategy_state()
            .beta(beta.polarity())
    }

    /// Six unsolved questions with branch 1 counters 1, 3, .., 11 and one
    /// solved question
    fn ranked_registry(
        beta: &mut BetaStrategy,
        rng: &mut StdRng,
    ) -> (Registry, Vec<QuestionRef>, QuestionRef) {
        let mut registry = Registry::new();
        let mut unsolved = Vec::new();
        for i in 0..6 {
            let mut q = Question::new(format!("q{i}"), QuestionType::ChooseOne, ["a", "b", "c", "d"])
                .unwrap();
            beta.initialize_question(&mut q, rng);
            q.strategy_state_mut().beta_mut(beta.polarity()).branch1.counter = 1 + 2 * i;
            unsolved.push(registry.insert(q).0);
        }
        let solved = Question::new("solved", QuestionType::ChooseOne, ["only"]).unwrap();
        assert!(solved.is_solved());
        let (solved, _) = registry.insert(solved);
        (registry, unsolved, solved)
    }

    #[test]
    fn test_training_batch_keeps_lowest_counter_and_skips_solved() {
        let mut beta = BetaStrategy::new(Polarity::Positive);
        let mut rng = StdRng::seed_from_u64(5);
        let (registry, unsolved, solved) = ranked_registry(&mut beta, &mut rng);

        for _ in 0..50 {
            beta.pick_training_batch(&registry, &mut rng);
            assert!(beta.training_batch.contains(&unsolved[0]));
            assert!(!beta.training_batch.contains(&solved));
            assert!(beta.training_batch.iter().all(|r| unsolved.contains(r)));
        }
    }

    #[test]
    fn test_minibatch_drains_batch_then_refills() {
        let mut beta = BetaStrategy::new(Polarity::Positive).with_minibatch_size(2);
        let mut rng = StdRng::seed_from_u64(17);
        let (registry, _, solved) = ranked_registry(&mut beta, &mut rng);

        assert!(beta.training_batch.is_empty());
        beta.pick_training_minibatch(&registry, &mut rng);
        assert!(!beta.training_minibatch().is_empty());

        loop {
            assert!(beta.training_minibatch().len() <= 2);
            assert!(!beta.training_minibatch().contains(&solved));
            for picked in beta.training_minibatch() {
                assert!(!beta.training_batch.contains(picked));
            }
            if beta.training_batch.is_empty() {
                break;
            }
            let before = beta.training_batch.len();
            beta.pick_training_minibatch(&registry, &mut rng);
            assert_eq!(
                beta.training_batch.len(),
                before - beta.training_minibatch().len()
            );
        }

        // the drained batch is refilled on the next pick
        beta.pick_training_minibatch(&registry, &mut rng);
        assert!(!beta.training_minibatch().is_empty());
        assert!(!beta.training_minibatch().contains(&solved));
    }

    #[test]
    fn test_initialize_question_picks_unknown_branches() {
        let mut beta = BetaStrategy::new(Polarity::Positive);
        let mut rng = StdRng::seed_from_u64(3);
        let mut q = Question::new("q", QuestionType::ChooseOneOrMore, ["a", "b", "c"]).unwrap();
        beta.initialize_question(&mut q, &mut rng);
        let branches = q.strategy_state().beta(Polarity::Positive);
        assert_eq!(branches.branch1.counter, 1);
        assert_eq!(branches.branch2.counter, 1);
        assert!(branches.branch1.hypothesis < 7);
        assert!(branches.branch2.hypothesis < 7);
    }

    #[test]
    fn test_decision_table_positive() {
        use Adjustment::*;
        use Branch::*;
        let p = Polarity::Positive;
        assert_eq!(adjustments(p, 0.9, 0.5, 0.1), &[Raise(First)]);
        assert_eq!(adjustments(p, 0.5, 0.9, 0.1), &[Raise(Second), Lower(First)]);
        assert_eq!(adjustments(p, 0.1, 0.9, 0.5), &[Raise(Second), Lower(First)]);
        assert_eq!(adjustments(p, 0.9, 0.1, 0.5), &[Raise(First), Lower(Second)]);
        assert_eq!(adjustments(p, 0.5, 0.1, 0.9), &[Lower(Second)]);
        assert_eq!(adjustments(p, 0.1, 0.5, 0.9), &[Lower(First)]);
        assert!(adjustments(p, 0.5, 0.5, 0.5).is_empty());
    }

    #[test]
    fn test_decision_table_negative() {
        use Adjustment::*;
        use Branch::*;
        let n = Polarity::Negative;
        assert_eq!(adjustments(n, 0.9, 0.5, 0.1), &[Lower(First)]);
        assert_eq!(adjustments(n, 0.5, 0.9, 0.1), &[Lower(Second), Raise(First)]);
        assert_eq!(adjustments(n, 0.1, 0.9, 0.5), &[Lower(Second), Raise(First)]);
        assert_eq!(adjustments(n, 0.9, 0.1, 0.5), &[Lower(First), Raise(Second)]);
        assert_eq!(adjustments(n, 0.5, 0.1, 0.9), &[Lower(First), Raise(Second)]);
        assert_eq!(adjustments(n, 0.1, 0.5, 0.9), &[Raise(Second), Raise(First)]);
    }

    #[test]
    fn test_min_likelihood_tiers() {
        assert_eq!(min_likelihood(0.0), 0.5);
        assert_eq!(min_likelihood(3.0), 0.3);
        assert_eq!(min_likelihood(8.0), 0.2);
        assert_eq!(min_likelihood(9.0), 0.1);
    }

    #[test]
    fn test_first_measurement_picks_minibatch() {
        let mut beta = BetaStrategy::new(Polarity::Positive);
        let mut fx = fixture(&mut beta);
        feed_alternating(&mut beta, &mut fx, 9);
        assert_eq!(beta.finished_measurements(), 0);
        assert!(beta.training_minibatch().is_empty());

        feed_alternating_from(&mut beta, &mut fx, 9, 10);
        assert_eq!(beta.finished_measurements(), 1);
        assert_eq!(beta.training_minibatch(), &[fx.entries[0].question]);
        // nothing was trained yet
        assert_eq!(branches(&beta, &fx).branch1, Guess::new(0));
    }

    #[test]
    fn test_minibatch_question_exposes_branch2_on_odd_epochs() {
        let mut beta = BetaStrategy::new(Polarity::Positive);
        let mut fx = fixture(&mut beta);
        feed_alternating(&mut beta, &mut fx, 10);
        let question_ref = fx.entries[0].question;

        let question = fx.registry.get_mut(question_ref);
        assert_eq!(beta.expose(question_ref, question, &mut fx.rng), Ok(0));

        feed_alternating_from(&mut beta, &mut fx, 10, 11);
        let question = fx.registry.get_mut(question_ref);
        assert_eq!(beta.expose(question_ref, question, &mut fx.rng), Ok(1));
    }

    #[test]
    fn test_positive_measurement_rewards_stronger_branch1() {
        let mut beta = BetaStrategy::new(Polarity::Positive);
        let mut fx = fixture(&mut beta);
        feed_alternating(&mut beta, &mut fx, 20);
        assert_eq!(beta.finished_measurements(), 2);

        let branches = branches(&beta, &fx);
        // branch 1 median 0.9 > threshold > branch 2 median 0.1
        assert_eq!(branches.branch1, Guess { hypothesis: 0, counter: 2 });
        assert_ne!(branches.branch2.hypothesis, 0);
        assert_eq!(branches.branch2.counter, 1);
        let ReportDetails::Beta { resamples, .. } = beta.report().details else {
            panic!("expected beta report");
        };
        assert_eq!(resamples, 1);
    }

    #[test]
    fn test_negative_measurement_swaps_branches() {
        let mut beta = BetaStrategy::new(Polarity::Negative);
        let mut fx = fixture(&mut beta);
        feed_alternating(&mut beta, &mut fx, 20);

        let branches = branches(&beta, &fx);
        // branch 1 lost its only point and was replaced by branch 2
        assert_eq!(branches.branch1, Guess::new(1));
        assert_ne!(branches.branch2.hypothesis, 1);
        assert_eq!(branches.branch2.counter, 2);
        let ReportDetails::Beta { branch_swaps, .. } = beta.report().details else {
            panic!("expected beta report");
        };
        assert_eq!(branch_swaps, 1);
    }

    #[test]
    fn test_measurement_rounds_stretch_the_cycle() {
        let mut beta = BetaStrategy::new(Polarity::Positive).with_measurement_rounds(2);
        let mut fx = fixture(&mut beta);
        feed_alternating(&mut beta, &mut fx, 10);
        assert_eq!(beta.finished_measurements(), 0);
        feed_alternating_from(&mut beta, &mut fx, 10, 20);
        assert_eq!(beta.finished_measurements(), 1);
    }

    #[test]
    fn test_expose_repairs_ruled_out_branch1() {
        let mut beta = BetaStrategy::new(Polarity::Positive);
        let mut fx = fixture(&mut beta);
        let question_ref = fx.entries[0].question;
        let question = fx.registry.get_mut(question_ref);
        question.rule_out(0).unwrap();

        assert_eq!(beta.expose(question_ref, question, &mut fx.rng), Ok(1));
        let branches = *question.strategy_state().beta(Polarity::Positive);
        assert_eq!(branches.branch1, Guess::new(1));
        assert!(question.hypothesis(branches.branch2.hypothesis).is_unknown());
        assert_ne!(branches.branch2.hypothesis, 1);
    }
}
