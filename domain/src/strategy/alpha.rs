//! Alpha strategy: one tracked guess per question.
//!
//! Each round's score factor is compared with a moving average of past
//! factors. Guesses exposed in a round that beat the average (or fell below
//! it, for the negative polarity) gain confidence; the others lose it and are
//! replaced once their counter reaches zero.

use super::sampling::{initial_guess, resample};
use super::state::{Guess, Polarity};
use super::{
    EPSILON, FeedbackStrategy, ReportDetails, RoundContext, ScoreFeedback, Strategy, StrategyKind,
    StrategyReport,
};
use crate::core::error::DomainError;
use crate::moving_average::MovingAverage;
use crate::quiz::{Question, QuestionRef, Registry};
use rand::rngs::StdRng;

/// Added to the dynamic window so that the average spans a few more rounds
/// than strictly needed for coverage
const WINDOW_MARGIN: usize = 5;

#[derive(Debug)]
pub struct AlphaStrategy {
    polarity: Polarity,
    window_override: Option<usize>,
    average: Option<MovingAverage>,
    feedback_epochs: u64,
    reinforcements: u64,
    penalties: u64,
    resamples: u64,
}

impl AlphaStrategy {
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            window_override: None,
            average: None,
            feedback_epochs: 0,
            reinforcements: 0,
            penalties: 0,
            resamples: 0,
        }
    }

    /// Use a fixed moving-average window instead of the dynamic one
    pub fn with_window_override(mut self, window: Option<usize>) -> Self {
        self.window_override = window;
        self
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn average(&self) -> Option<&MovingAverage> {
        self.average.as_ref()
    }

    fn is_favorable(&self, factor: f64, average: f64) -> bool {
        match self.polarity {
            Polarity::Positive => factor - EPSILON > average,
            Polarity::Negative => factor + EPSILON < average,
        }
    }

    fn replace_guess(&mut self, question: &mut Question, rng: &mut StdRng) -> Result<(), DomainError> {
        let hypothesis = resample(self.name(), question, None, rng)?;
        *question.strategy_state_mut().alpha_mut(self.polarity) = Guess::new(hypothesis);
        self.resamples += 1;
        Ok(())
    }
}

impl FeedbackStrategy for AlphaStrategy {
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
        self.feedback_epochs += 1;
        let factor = feedback.factor();

        let average = self
            .average
            .get_or_insert_with(|| MovingAverage::with_initial(round.blind_guess_chance(registry)));
        if round.is_window_epoch() {
            let window = self
                .window_override
                .unwrap_or_else(|| round.dynamic_window() + WINDOW_MARGIN)
                .clamp(1, average.capacity());
            average.set_window_size(window)?;
        }
        average.add(factor);
        let mean = average.mean();

        for entry in round.entries {
            let question = registry.get_mut(entry.question);
            if question.is_solved() {
                continue;
            }
            let guess = *question.strategy_state().alpha(self.polarity);
            if question.hypothesis(guess.hypothesis).is_false() {
                self.replace_guess(question, rng)?;
            } else if self.is_favorable(factor, mean) {
                question.strategy_state_mut().alpha_mut(self.polarity).counter += 1;
                self.reinforcements += 1;
            } else {
                let counter = {
                    let guess = question.strategy_state_mut().alpha_mut(self.polarity);
                    guess.counter -= 1;
                    guess.counter
                };
                self.penalties += 1;
                if counter <= 0 {
                    self.replace_guess(question, rng)?;
                }
            }
        }
        Ok(())
    }

    fn report(&self) -> StrategyReport {
        StrategyReport {
            name: self.name(),
            feedback_epochs: self.feedback_epochs,
            details: ReportDetails::Alpha {
                reinforcements: self.reinforcements,
                penalties: self.penalties,
                resamples: self.resamples,
                average_mean: self.average.as_ref().map(MovingAverage::mean),
                window_size: self.average.as_ref().map(MovingAverage::window_size),
            },
        }
    }
}

impl Strategy for AlphaStrategy {
    fn kind(&self) -> StrategyKind {
        match self.polarity {
            Polarity::Positive => StrategyKind::Alpha,
            Polarity::Negative => StrategyKind::NegativeAlpha,
        }
    }

    fn initialize_question(&mut self, question: &mut Question, rng: &mut StdRng) {
        let hypothesis = initial_guess(question, rng);
        *question.strategy_state_mut().alpha_mut(self.polarity) = Guess::new(hypothesis);
    }

    fn expose(
        &mut self,
        _question_ref: QuestionRef,
        question: &mut Question,
        rng: &mut StdRng,
    ) -> Result<usize, DomainError> {
        if let Some(solution) = question.solution() {
            return Ok(solution);
        }
        let guess = question.strategy_state().alpha(self.polarity).hypothesis;
        if question.hypothesis(guess).is_unknown() {
            return Ok(guess);
        }
        self.replace_guess(question, rng)?;
        Ok(question.strategy_state().alpha(self.polarity).hypothesis)
    }
}
