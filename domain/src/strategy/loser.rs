//! Loser resolver: a zero round disproves every exposed hypothesis.

use super::{FeedbackStrategy, ReportDetails, RoundContext, ScoreFeedback, StrategyReport};
use crate::core::error::DomainError;
use crate::quiz::Registry;
use rand::rngs::StdRng;

#[derive(Debug, Default)]
pub struct LoserStrategy {
    feedback_epochs: u64,
    triggers: u64,
    questions_solved: u64,
    hypotheses_closed: u64,
}

impl LoserStrategy {
    pub const NAME: &'static str = "Loser";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self) -> u64 {
        self.triggers
    }
}

impl FeedbackStrategy for LoserStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process_feedback(
        &mut self,
        feedback: ScoreFeedback,
        round: &RoundContext<'_>,
        registry: &mut Registry,
        _rng: &mut StdRng,
    ) -> Result<(), DomainError> {
        self.feedback_epochs += 1;
        if !feedback.is_zero() {
            return Ok(());
        }
        self.triggers += 1;

        for entry in round.entries {
            let question = registry.get_mut(entry.question);
            if question.is_solved() {
                continue;
            }
            if question.has_true_hypothesis() {
                return Err(DomainError::AlreadyResolved(question.id().to_hex()));
            }
            if question.rule_out(entry.exposed)? {
                self.hypotheses_closed += 1;
            }
            match question.unknown_hypotheses().as_slice() {
                [] => return Err(DomainError::AllEliminated(question.id().to_hex())),
                [survivor] => {
                    self.hypotheses_closed += question.resolve(*survivor)? as u64;
                    self.questions_solved += 1;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn report(&self) -> StrategyReport {
        StrategyReport {
            name: Self::NAME,
            feedback_epochs: self.feedback_epochs,
            details: ReportDetails::Resolver {
                triggers: self.triggers,
                questions_solved: self.questions_solved,
                hypotheses_closed: self.hypotheses_closed,
            },
        }
    }
}
