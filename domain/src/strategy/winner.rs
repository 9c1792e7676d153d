//! Winner resolver: a perfect round proves every exposed hypothesis.

use super::{FeedbackStrategy, ReportDetails, RoundContext, ScoreFeedback, StrategyReport};
use crate::core::error::DomainError;
use crate::quiz::Registry;
use rand::rngs::StdRng;

#[derive(Debug, Default)]
pub struct WinnerStrategy {
    feedback_epochs: u64,
    triggers: u64,
    questions_solved: u64,
    hypotheses_closed: u64,
}

impl WinnerStrategy {
    pub const NAME: &'static str = "Winner";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self) -> u64 {
        self.triggers
    }
}

impl FeedbackStrategy for WinnerStrategy {
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
        if !feedback.is_perfect() {
            return Ok(());
        }
        self.triggers += 1;

        for entry in round.entries {
            let question = registry.get_mut(entry.question);
            if question.is_solved() {
                continue;
            }
            self.hypotheses_closed += question.resolve(entry.exposed)? as u64;
            self.questions_solved += 1;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Question, QuestionType};
    use crate::strategy::RoundEntry;
    use rand::SeedableRng;

    fn setup() -> (Registry, Vec<RoundEntry>) {
        let mut registry = Registry::new();
        let mut entries = Vec::new();
        for (i, exposed) in [(0, 1), (1, 2)] {
            let q = Question::new(format!("q{i}"), QuestionType::ChooseOne, ["a", "b", "c"]).unwrap();
            let (question, _) = registry.insert(q);
            entries.push(RoundEntry { question, exposed });
        }
        (registry, entries)
    }

    #[test]
    fn test_perfect_round_solves_exposed() {
        let (mut registry, entries) = setup();
        let mut rng = StdRng::seed_from_u64(0);
        let mut winner = WinnerStrategy::new();
        let round = RoundContext {
            epoch: 0,
            registry_len: registry.len(),
            entries: &entries,
        };
        winner
            .process_feedback(ScoreFeedback::new(1.0, 1.0).unwrap(), &round, &mut registry, &mut rng)
            .unwrap();

        for entry in &entries {
            let q = registry.get(entry.question);
            assert!(q.is_solved());
            assert_eq!(q.solution(), Some(entry.exposed));
            assert_eq!(q.unknown_count(), 0);
        }
        assert_eq!(winner.triggers(), 1);
        assert_eq!(
            winner.report().details,
            ReportDetails::Resolver {
                triggers: 1,
                questions_solved: 2,
                hypotheses_closed: 6,
            }
        );
    }

    #[test]
    fn test_imperfect_round_is_ignored() {
        let (mut registry, entries) = setup();
        let mut rng = StdRng::seed_from_u64(0);
        let mut winner = WinnerStrategy::new();
        let round = RoundContext {
            epoch: 0,
            registry_len: registry.len(),
            entries: &entries,
        };
        winner
            .process_feedback(ScoreFeedback::new(0.5, 1.0).unwrap(), &round, &mut registry, &mut rng)
            .unwrap();
        assert_eq!(registry.solved_count(), 0);
        assert_eq!(winner.triggers(), 0);
        assert_eq!(winner.report().feedback_epochs, 1);
    }

    #[test]
    fn test_perfect_round_with_ruled_out_exposure_fails() {
        let (mut registry, entries) = setup();
        registry.get_mut(entries[0].question).rule_out(1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let round = RoundContext {
            epoch: 0,
            registry_len: registry.len(),
            entries: &entries,
        };
        let err = WinnerStrategy::new()
            .process_feedback(ScoreFeedback::new(1.0, 1.0).unwrap(), &round, &mut registry, &mut rng)
            .unwrap_err();
        assert!(matches!(err, DomainError::ContradictoryResolution(_)));
        assert!(err.is_internal());
    }
}
