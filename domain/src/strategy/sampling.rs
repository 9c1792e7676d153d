//! Random hypothesis selection shared by the answering strategies

use crate::core::error::DomainError;
use crate::quiz::Question;
use rand::Rng;
use rand::seq::SliceRandom;

/// Uniformly random unknown hypothesis other than `exclude`
pub(crate) fn random_unknown<R: Rng>(
    question: &Question,
    exclude: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = question
        .unknown_hypotheses()
        .into_iter()
        .filter(|&h| Some(h) != exclude)
        .collect();
    candidates.choose(rng).copied()
}

/// Starting guess for a newly registered question
pub(crate) fn initial_guess<R: Rng>(question: &Question, rng: &mut R) -> usize {
    question
        .solution()
        .or_else(|| random_unknown(question, None, rng))
        .unwrap_or(0)
}

/// Draw a replacement guess; at least two hypotheses must still be unknown
pub(crate) fn resample<R: Rng>(
    strategy: &'static str,
    question: &Question,
    exclude: Option<usize>,
    rng: &mut R,
) -> Result<usize, DomainError> {
    let unknown = question.unknown_count();
    let exhausted = || DomainError::ResampleExhausted {
        strategy,
        question: question.id().to_hex(),
        unknown,
    };
    if unknown < 2 {
        return Err(exhausted());
    }
    random_unknown(question, exclude, rng).ok_or_else(exhausted)
}

/// Inclusion likelihood falling off quadratically from `max_likelihood`
/// at `min` to `min_likelihood` at `max`.
pub fn inverse_square_likelihood(
    value: f64,
    min: f64,
    max: f64,
    min_likelihood: f64,
    max_likelihood: f64,
) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        return max_likelihood;
    }
    let position = (value - min) / (max - min);
    (1.0 - position).powi(2) * (max_likelihood - min_likelihood) + min_likelihood
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuestionType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_inverse_square_likelihood() {
        assert_eq!(inverse_square_likelihood(2.0, 2.0, 2.0, 0.5, 1.0), 1.0);
        assert_eq!(inverse_square_likelihood(0.0, 0.0, 4.0, 0.3, 1.0), 1.0);
        assert_eq!(inverse_square_likelihood(4.0, 0.0, 4.0, 0.3, 1.0), 0.3);
        let mid = inverse_square_likelihood(2.0, 0.0, 4.0, 0.2, 1.0);
        assert!((mid - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_resample_excludes_and_skips_decided() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = Question::new("q", QuestionType::ChooseOne, ["a", "b", "c"]).unwrap();
        q.rule_out(0).unwrap();
        for _ in 0..20 {
            assert_eq!(resample("Beta", &q, Some(1), &mut rng), Ok(2));
        }
    }

    #[test]
    fn test_resample_needs_two_unknown() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = Question::new("q", QuestionType::ChooseOne, ["a", "b", "c"]).unwrap();
        q.rule_out(0).unwrap();
        q.rule_out(1).unwrap();
        let err = resample("Alpha", &q, None, &mut rng).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_initial_guess_of_solved_question_is_solution() {
        let mut rng = StdRng::seed_from_u64(1);
        let q = Question::new("q", QuestionType::ChooseOne, ["only"]).unwrap();
        assert_eq!(initial_guess(&q, &mut rng), 0);
    }
}
