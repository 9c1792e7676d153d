//! Synthetic quiz with a hidden answer key

use quizsolver_application::ports::quiz_oracle::{OracleError, QuizOracle};
use quizsolver_domain::{AnsweredRound, QuestionType, RawQuestion, RoundSubmission};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Shape of a generated quiz
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub questions_count: usize,
    pub min_answers: usize,
    pub max_answers: usize,
    pub probability_choose_one: f64,
    pub probability_choose_one_or_more: f64,
    pub probability_choose_zero_or_more: f64,
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            questions_count: 200,
            min_answers: 4,
            max_answers: 4,
            probability_choose_one: 1.0,
            probability_choose_one_or_more: 0.0,
            probability_choose_zero_or_more: 0.0,
            seed: None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("A quiz needs at least one question")]
    NoQuestions,

    #[error("Invalid answer range {min}..={max}")]
    InvalidAnswerRange { min: usize, max: usize },

    #[error("{kind} questions support at most {limit} answers, {max} requested")]
    TooManyAnswers {
        kind: QuestionType,
        max: usize,
        limit: usize,
    },

    #[error("Question type probabilities must be non-negative with a positive sum")]
    InvalidProbabilities,
}

impl GeneratorSettings {
    fn validate(&self) -> Result<(), GeneratorError> {
        if self.questions_count == 0 {
            return Err(GeneratorError::NoQuestions);
        }
        if self.min_answers == 0 || self.min_answers > self.max_answers {
            return Err(GeneratorError::InvalidAnswerRange {
                min: self.min_answers,
                max: self.max_answers,
            });
        }
        let weights = self.weights();
        if weights.iter().any(|(_, w)| w.is_nan() || *w < 0.0)
            || weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0
        {
            return Err(GeneratorError::InvalidProbabilities);
        }
        for (kind, weight) in weights {
            if weight > 0.0 && self.max_answers > kind.max_options() {
                return Err(GeneratorError::TooManyAnswers {
                    kind,
                    max: self.max_answers,
                    limit: kind.max_options(),
                });
            }
        }
        Ok(())
    }

    fn weights(&self) -> [(QuestionType, f64); 3] {
        [
            (QuestionType::ChooseOne, self.probability_choose_one),
            (QuestionType::ChooseOneOrMore, self.probability_choose_one_or_more),
            (QuestionType::ChooseZeroOrMore, self.probability_choose_zero_or_more),
        ]
    }

    fn pick_kind<R: Rng>(&self, rng: &mut R) -> QuestionType {
        let weights = self.weights();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen_range(0.0..total);
        for (kind, weight) in weights {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        QuestionType::ChooseZeroOrMore
    }
}

struct KeyedQuestion {
    raw: RawQuestion,
    key: Vec<bool>,
}

/// A generated quiz that doubles as its own scoring oracle
pub struct SyntheticQuiz {
    questions: Vec<KeyedQuestion>,
    by_text: HashMap<String, usize>,
    rng: StdRng,
}

impl SyntheticQuiz {
    pub fn generate(settings: &GeneratorSettings) -> Result<Self, GeneratorError> {
        settings.validate()?;
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let questions: Vec<KeyedQuestion> = (0..settings.questions_count)
            .map(|i| generate_question(i, settings, &mut rng))
            .collect();
        let by_text = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.raw.question.clone(), i))
            .collect();
        debug!("Generated synthetic quiz with {} questions", questions.len());

        Ok(Self {
            questions,
            by_text,
            rng,
        })
    }

    /// Every question as it is submitted to the solver
    pub fn questions(&self) -> impl Iterator<Item = &RawQuestion> {
        self.questions.iter().map(|q| &q.raw)
    }

    /// Membership of each answer in the correct subset
    pub fn answer_key(&self, question: &str) -> Option<&[bool]> {
        self.by_text
            .get(question)
            .map(|&i| self.questions[i].key.as_slice())
    }
}

fn generate_question<R: Rng>(i: usize, settings: &GeneratorSettings, rng: &mut R) -> KeyedQuestion {
    let count = rng.gen_range(settings.min_answers..=settings.max_answers);
    let kind = settings.pick_kind(rng);
    let correct = match kind {
        QuestionType::ChooseOne => 1,
        QuestionType::ChooseOneOrMore => rng.gen_range(1..=count),
        QuestionType::ChooseZeroOrMore => rng.gen_range(0..=count),
    };
    let mut key = vec![false; count];
    for option in index::sample(rng, count, correct) {
        key[option] = true;
    }

    let mut used = HashSet::with_capacity(count);
    let answers: Vec<String> = key
        .iter()
        .map(|&is_correct| loop {
            let value = if is_correct {
                i as f64 + rng.gen_range(0.1111..0.11119)
            } else {
                (i + rng.gen_range(1..=1000)) as f64 + rng.gen_range(0.0..0.00009)
            };
            let text = format!("1 * {i} ~= {value}");
            if used.insert(text.clone()) {
                break text;
            }
        })
        .collect();

    KeyedQuestion {
        raw: RawQuestion::new(format!("1 * {i} ~= ?"), kind, answers),
        key,
    }
}

impl QuizOracle for SyntheticQuiz {
    fn question_count(&self) -> usize {
        self.questions.len()
    }

    fn next_round(&mut self, size: usize) -> Result<RoundSubmission, OracleError> {
        if size > self.questions.len() {
            return Err(OracleError::RoundTooLarge {
                requested: size,
                available: self.questions.len(),
            });
        }
        let questions = index::sample(&mut self.rng, self.questions.len(), size)
            .into_iter()
            .map(|i| self.questions[i].raw.clone())
            .collect();
        Ok(RoundSubmission { questions })
    }

    /// Fraction of questions whose every answer carries the right flag
    fn score(&self, round: &AnsweredRound) -> Result<f64, OracleError> {
        if round.questions.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for answered in &round.questions {
            let key = self
                .answer_key(&answered.question)
                .ok_or_else(|| OracleError::UnknownQuestion(answered.question.clone()))?;
            if answered.answers.len() != key.len() {
                return Err(OracleError::AnswerCountMismatch {
                    question: answered.question.clone(),
                    given: answered.answers.len(),
                    expected: key.len(),
                });
            }
            let matches = answered
                .answers
                .iter()
                .zip(key)
                .all(|(answer, &expected)| answer.correct == Some(expected));
            if matches {
                correct += 1;
            }
        }
        Ok(correct as f64 / round.questions.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsolver_domain::{AnsweredOption, AnsweredQuestion};

    fn seeded(settings: GeneratorSettings) -> SyntheticQuiz {
        SyntheticQuiz::generate(&GeneratorSettings {
            seed: Some(17),
            ..settings
        })
        .unwrap()
    }

    fn answer_with_key(quiz: &SyntheticQuiz, raw: &RawQuestion, flip: bool) -> AnsweredQuestion {
        let key = quiz.answer_key(&raw.question).unwrap();
        AnsweredQuestion {
            uid: String::new(),
            question: raw.question.clone(),
            is_solved: false,
            kind: QuestionType::from_tag(raw.kind.as_deref()).unwrap(),
            answers: raw
                .answers
                .iter()
                .zip(key)
                .enumerate()
                .map(|(i, (a, &k))| AnsweredOption {
                    answer: a.answer.clone(),
                    correct: Some(if flip && i == 0 { !k } else { k }),
                })
                .collect(),
        }
    }

    #[test]
    fn test_generated_questions_follow_settings() {
        let quiz = seeded(GeneratorSettings {
            questions_count: 30,
            min_answers: 2,
            max_answers: 5,
            ..Default::default()
        });
        assert_eq!(quiz.question_count(), 30);
        for (i, raw) in quiz.questions().enumerate() {
            assert_eq!(raw.question, format!("1 * {i} ~= ?"));
            assert_eq!(raw.kind.as_deref(), Some("chooseOne"));
            assert!((2..=5).contains(&raw.answers.len()));
            let key = quiz.answer_key(&raw.question).unwrap();
            assert_eq!(key.iter().filter(|k| **k).count(), 1);
        }
    }

    #[test]
    fn test_multi_select_keys() {
        let quiz = seeded(GeneratorSettings {
            questions_count: 40,
            probability_choose_one: 0.0,
            probability_choose_one_or_more: 1.0,
            ..Default::default()
        });
        for raw in quiz.questions() {
            assert_eq!(raw.kind.as_deref(), Some("chooseOneOrMore"));
            let key = quiz.answer_key(&raw.question).unwrap();
            assert!(key.iter().any(|k| *k));
        }
    }

    #[test]
    fn test_answers_are_distinct() {
        let quiz = seeded(GeneratorSettings {
            questions_count: 20,
            min_answers: 8,
            max_answers: 8,
            probability_choose_zero_or_more: 1.0,
            probability_choose_one: 0.0,
            ..Default::default()
        });
        for raw in quiz.questions() {
            let texts: HashSet<&str> = raw.answers.iter().map(|a| a.answer.as_str()).collect();
            assert_eq!(texts.len(), raw.answers.len());
        }
    }

    #[test]
    fn test_next_round_draws_distinct_questions() {
        let mut quiz = seeded(GeneratorSettings {
            questions_count: 10,
            ..Default::default()
        });
        let round = quiz.next_round(9).unwrap();
        let texts: HashSet<&str> = round.questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts.len(), 9);

        assert_eq!(
            quiz.next_round(11).unwrap_err(),
            OracleError::RoundTooLarge {
                requested: 11,
                available: 10
            }
        );
    }

    #[test]
    fn test_score_counts_fully_correct_questions() {
        let mut quiz = seeded(GeneratorSettings {
            questions_count: 4,
            ..Default::default()
        });
        let round = quiz.next_round(4).unwrap();
        let answered = AnsweredRound {
            questions: round
                .questions
                .iter()
                .enumerate()
                .map(|(i, raw)| answer_with_key(&quiz, raw, i == 0))
                .collect(),
        };
        assert_eq!(quiz.score(&answered).unwrap(), 0.75);
    }

    #[test]
    fn test_score_rejects_unknown_questions() {
        let quiz = seeded(GeneratorSettings::default());
        let answered = AnsweredRound {
            questions: vec![AnsweredQuestion {
                uid: String::new(),
                question: "unknown".to_string(),
                is_solved: false,
                kind: QuestionType::ChooseOne,
                answers: vec![],
            }],
        };
        assert_eq!(
            quiz.score(&answered).unwrap_err(),
            OracleError::UnknownQuestion("unknown".to_string())
        );
    }

    #[test]
    fn test_invalid_settings() {
        let result = SyntheticQuiz::generate(&GeneratorSettings {
            questions_count: 0,
            ..Default::default()
        });
        assert_eq!(result.err(), Some(GeneratorError::NoQuestions));

        let result = SyntheticQuiz::generate(&GeneratorSettings {
            max_answers: 17,
            min_answers: 17,
            probability_choose_one_or_more: 1.0,
            ..Default::default()
        });
        assert!(matches!(result.err(), Some(GeneratorError::TooManyAnswers { .. })));
    }
}
