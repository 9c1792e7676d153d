//! Question entity

use super::answer_space;
use super::hypothesis::{Correctness, Hypothesis};
use super::question_type::QuestionType;
use super::records::{AnsweredOption, AnsweredQuestion, RawQuestion};
use crate::core::content_id::ContentId;
use crate::core::error::DomainError;
use crate::strategy::state::StrategyState;
use std::collections::HashSet;

/// One answer of a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    id: ContentId,
    digest: ContentId,
    text: String,
}

impl AnswerOption {
    /// Question identifier XOR the digest of the answer text
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Digest of the answer text alone
    pub fn digest(&self) -> ContentId {
        self.digest
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A validated question with its full hypothesis set (Entity)
///
/// The identifier depends only on content: the question text, the type tag
/// and the set of answer texts. Listing the answers in another order yields
/// the same identifier.
#[derive(Debug, Clone)]
pub struct Question {
    id: ContentId,
    text: String,
    kind: QuestionType,
    options: Vec<AnswerOption>,
    hypotheses: Vec<Hypothesis>,
    solved: bool,
    state: StrategyState,
}

impl Question {
    /// Validate and build a question.
    ///
    /// A question with a single hypothesis is solved on construction.
    pub fn new<I, S>(text: impl Into<String>, kind: QuestionType, answers: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into();
        let answers: Vec<String> = answers.into_iter().map(Into::into).collect();
        let digests = validate_answers(kind, &answers)?;
        let id = Self::combine(&text, kind, &digests);

        let options = answers
            .into_iter()
            .zip(digests)
            .map(|(text, digest)| AnswerOption {
                id: id ^ digest,
                digest,
                text,
            })
            .collect::<Vec<_>>();

        let mut hypotheses: Vec<Hypothesis> = answer_space::expand(kind, options.len())
            .into_iter()
            .map(Hypothesis::new)
            .collect();

        let solved = hypotheses.len() == 1;
        if solved {
            hypotheses[0].set_correctness(Correctness::True);
        }

        Ok(Self {
            id,
            text,
            kind,
            options,
            hypotheses,
            solved,
            state: StrategyState::default(),
        })
    }

    /// Build a question from its submitted form
    pub fn from_raw(raw: &RawQuestion) -> Result<Self, DomainError> {
        let kind = QuestionType::from_tag(raw.kind.as_deref())?;
        Self::new(
            raw.question.as_str(),
            kind,
            raw.answers.iter().map(|a| a.answer.as_str()),
        )
    }

    /// Validate a submitted question and compute its identifier without
    /// expanding its hypotheses
    pub fn identify(raw: &RawQuestion) -> Result<ContentId, DomainError> {
        let kind = QuestionType::from_tag(raw.kind.as_deref())?;
        let answers: Vec<String> = raw.answers.iter().map(|a| a.answer.clone()).collect();
        let digests = validate_answers(kind, &answers)?;
        Ok(Self::combine(&raw.question, kind, &digests))
    }

    fn combine(text: &str, kind: QuestionType, digests: &[ContentId]) -> ContentId {
        let seed = ContentId::of(&format!("{}{}", text, kind.as_str()));
        digests.iter().fold(seed, |acc, d| acc ^ *d)
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn hypothesis(&self, index: usize) -> &Hypothesis {
        &self.hypotheses[index]
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Index of the hypothesis proven correct, once solved
    pub fn solution(&self) -> Option<usize> {
        if !self.solved {
            return None;
        }
        self.hypotheses.iter().position(Hypothesis::is_true)
    }

    pub fn unknown_hypotheses(&self) -> Vec<usize> {
        self.hypotheses
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_unknown())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn unknown_count(&self) -> usize {
        self.hypotheses.iter().filter(|h| h.is_unknown()).count()
    }

    pub fn has_true_hypothesis(&self) -> bool {
        self.hypotheses.iter().any(Hypothesis::is_true)
    }

    /// Mark `index` correct, every sibling wrong, and the question solved.
    ///
    /// Returns how many hypotheses changed from unknown to decided.
    pub fn resolve(&mut self, index: usize) -> Result<usize, DomainError> {
        if self.hypotheses[index].is_false() {
            return Err(DomainError::ContradictoryResolution(self.id.to_hex()));
        }
        let mut closed = 0;
        for (i, hypothesis) in self.hypotheses.iter_mut().enumerate() {
            if !hypothesis.is_unknown() {
                continue;
            }
            let correctness = if i == index {
                Correctness::True
            } else {
                Correctness::False
            };
            hypothesis.set_correctness(correctness);
            closed += 1;
        }
        self.solved = true;
        Ok(closed)
    }

    /// Mark `index` wrong. Returns whether it was still unknown.
    pub fn rule_out(&mut self, index: usize) -> Result<bool, DomainError> {
        let hypothesis = &mut self.hypotheses[index];
        match hypothesis.correctness() {
            Correctness::True => Err(DomainError::AlreadyResolved(self.id.to_hex())),
            Correctness::False => Ok(false),
            Correctness::Unknown => {
                hypothesis.set_correctness(Correctness::False);
                Ok(true)
            }
        }
    }

    /// Render this question with `exposed` as the chosen hypothesis
    pub fn answered(&self, exposed: usize) -> AnsweredQuestion {
        let hypothesis = &self.hypotheses[exposed];
        AnsweredQuestion {
            uid: self.id.to_hex(),
            question: self.text.clone(),
            is_solved: self.solved,
            kind: self.kind,
            answers: self
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| AnsweredOption {
                    answer: option.text.clone(),
                    correct: Some(hypothesis.contains(i)),
                })
                .collect(),
        }
    }

    pub fn strategy_state(&self) -> &StrategyState {
        &self.state
    }

    pub fn strategy_state_mut(&mut self) -> &mut StrategyState {
        &mut self.state
    }
}

fn validate_answers(kind: QuestionType, answers: &[String]) -> Result<Vec<ContentId>, DomainError> {
    if answers.is_empty() {
        return Err(DomainError::NoOptions);
    }
    if answers.len() > QuestionType::MAX_OPTIONS {
        return Err(DomainError::TooManyOptions {
            count: answers.len(),
            max: QuestionType::MAX_OPTIONS,
        });
    }
    if answers.len() > kind.max_options() {
        return Err(DomainError::TooManyOptionsForType {
            kind,
            count: answers.len(),
            max: kind.max_options(),
        });
    }
    let mut seen = HashSet::with_capacity(answers.len());
    for answer in answers {
        if !seen.insert(answer.as_str()) {
            return Err(DomainError::DuplicateOption(answer.clone()));
        }
    }
    Ok(answers.iter().map(|a| ContentId::of(a)).collect())
}
