//! Wire records for submitted and answered rounds

use super::question_type::QuestionType;
use serde::{Deserialize, Serialize};

/// One answer as submitted, without any correctness information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub answer: String,
}

impl RawAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// One question as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    /// Type tag; absent means `chooseOne`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub answers: Vec<RawAnswer>,
}

impl RawQuestion {
    pub fn new<I, S>(question: impl Into<String>, kind: QuestionType, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            kind: Some(kind.as_str().to_string()),
            answers: answers.into_iter().map(RawAnswer::new).collect(),
        }
    }
}

/// A round submitted for answering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSubmission {
    pub questions: Vec<RawQuestion>,
}

/// One answer of an answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredOption {
    pub answer: String,
    /// Whether the exposed hypothesis contains this answer
    pub correct: Option<bool>,
}

/// A question together with the hypothesis exposed for it this round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub uid: String,
    pub question: String,
    pub is_solved: bool,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub answers: Vec<AnsweredOption>,
}

/// The answered form of a [`RoundSubmission`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredRound {
    pub questions: Vec<AnsweredQuestion>,
}
