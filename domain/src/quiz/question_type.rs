//! Question type tag

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which answer subsets a question admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    /// Exactly one answer is correct
    #[default]
    #[serde(rename = "chooseOne")]
    ChooseOne,
    /// At least one answer is correct
    #[serde(rename = "chooseOneOrMore")]
    ChooseOneOrMore,
    /// Any subset of answers, including none, may be correct
    #[serde(rename = "chooseZeroOrMore")]
    ChooseZeroOrMore,
}

impl QuestionType {
    /// Upper bound on answers for any question
    pub const MAX_OPTIONS: usize = 65_535;

    /// Upper bound on answers for multi-select questions, whose hypothesis
    /// count grows as 2^n
    pub const MAX_MULTI_SELECT_OPTIONS: usize = 16;

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ChooseOne => "chooseOne",
            QuestionType::ChooseOneOrMore => "chooseOneOrMore",
            QuestionType::ChooseZeroOrMore => "chooseZeroOrMore",
        }
    }

    pub fn is_multi_select(&self) -> bool {
        !matches!(self, QuestionType::ChooseOne)
    }

    /// Maximum number of answers accepted for this type
    pub fn max_options(&self) -> usize {
        if self.is_multi_select() {
            Self::MAX_MULTI_SELECT_OPTIONS
        } else {
            Self::MAX_OPTIONS
        }
    }

    /// Parse an optional tag; a missing tag means [`QuestionType::ChooseOne`]
    pub fn from_tag(tag: Option<&str>) -> Result<Self, DomainError> {
        match tag {
            None => Ok(QuestionType::default()),
            Some(tag) => tag.parse(),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chooseOne" => Ok(QuestionType::ChooseOne),
            "chooseOneOrMore" => Ok(QuestionType::ChooseOneOrMore),
            "chooseZeroOrMore" => Ok(QuestionType::ChooseZeroOrMore),
            other => Err(DomainError::UnknownQuestionType(other.to_string())),
        }
    }
}
