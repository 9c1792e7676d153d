//! Hypotheses about which answers of a question are correct

use serde::{Deserialize, Serialize};

/// Tri-state correctness of a hypothesis
///
/// Correctness only narrows: once `True` or `False`, it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    #[default]
    Unknown,
    True,
    False,
}

impl Correctness {
    pub fn as_option(&self) -> Option<bool> {
        match self {
            Correctness::Unknown => None,
            Correctness::True => Some(true),
            Correctness::False => Some(false),
        }
    }
}

/// A candidate set of correct answers (Entity owned by a question)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypothesis {
    members: Vec<usize>,
    correctness: Correctness,
}

impl Hypothesis {
    pub(crate) fn new(members: Vec<usize>) -> Self {
        Self {
            members,
            correctness: Correctness::Unknown,
        }
    }

    /// Answer positions this hypothesis claims to be correct
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn contains(&self, option: usize) -> bool {
        self.members.contains(&option)
    }

    pub fn correctness(&self) -> Correctness {
        self.correctness
    }

    pub fn is_unknown(&self) -> bool {
        self.correctness == Correctness::Unknown
    }

    pub fn is_true(&self) -> bool {
        self.correctness == Correctness::True
    }

    pub fn is_false(&self) -> bool {
        self.correctness == Correctness::False
    }

    pub(crate) fn set_correctness(&mut self, correctness: Correctness) {
        debug_assert!(self.is_unknown() || self.correctness == correctness);
        self.correctness = correctness;
    }
}
