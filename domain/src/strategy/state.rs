//! Per-question strategy records
//!
//! Each answering strategy keeps a fixed record on every question, indexed
//! by its [`Polarity`]. A strategy only reads and writes its own record.

use serde::{Deserialize, Serialize};

/// Which direction of score movement a strategy rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Rounds scoring above the running average reinforce the exposed guesses
    Positive,
    /// Rounds scoring below the running average reinforce the exposed guesses
    Negative,
}

impl Polarity {
    fn index(self) -> usize {
        match self {
            Polarity::Positive => 0,
            Polarity::Negative => 1,
        }
    }
}

/// A tracked hypothesis with its confidence counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Guess {
    pub hypothesis: usize,
    pub counter: i64,
}

impl Guess {
    pub fn new(hypothesis: usize) -> Self {
        Self {
            hypothesis,
            counter: 1,
        }
    }
}

/// The two guesses a Beta strategy compares against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Branches {
    pub branch1: Guess,
    pub branch2: Guess,
}

/// All strategy records attached to one question
#[derive(Debug, Clone, Default)]
pub struct StrategyState {
    alpha: [Guess; 2],
    beta: [Branches; 2],
}

impl StrategyState {
    pub fn alpha(&self, polarity: Polarity) -> &Guess {
        &self.alpha[polarity.index()]
    }

    pub fn alpha_mut(&mut self, polarity: Polarity) -> &mut Guess {
        &mut self.alpha[polarity.index()]
    }

    pub fn beta(&self, polarity: Polarity) -> &Branches {
        &self.beta[polarity.index()]
    }

    pub fn beta_mut(&mut self, polarity: Polarity) -> &mut Branches {
        &mut self.beta[polarity.index()]
    }
}
