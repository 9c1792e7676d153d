//! Quiz oracles
//!
//! [`SyntheticQuiz`] generates a quiz with a known answer key and scores
//! answered rounds against it, implementing the
//! [`QuizOracle`](quizsolver_application::QuizOracle) port.

mod synthetic;

pub use synthetic::{GeneratorError, GeneratorSettings, SyntheticQuiz};
