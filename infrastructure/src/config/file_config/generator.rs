//! Synthetic quiz configuration from TOML (`[generator]` section)

use crate::quiz::GeneratorSettings;
use quizsolver_domain::{ConfigIssue, ConfigIssueCode, QuestionType, Severity};
use serde::{Deserialize, Serialize};

/// Raw generator configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    /// Distinct questions in the quiz
    pub questions_count: usize,
    pub min_answers: usize,
    pub max_answers: usize,
    /// Relative weight of `chooseOne` questions
    pub probability_choose_one: f64,
    /// Relative weight of `chooseOneOrMore` questions
    pub probability_choose_one_or_more: f64,
    /// Relative weight of `chooseZeroOrMore` questions
    pub probability_choose_zero_or_more: f64,
    /// Share of the quiz asked per round
    pub round_fraction: f64,
    /// Seed for quiz generation; unset draws from entropy
    pub seed: Option<u64>,
}

impl Default for FileGeneratorConfig {
    fn default() -> Self {
        Self {
            questions_count: 200,
            min_answers: 4,
            max_answers: 4,
            probability_choose_one: 1.0,
            probability_choose_one_or_more: 0.0,
            probability_choose_zero_or_more: 0.0,
            round_fraction: 0.9,
            seed: None,
        }
    }
}

fn error(code: ConfigIssueCode, message: String) -> ConfigIssue {
    ConfigIssue {
        severity: Severity::Error,
        code,
        message,
    }
}

impl FileGeneratorConfig {
    /// Report every value the generator cannot work with
    pub fn check(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let out_of_range = |field: &str, value: String, expected: &str| {
            error(
                ConfigIssueCode::OutOfRange {
                    field: format!("generator.{field}"),
                    value: value.clone(),
                },
                format!("generator.{field}: {value} is out of range, expected {expected}"),
            )
        };

        if self.questions_count == 0 {
            issues.push(out_of_range("questions_count", "0".to_string(), "at least 1"));
        }
        if self.min_answers == 0 {
            issues.push(out_of_range("min_answers", "0".to_string(), "at least 1"));
        }
        if self.min_answers > self.max_answers {
            issues.push(error(
                ConfigIssueCode::InvalidConstraint {
                    field: "generator.min_answers".to_string(),
                },
                format!(
                    "generator.min_answers ({}) exceeds generator.max_answers ({})",
                    self.min_answers, self.max_answers
                ),
            ));
        }

        let multi_select = self.probability_choose_one_or_more > 0.0
            || self.probability_choose_zero_or_more > 0.0;
        let limit = if multi_select {
            QuestionType::MAX_MULTI_SELECT_OPTIONS
        } else {
            QuestionType::MAX_OPTIONS
        };
        if self.max_answers > limit {
            issues.push(out_of_range(
                "max_answers",
                self.max_answers.to_string(),
                &format!("at most {limit} for the configured question types"),
            ));
        }

        let weights = [
            self.probability_choose_one,
            self.probability_choose_one_or_more,
            self.probability_choose_zero_or_more,
        ];
        if weights.iter().any(|w| w.is_nan() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            issues.push(error(
                ConfigIssueCode::InvalidConstraint {
                    field: "generator.probability_*".to_string(),
                },
                "generator probabilities must be non-negative with a positive sum".to_string(),
            ));
        }

        if !(self.round_fraction > 0.0 && self.round_fraction <= 1.0) {
            issues.push(out_of_range(
                "round_fraction",
                self.round_fraction.to_string(),
                "a fraction in (0, 1]",
            ));
        }
        issues
    }

    pub fn to_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            questions_count: self.questions_count,
            min_answers: self.min_answers,
            max_answers: self.max_answers,
            probability_choose_one: self.probability_choose_one,
            probability_choose_one_or_more: self.probability_choose_one_or_more,
            probability_choose_zero_or_more: self.probability_choose_zero_or_more,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_default() {
        let config = FileGeneratorConfig::default();
        assert_eq!(config.questions_count, 200);
        assert_eq!((config.min_answers, config.max_answers), (4, 4));
        assert!(config.check().is_empty());
    }

    #[test]
    fn test_min_above_max_is_reported() {
        let config = FileGeneratorConfig {
            min_answers: 5,
            max_answers: 3,
            ..Default::default()
        };
        let issues = config.check();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidConstraint { .. }
        ));
    }

    #[test]
    fn test_multi_select_answer_limit() {
        let config = FileGeneratorConfig {
            max_answers: 20,
            probability_choose_zero_or_more: 0.5,
            ..Default::default()
        };
        assert_eq!(config.check().len(), 1);

        let single_select = FileGeneratorConfig {
            max_answers: 20,
            ..Default::default()
        };
        assert!(single_select.check().is_empty());
    }

    #[test]
    fn test_zero_probabilities_are_reported() {
        let config = FileGeneratorConfig {
            probability_choose_one: 0.0,
            ..Default::default()
        };
        assert_eq!(config.check().len(), 1);
    }

    #[test]
    fn test_round_fraction_bounds() {
        for fraction in [0.0, 1.5, f64::NAN] {
            let config = FileGeneratorConfig {
                round_fraction: fraction,
                ..Default::default()
            };
            assert_eq!(config.check().len(), 1, "{fraction}");
        }
    }
}
