//! Question registry
//!
//! Append-only store of every question seen during a run, addressed by a
//! dense [`QuestionRef`] and looked up by content identifier.

use super::question::Question;
use crate::core::content_id::ContentId;
use std::collections::HashMap;

/// Handle to a question stored in a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionRef(usize);

impl QuestionRef {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    questions: Vec<Question>,
    by_id: HashMap<ContentId, QuestionRef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn lookup(&self, id: &ContentId) -> Option<QuestionRef> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Store a question that is not registered yet.
    ///
    /// Returns the existing handle instead if a question with the same
    /// identifier is already stored.
    pub fn insert(&mut self, question: Question) -> (QuestionRef, bool) {
        if let Some(existing) = self.lookup(&question.id()) {
            return (existing, false);
        }
        let question_ref = QuestionRef(self.questions.len());
        self.by_id.insert(question.id(), question_ref);
        self.questions.push(question);
        (question_ref, true)
    }

    pub fn get(&self, question_ref: QuestionRef) -> &Question {
        &self.questions[question_ref.0]
    }

    pub fn get_mut(&mut self, question_ref: QuestionRef) -> &mut Question {
        &mut self.questions[question_ref.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionRef, &Question)> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| (QuestionRef(i), q))
    }

    pub fn solved_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_solved()).count()
    }

    pub fn all_solved(&self) -> bool {
        self.questions.iter().all(Question::is_solved)
    }

    /// Total number of answers across all questions
    pub fn answer_count(&self) -> usize {
        self.questions.iter().map(|q| q.options().len()).sum()
    }
}
