//! Answer space expansion
//!
//! Every hypothesis is a set of answer positions. Hypotheses are listed by
//! set size first, then lexicographically by position.

use super::question_type::QuestionType;

/// Every answer subset admitted by `kind` for a question with `option_count` answers
pub fn expand(kind: QuestionType, option_count: usize) -> Vec<Vec<usize>> {
    match kind {
        QuestionType::ChooseOne => (0..option_count).map(|i| vec![i]).collect(),
        QuestionType::ChooseOneOrMore => subsets(option_count, 1),
        QuestionType::ChooseZeroOrMore => subsets(option_count, 0),
    }
}

/// Number of hypotheses `expand` yields
pub fn hypothesis_count(kind: QuestionType, option_count: usize) -> usize {
    match kind {
        QuestionType::ChooseOne => option_count,
        QuestionType::ChooseOneOrMore => (1usize << option_count) - 1,
        QuestionType::ChooseZeroOrMore => 1usize << option_count,
    }
}

fn subsets(n: usize, min_size: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    for size in min_size..=n {
        push_combinations(n, size, &mut out);
    }
    out
}

fn push_combinations(n: usize, k: usize, out: &mut Vec<Vec<usize>>) {
    let mut positions: Vec<usize> = (0..k).collect();
    loop {
        out.push(positions.clone());
        let Some(i) = (0..k).rev().find(|&i| positions[i] != i + n - k) else {
            return;
        };
        positions[i] += 1;
        for j in i + 1..k {
            positions[j] = positions[j - 1] + 1;
        }
    }
}
