//! End-to-end solving runs against a ground-truth oracle.

use quizsolver_application::{
    FeedbackResult, OracleError, ProgressNotifier, QuizOracle, QuizSolver, RunQuizInput,
    RunQuizUseCase, SolverConfig,
};
use quizsolver_domain::{
    AnsweredRound, DomainError, QuestionType, RawQuestion, ReportDetails, RoundSubmission,
    StrategyKind,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Oracle that hands out its questions in a fixed cycle and scores against a key
struct KeyedOracle {
    questions: Vec<(RawQuestion, Vec<bool>)>,
    cursor: usize,
}

impl KeyedOracle {
    /// `count` chooseOne questions with `options` answers; the correct answer
    /// of question `i` is option `i % options`
    fn choose_one(count: usize, options: usize) -> Self {
        let questions = (0..count)
            .map(|i| {
                let answers: Vec<String> = (0..options).map(|o| format!("q{i} option {o}")).collect();
                let key = (0..options).map(|o| o == i % options).collect();
                (
                    RawQuestion::new(format!("question {i}"), QuestionType::ChooseOne, answers),
                    key,
                )
            })
            .collect();
        Self {
            questions,
            cursor: 0,
        }
    }

    fn key(&self, text: &str) -> Option<&[bool]> {
        self.questions
            .iter()
            .find(|(q, _)| q.question == text)
            .map(|(_, key)| key.as_slice())
    }
}

impl QuizOracle for KeyedOracle {
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
        let questions = (0..size)
            .map(|i| self.questions[(self.cursor + i) % self.questions.len()].0.clone())
            .collect();
        self.cursor = (self.cursor + size) % self.questions.len();
        Ok(RoundSubmission { questions })
    }

    fn score(&self, round: &AnsweredRound) -> Result<f64, OracleError> {
        let mut correct = 0;
        for answered in &round.questions {
            let key = self
                .key(&answered.question)
                .ok_or_else(|| OracleError::UnknownQuestion(answered.question.clone()))?;
            if answered.answers.len() != key.len() {
                return Err(OracleError::AnswerCountMismatch {
                    question: answered.question.clone(),
                    given: answered.answers.len(),
                    expected: key.len(),
                });
            }
            if answered
                .answers
                .iter()
                .zip(key)
                .all(|(a, &k)| a.correct == Some(k))
            {
                correct += 1;
            }
        }
        Ok(correct as f64 / round.questions.len() as f64)
    }
}

fn resolver_triggers(details: &ReportDetails) -> u64 {
    match details {
        ReportDetails::Resolver { triggers, .. } => *triggers,
        other => panic!("not a resolver report: {other:?}"),
    }
}

fn assert_solutions_match_key(solver: &QuizSolver, oracle: &KeyedOracle) {
    for (_, question) in solver.registry().iter() {
        let key = oracle.key(question.text()).unwrap();
        let solution = question.solution().expect("question should be solved");
        let members = question.hypothesis(solution).members();
        let expected: Vec<usize> = key
            .iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(members, expected.as_slice(), "{}", question.text());
    }
}

#[test]
fn test_single_question_rounds_solve_by_elimination() {
    let mut oracle = KeyedOracle::choose_one(3, 4);
    let mut solver = QuizSolver::new(
        SolverConfig::default()
            .with_preferred_strategy(Some(StrategyKind::Alpha))
            .with_targeted_score(1.01)
            .with_max_epochs(100)
            .with_seed(Some(7)),
    );

    let mut zero_rounds: u64 = 0;
    let mut last = None;
    for _ in 0..100 {
        let round = oracle.next_round(1).unwrap();
        let answered = solver.answer(&round).unwrap();
        let score = oracle.score(&answered).unwrap();
        if score == 0.0 {
            zero_rounds += 1;
        }
        let result = solver.feedback(score, 1.0).unwrap();
        let finished = result.finished;
        last = Some(result);
        if finished {
            break;
        }
    }

    let result = last.unwrap();
    assert!(result.all_questions_solved);
    assert!(!result.targeted_score_reached);
    assert!(zero_rounds <= 9, "needed {zero_rounds} eliminations");
    assert_eq!(solver.registry().len(), 3);
    assert_solutions_match_key(&solver, &oracle);

    let snapshot = solver.snapshot();
    assert_eq!(resolver_triggers(&snapshot.loser.details), zero_rounds);
    assert!(snapshot.statistics.finished_at.is_some());
    assert_eq!(snapshot.progress, 1.0);
}

#[test]
fn test_resubmission_is_idempotent() {
    let mut oracle = KeyedOracle::choose_one(4, 3);
    let mut solver = QuizSolver::new(SolverConfig::default().with_seed(Some(3)));

    let round = oracle.next_round(4).unwrap();
    let first = solver.answer(&round).unwrap();
    solver.feedback(0.5, 1.0).unwrap();
    let second = solver.answer(&round).unwrap();

    assert_eq!(solver.registry().len(), 4);
    let uids = |r: &AnsweredRound| r.questions.iter().map(|q| q.uid.clone()).collect::<Vec<_>>();
    assert_eq!(uids(&first), uids(&second));
}

#[test]
fn test_rejected_feedback_leaves_state_untouched() {
    let mut oracle = KeyedOracle::choose_one(2, 3);
    let mut solver = QuizSolver::new(SolverConfig::default().with_seed(Some(5)));
    solver.answer(&oracle.next_round(2).unwrap()).unwrap();

    assert_eq!(
        solver.feedback(2.0, 1.0).unwrap_err(),
        DomainError::ScoreExceedsMax {
            score: 2.0,
            max_score: 1.0
        }
    );
    assert_eq!(solver.epoch(), 0);
    assert_eq!(solver.statistics().epochs, 0);
    assert_eq!(solver.registry().solved_count(), 0);
    assert!(solver.latest_result().is_none());

    solver.feedback(1.0, 1.0).unwrap();
    assert_eq!(solver.registry().solved_count(), 2);
}

#[test]
fn test_perfect_round_solves_every_question() {
    let mut oracle = KeyedOracle::choose_one(5, 4);
    let mut solver = QuizSolver::new(SolverConfig::default().with_seed(Some(9)));
    let answered = solver.answer(&oracle.next_round(5).unwrap()).unwrap();

    let result = solver.feedback(1.0, 1.0).unwrap();
    assert!(result.all_questions_solved);
    assert!(result.finished);

    let resubmitted = solver.answer(&oracle.next_round(5).unwrap()).unwrap();
    assert!(resubmitted.questions.iter().all(|q| q.is_solved));
    for (before, after) in answered.questions.iter().zip(&resubmitted.questions) {
        assert_eq!(before.answers, after.answers);
    }
}

#[test]
fn test_zero_round_rules_out_exposed_answers() {
    let mut oracle = KeyedOracle::choose_one(3, 2);
    let mut solver = QuizSolver::new(SolverConfig::default().with_seed(Some(13)));
    solver.answer(&oracle.next_round(3).unwrap()).unwrap();

    // Two options: ruling one out leaves the other as the solution
    let result = solver.feedback(0.0, 1.0).unwrap();
    assert!(result.all_questions_solved);
    let snapshot = solver.snapshot();
    assert_eq!(resolver_triggers(&snapshot.loser.details), 1);
    assert_eq!(resolver_triggers(&snapshot.winner.details), 0);
}

#[derive(Default)]
struct CountingProgress {
    started: AtomicUsize,
    answered: AtomicU64,
    feedbacks: AtomicU64,
    finished: AtomicU64,
}

impl ProgressNotifier for CountingProgress {
    fn on_start(&self, question_count: usize) {
        self.started.store(question_count, Ordering::SeqCst);
    }

    fn on_round_answered(&self, _epoch: u64, _questions: usize) {
        self.answered.fetch_add(1, Ordering::SeqCst);
    }

    fn on_feedback(&self, _result: &FeedbackResult, _solver: &QuizSolver) {
        self.feedbacks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_finish(&self, _result: &FeedbackResult, _solver: &QuizSolver) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_use_case_runs_until_finished() {
    let oracle = KeyedOracle::choose_one(6, 3);
    let mut solver = QuizSolver::new(
        SolverConfig::default()
            .with_preferred_strategy(Some(StrategyKind::Alpha))
            .with_max_epochs(2_000)
            .with_seed(Some(21)),
    );
    let progress = CountingProgress::default();
    let mut use_case = RunQuizUseCase::new(oracle);

    let output = use_case
        .execute_with_progress(&mut solver, RunQuizInput::new(2), &progress)
        .unwrap();

    assert!(output.result.finished);
    assert!(output.result.epoch <= 2_000);
    assert_eq!(progress.started.load(Ordering::SeqCst), 6);
    assert_eq!(progress.answered.load(Ordering::SeqCst), output.result.epoch);
    assert_eq!(progress.feedbacks.load(Ordering::SeqCst), output.result.epoch);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
    assert_eq!(output.snapshot.statistics.epochs, output.result.epoch);
    assert_eq!(output.snapshot.strategies.len(), 4);
}

#[test]
fn test_use_case_rejects_oversized_rounds() {
    let mut use_case = RunQuizUseCase::new(KeyedOracle::choose_one(2, 2));
    let mut solver = QuizSolver::new(SolverConfig::default().with_seed(Some(1)));
    let error = use_case
        .execute(&mut solver, RunQuizInput::new(3))
        .unwrap_err();
    assert!(error.to_string().contains("only 2 available"));
    assert!(solver.registry().is_empty());
}
