//! Server-side quiz grading.
//!
//! A submission is either a set of `(question_id, option_id)` pairs or a
//! legacy pre-computed score. Pairs are graded against the authored correct
//! options of the subsection; the denominator is always the number of
//! authored questions, so unanswered questions count as wrong.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::progress::progress_pct;
use crate::types::DbId;

/// Minimum number of options an authored question must carry.
pub const MIN_OPTIONS_PER_QUESTION: usize = 2;

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: DbId,
    pub option_id: DbId,
}

/// Accepted shapes of the `answers` field.
///
/// `[{"question_id": 1, "option_id": 3}, ...]` or `{"1": 3, ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerPayload {
    List(Vec<SubmittedAnswer>),
    Map(HashMap<String, DbId>),
}

/// Request body of a quiz submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizSubmission {
    pub answers: Option<AnswerPayload>,
    /// Legacy clients post a pre-computed percentage instead of answers.
    pub score: Option<f64>,
}

/// A normalized submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Answers(HashSet<SubmittedAnswer>),
    LegacyScore(u8),
}

impl TryFrom<QuizSubmission> for Submission {
    type Error = CoreError;

    /// `answers` wins when both fields are present. Neither present, or two
    /// different options for one question, is a validation error.
    fn try_from(body: QuizSubmission) -> Result<Self, Self::Error> {
        let answers: HashSet<SubmittedAnswer> = match (body.answers, body.score) {
            (Some(AnswerPayload::List(list)), _) => list.into_iter().collect(),
            (Some(AnswerPayload::Map(map)), _) => map
                .into_iter()
                .map(|(key, option_id)| {
                    key.trim()
                        .parse::<DbId>()
                        .map(|question_id| SubmittedAnswer {
                            question_id,
                            option_id,
                        })
                        .map_err(|_| {
                            CoreError::Validation(format!("answer key '{key}' is not a question id"))
                        })
                })
                .collect::<Result<HashSet<_>, _>>()?,
            (None, Some(score)) => {
                if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                    return Err(CoreError::Validation(format!(
                        "score must be between 0 and 100, got {score}"
                    )));
                }
                return Ok(Self::LegacyScore(score.round() as u8));
            }
            (None, None) => {
                return Err(CoreError::Validation(
                    "either 'answers' or 'score' is required".to_string(),
                ))
            }
        };

        let mut ambiguous: Vec<DbId> = chosen_options(&answers)
            .into_iter()
            .filter_map(|(question_id, chosen)| chosen.is_none().then_some(question_id))
            .collect();
        if !ambiguous.is_empty() {
            ambiguous.sort_unstable();
            return Err(CoreError::Validation(format!(
                "only one option may be chosen per question, got several for {ambiguous:?}"
            )));
        }
        Ok(Self::Answers(answers))
    }
}

/// The single option chosen for each answered question; `None` when more
/// than one distinct option was submitted for it.
fn chosen_options(answers: &HashSet<SubmittedAnswer>) -> HashMap<DbId, Option<DbId>> {
    let mut chosen = HashMap::with_capacity(answers.len());
    for answer in answers {
        chosen
            .entry(answer.question_id)
            .and_modify(|option: &mut Option<DbId>| *option = None)
            .or_insert(Some(answer.option_id));
    }
    chosen
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

/// Answer key of one authored question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    pub question_id: DbId,
    pub correct_option_ids: HashSet<DbId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeOutcome {
    pub score: u8,
    pub passed: bool,
    /// `None` for legacy score submissions.
    pub correct: Option<usize>,
    pub total: Option<usize>,
}

/// Grade an answer set against the subsection's answer keys.
///
/// A question counts as correct when exactly one option was submitted for
/// it and that option is one of its correct options. Pairs for questions
/// outside `keys` are ignored.
/// Returns [`CoreError::QuizNotConfigured`] when `keys` is empty.
pub fn grade(
    subsection_id: DbId,
    keys: &[AnswerKey],
    answers: &HashSet<SubmittedAnswer>,
    pass_score: i16,
) -> Result<GradeOutcome, CoreError> {
    if keys.is_empty() {
        return Err(CoreError::QuizNotConfigured { subsection_id });
    }

    let chosen = chosen_options(answers);
    let correct = keys
        .iter()
        .filter(|key| match chosen.get(&key.question_id) {
            Some(Some(option_id)) => key.correct_option_ids.contains(option_id),
            _ => false,
        })
        .count();
    let score = progress_pct(correct, keys.len());

    Ok(GradeOutcome {
        score,
        passed: i16::from(score) >= pass_score,
        correct: Some(correct),
        total: Some(keys.len()),
    })
}

/// Grade any submission shape. Legacy scores are taken as-is and do not
/// require authored questions.
pub fn evaluate(
    subsection_id: DbId,
    keys: &[AnswerKey],
    submission: &Submission,
    pass_score: i16,
) -> Result<GradeOutcome, CoreError> {
    match submission {
        Submission::Answers(answers) => grade(subsection_id, keys, answers, pass_score),
        Submission::LegacyScore(score) => Ok(GradeOutcome {
            score: *score,
            passed: i16::from(*score) >= pass_score,
            correct: None,
            total: None,
        }),
    }
}

// ---------------------------------------------------------------------------
// Authoring rules
// ---------------------------------------------------------------------------

/// Borrowed view of one question in an authoring request.
#[derive(Debug, Clone)]
pub struct QuestionDraft<'a> {
    pub prompt: &'a str,
    /// `(text, is_correct)` per option.
    pub options: Vec<(&'a str, bool)>,
}

/// Check a replacement question set before it is written.
///
/// At least one question; every question has a non-blank prompt, at least
/// [`MIN_OPTIONS_PER_QUESTION`] non-blank options, and at least one correct
/// option.
pub fn validate_question_set(drafts: &[QuestionDraft<'_>]) -> Result<(), CoreError> {
    if drafts.is_empty() {
        return Err(CoreError::Validation(
            "a quiz must have at least one question".to_string(),
        ));
    }
    for (i, draft) in drafts.iter().enumerate() {
        let n = i + 1;
        if draft.prompt.trim().is_empty() {
            return Err(CoreError::Validation(format!("question {n} has an empty prompt")));
        }
        if draft.options.len() < MIN_OPTIONS_PER_QUESTION {
            return Err(CoreError::Validation(format!(
                "question {n} needs at least {MIN_OPTIONS_PER_QUESTION} options"
            )));
        }
        if draft.options.iter().any(|(text, _)| text.trim().is_empty()) {
            return Err(CoreError::Validation(format!("question {n} has an empty option")));
        }
        if !draft.options.iter().any(|(_, correct)| *correct) {
            return Err(CoreError::Validation(format!(
                "question {n} has no correct option"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn key(question_id: DbId, correct: &[DbId]) -> AnswerKey {
        AnswerKey {
            question_id,
            correct_option_ids: correct.iter().copied().collect(),
        }
    }

    fn answers(pairs: &[(DbId, DbId)]) -> HashSet<SubmittedAnswer> {
        pairs
            .iter()
            .map(|&(question_id, option_id)| SubmittedAnswer {
                question_id,
                option_id,
            })
            .collect()
    }

    fn parse(json: &str) -> Result<Submission, CoreError> {
        let body: QuizSubmission = serde_json::from_str(json).unwrap();
        Submission::try_from(body)
    }

    // -----------------------------------------------------------------------
    // Payload parsing
    // -----------------------------------------------------------------------

    #[test]
    fn list_and_map_forms_are_equivalent() {
        let list = parse(r#"{"answers": [{"question_id": 1, "option_id": 11}, {"question_id": 2, "option_id": 21}]}"#)
            .unwrap();
        let map = parse(r#"{"answers": {"1": 11, "2": 21}}"#).unwrap();
        assert_eq!(list, map);
    }

    #[test]
    fn duplicate_pairs_collapse() {
        let parsed = parse(r#"{"answers": [{"question_id": 1, "option_id": 11}, {"question_id": 1, "option_id": 11}]}"#)
            .unwrap();
        assert_matches!(parsed, Submission::Answers(set) if set.len() == 1);
    }

    #[test]
    fn two_options_for_one_question_are_rejected() {
        assert_matches!(
            parse(r#"{"answers": [{"question_id": 1, "option_id": 11}, {"question_id": 1, "option_id": 12}]}"#),
            Err(CoreError::Validation(msg)) if msg.contains("[1]")
        );
        assert_matches!(
            parse(r#"{"answers": {"1": 11, " 1": 12}}"#),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn answers_take_precedence_over_score() {
        let parsed = parse(r#"{"answers": {"1": 11}, "score": 100}"#).unwrap();
        assert_matches!(parsed, Submission::Answers(_));
    }

    #[test]
    fn legacy_score_is_range_checked() {
        assert_eq!(parse(r#"{"score": 80}"#).unwrap(), Submission::LegacyScore(80));
        assert_eq!(parse(r#"{"score": 79.6}"#).unwrap(), Submission::LegacyScore(80));
        assert_matches!(parse(r#"{"score": 101}"#), Err(CoreError::Validation(_)));
        assert_matches!(parse(r#"{"score": -1}"#), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_body_is_rejected() {
        assert_matches!(parse("{}"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn non_numeric_map_key_is_rejected() {
        assert_matches!(
            parse(r#"{"answers": {"first": 11}}"#),
            Err(CoreError::Validation(msg)) if msg.contains("first")
        );
    }

    // -----------------------------------------------------------------------
    // Grading
    // -----------------------------------------------------------------------

    #[test]
    fn no_questions_is_not_configured() {
        let result = grade(7, &[], &answers(&[(1, 11)]), 70);
        assert_matches!(result, Err(CoreError::QuizNotConfigured { subsection_id: 7 }));
    }

    #[test]
    fn score_uses_all_authored_questions_as_denominator() {
        let keys = [key(1, &[11]), key(2, &[21]), key(3, &[31])];
        let outcome = grade(7, &keys, &answers(&[(1, 11), (2, 21)]), 70).unwrap();
        assert_eq!(outcome.score, 67);
        assert!(!outcome.passed);
        assert_eq!(outcome.correct, Some(2));
        assert_eq!(outcome.total, Some(3));
    }

    #[test]
    fn foreign_questions_are_ignored() {
        let keys = [key(1, &[11]), key(2, &[21])];
        let outcome = grade(7, &keys, &answers(&[(1, 11), (99, 991), (98, 981)]), 50).unwrap();
        assert_eq!(outcome.score, 50);
        assert!(outcome.passed);
    }

    #[test]
    fn option_of_another_question_does_not_count() {
        let keys = [key(1, &[11]), key(2, &[21])];
        let outcome = grade(7, &keys, &answers(&[(1, 21)]), 70).unwrap();
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn several_options_for_one_question_count_as_wrong() {
        let keys = [key(1, &[11, 12]), key(2, &[21])];
        let outcome = grade(7, &keys, &answers(&[(1, 11), (1, 12), (2, 21)]), 70).unwrap();
        assert_eq!(outcome.score, 50);
        assert_eq!(outcome.correct, Some(1));
    }

    #[test]
    fn choosing_every_option_does_not_pass() {
        let keys = [key(1, &[12]), key(2, &[23])];
        let every = answers(&[(1, 11), (1, 12), (1, 13), (2, 21), (2, 22), (2, 23)]);
        let outcome = grade(7, &keys, &every, 70).unwrap();
        assert_eq!(outcome.score, 0);
        assert!(!outcome.passed);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let keys: Vec<_> = (1..=10).map(|q| key(q, &[q * 10])).collect();
        let seven: Vec<_> = (1..=7).map(|q| (q, q * 10)).collect();
        let outcome = grade(7, &keys, &answers(&seven), 70).unwrap();
        assert_eq!(outcome.score, 70);
        assert!(outcome.passed);
    }

    #[test]
    fn grading_is_deterministic() {
        let keys = [key(1, &[11]), key(2, &[21]), key(3, &[31])];
        let set = answers(&[(3, 31), (1, 12), (2, 21)]);
        let first = grade(7, &keys, &set, 60).unwrap();
        for _ in 0..10 {
            assert_eq!(grade(7, &keys, &set, 60).unwrap(), first);
        }
    }

    #[test]
    fn legacy_score_bypasses_question_lookup() {
        let outcome = evaluate(7, &[], &Submission::LegacyScore(75), 70).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.score, 75);
        assert_eq!(outcome.correct, None);

        let outcome = evaluate(7, &[], &Submission::LegacyScore(69), 70).unwrap();
        assert!(!outcome.passed);
    }

    // -----------------------------------------------------------------------
    // Authoring
    // -----------------------------------------------------------------------

    fn draft<'a>(prompt: &'a str, options: &[(&'a str, bool)]) -> QuestionDraft<'a> {
        QuestionDraft {
            prompt,
            options: options.to_vec(),
        }
    }

    #[test]
    fn valid_question_set_passes() {
        let drafts = [draft("2 + 2?", &[("3", false), ("4", true)])];
        assert!(validate_question_set(&drafts).is_ok());
    }

    #[test]
    fn authoring_rules_are_enforced() {
        assert_matches!(validate_question_set(&[]), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_question_set(&[draft("  ", &[("a", true), ("b", false)])]),
            Err(CoreError::Validation(msg)) if msg.contains("prompt")
        );
        assert_matches!(
            validate_question_set(&[draft("q", &[("a", true)])]),
            Err(CoreError::Validation(msg)) if msg.contains("at least 2")
        );
        assert_matches!(
            validate_question_set(&[draft("q", &[("a", false), ("b", false)])]),
            Err(CoreError::Validation(msg)) if msg.contains("no correct")
        );
        assert_matches!(
            validate_question_set(&[draft("q", &[("a", true), ("", false)])]),
            Err(CoreError::Validation(msg)) if msg.contains("empty option")
        );
    }
}
