//! Per-customer progress snapshot and the completeness predicates built on it.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::outline::{OutlineChapter, OutlineSection, OutlineSubsection};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Quiz outcome
// ---------------------------------------------------------------------------

/// Database values of `customer_quiz_status.status`.
pub const QUIZ_STATUS_NOT_STARTED: &str = "not_started";
pub const QUIZ_STATUS_PASSED: &str = "passed";
pub const QUIZ_STATUS_FAILED: &str = "failed";

/// Latest quiz attempt outcome for one (customer, subsection) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizOutcome {
    #[default]
    NotStarted,
    Passed(u8),
    Failed(u8),
}

impl QuizOutcome {
    /// Build an outcome from a grading result.
    pub fn graded(score: u8, passed: bool) -> Self {
        if passed {
            Self::Passed(score)
        } else {
            Self::Failed(score)
        }
    }

    /// Convert from the stored `(status, score)` columns.
    pub fn from_row(status: &str, score: Option<i16>) -> Result<Self, CoreError> {
        let checked_score = || -> Result<u8, CoreError> {
            score
                .and_then(|s| u8::try_from(s).ok())
                .filter(|s| *s <= 100)
                .ok_or_else(|| {
                    CoreError::Internal(format!("quiz status '{status}' has invalid score {score:?}"))
                })
        };
        match status {
            QUIZ_STATUS_NOT_STARTED => Ok(Self::NotStarted),
            QUIZ_STATUS_PASSED => Ok(Self::Passed(checked_score()?)),
            QUIZ_STATUS_FAILED => Ok(Self::Failed(checked_score()?)),
            other => Err(CoreError::Internal(format!("unknown quiz status '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => QUIZ_STATUS_NOT_STARTED,
            Self::Passed(_) => QUIZ_STATUS_PASSED,
            Self::Failed(_) => QUIZ_STATUS_FAILED,
        }
    }

    pub fn score(&self) -> Option<u8> {
        match self {
            Self::NotStarted => None,
            Self::Passed(s) | Self::Failed(s) => Some(*s),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Completion records and quiz outcomes of one customer within one course.
#[derive(Debug, Clone, Default)]
pub struct ProgressSnapshot {
    completed: HashSet<DbId>,
    quizzes: HashMap<DbId, QuizOutcome>,
}

impl ProgressSnapshot {
    pub fn new(
        completed: impl IntoIterator<Item = DbId>,
        quizzes: impl IntoIterator<Item = (DbId, QuizOutcome)>,
    ) -> Self {
        Self {
            completed: completed.into_iter().collect(),
            quizzes: quizzes.into_iter().collect(),
        }
    }

    pub fn mark_completed(&mut self, subsection_id: DbId) {
        self.completed.insert(subsection_id);
    }

    pub fn record_quiz(&mut self, subsection_id: DbId, outcome: QuizOutcome) {
        self.quizzes.insert(subsection_id, outcome);
    }

    /// Whether a completion record exists (ignores quiz gating).
    pub fn has_completion(&self, subsection_id: DbId) -> bool {
        self.completed.contains(&subsection_id)
    }

    pub fn quiz_outcome(&self, subsection_id: DbId) -> QuizOutcome {
        self.quizzes
            .get(&subsection_id)
            .copied()
            .unwrap_or_default()
    }

    /// Completed in the gating sense: a completion record exists and, when
    /// the subsection is quiz-gated, its quiz is passed.
    pub fn is_done(&self, sub: &OutlineSubsection) -> bool {
        self.has_completion(sub.id) && (!sub.quiz_required || self.quiz_outcome(sub.id).is_passed())
    }

    /// A section with no subsections is never complete.
    pub fn is_section_complete(&self, section: &OutlineSection) -> bool {
        !section.subsections.is_empty() && section.subsections.iter().all(|s| self.is_done(s))
    }

    /// Every section complete and at least one subsection in the chapter.
    pub fn is_chapter_complete(&self, chapter: &OutlineChapter) -> bool {
        chapter.subsection_count() > 0
            && chapter.sections.iter().all(|s| self.is_section_complete(s))
    }

    /// Count of gating-complete subsections among `subs`.
    pub fn done_count<'a>(&self, subs: impl IntoIterator<Item = &'a OutlineSubsection>) -> usize {
        subs.into_iter().filter(|s| self.is_done(s)).count()
    }
}

/// `round(100 * done / total)`, 0 when `total` is 0.
pub fn progress_pct(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done as f64 / total as f64 * 100.0).round() as u8;
    pct.min(100)
}
