//! Per-node prerequisite guard.
//!
//! Used by the endpoints that act on a single subsection. Unlike the bulk
//! resolver it stops at the first unmet prerequisite and reports *which*
//! one, so the caller can return a specific denial.

use crate::error::{AccessDenial, CoreError};
use crate::outline::CourseOutline;
use crate::progress::ProgressSnapshot;
use crate::types::DbId;

/// What the caller intends to do with the target subsection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessIntent {
    /// Read the subsection body or attempt its quiz.
    View,
    /// Mark the subsection complete. Additionally requires the target's own
    /// mandatory quiz to be passed.
    Complete,
}

/// Check every prerequisite of `subsection_id`, in order, failing closed:
///
/// 1. entitlement,
/// 2. all earlier chapters complete (and non-empty),
/// 3. all earlier sections of the same chapter complete,
/// 4. all earlier subsections of the same section done,
/// 5. for [`AccessIntent::Complete`], the target's own quiz passed.
///
/// Returns [`CoreError::NotFound`] when the subsection is not part of the
/// outline, and [`CoreError::AccessDenied`] for the first unmet check.
pub fn check_subsection_access(
    outline: &CourseOutline,
    progress: &ProgressSnapshot,
    subscribed: bool,
    subsection_id: DbId,
    intent: AccessIntent,
) -> Result<(), CoreError> {
    let pos = outline
        .position_of(subsection_id)
        .ok_or(CoreError::NotFound {
            entity: "Subsection",
            id: subsection_id,
        })?;

    if !subscribed {
        return Err(AccessDenial::NotSubscribed.into());
    }

    let chapters = &outline.chapters[..pos.chapter];
    if !chapters.iter().all(|c| progress.is_chapter_complete(c)) {
        return Err(AccessDenial::PreviousChaptersIncomplete.into());
    }

    let chapter = &outline.chapters[pos.chapter];
    let sections = &chapter.sections[..pos.section];
    if !sections.iter().all(|s| progress.is_section_complete(s)) {
        return Err(AccessDenial::PreviousSectionsIncomplete.into());
    }

    let section = &chapter.sections[pos.section];
    let siblings = &section.subsections[..pos.subsection];
    if !siblings.iter().all(|s| progress.is_done(s)) {
        return Err(AccessDenial::PreviousLessonsIncomplete.into());
    }

    if intent == AccessIntent::Complete {
        let target = outline.at(pos);
        if target.quiz_required && !progress.quiz_outcome(target.id).is_passed() {
            return Err(AccessDenial::QuizRequiredNotPassed.into());
        }
    }

    Ok(())
}
