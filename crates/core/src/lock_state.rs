//! Lock-state resolution for a whole course outline.
//!
//! [`resolve`] walks the outline once, top to bottom, and assigns every
//! chapter, section and subsection a [`LockState`] for one customer:
//!
//! 1. The first chapter is open. Chapter `i` opens only when chapter `i-1`
//!    was open, is non-empty, and all of its sections are complete.
//! 2. Inside an open chapter the first section is open. Section `j` opens
//!    only when section `j-1` was open and is complete.
//! 3. Inside an open section subsections unlock as a chain: the chain stays
//!    open while each visited subsection is done (completed, and passed when
//!    quiz-gated). The first subsection that is not done is itself open but
//!    closes the chain for every later sibling.
//! 4. Locked chapters and sections still report all their children, each
//!    forced to the parent's lock state.

use serde::{Serialize, Serializer};

use crate::outline::{CourseOutline, OutlineChapter, OutlineSection, OutlineSubsection};
use crate::progress::{progress_pct, ProgressSnapshot};
use crate::types::DbId;

/// Availability of a node for one customer.
///
/// Serialized as the integer wire code (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Open,
    PrereqLocked,
    /// Whole course locked because the customer has no entitlement.
    SubscriptionLocked,
}

impl LockState {
    pub fn code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::PrereqLocked => 1,
            Self::SubscriptionLocked => 2,
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// State of a child given its parent's state and whether its own
    /// prerequisite chain is satisfied.
    fn nested(parent: LockState, chain_open: bool) -> LockState {
        match parent {
            Self::Open if chain_open => Self::Open,
            Self::Open => Self::PrereqLocked,
            other => other,
        }
    }
}

impl Serialize for LockState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// ---------------------------------------------------------------------------
// Resolved tree
// ---------------------------------------------------------------------------

/// Progress over a node's direct children: subsections for a section,
/// sections for a chapter. An empty node reports 0%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeMeta {
    pub progress: u8,
    pub completed: usize,
    pub total: usize,
}

impl NodeMeta {
    fn new(completed: usize, total: usize) -> Self {
        Self {
            progress: progress_pct(completed, total),
            completed,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSubsection {
    pub id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub locked: LockState,
    /// Gating-complete (record present and quiz passed when required).
    pub completed: bool,
    pub quiz_required: bool,
    pub quiz_pass_score: i16,
    pub quiz_status: &'static str,
    pub quiz_score: Option<u8>,
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSection {
    pub id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub sort_order: i32,
    pub locked: LockState,
    pub meta: NodeMeta,
    pub subsections: Vec<ResolvedSubsection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedChapter {
    pub id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub locked: LockState,
    pub meta: NodeMeta,
    pub sections: Vec<ResolvedSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMeta {
    pub total_chapters: usize,
    pub progress: u8,
}

/// Serializes as `{ "data": [...chapters], "meta": {...} }`.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCourse {
    #[serde(rename = "data")]
    pub chapters: Vec<ResolvedChapter>,
    pub meta: CourseMeta,
}

impl ResolvedCourse {
    /// Lock state of a subsection, if it is part of the course.
    pub fn subsection_state(&self, subsection_id: DbId) -> Option<LockState> {
        self.subsections()
            .find(|s| s.id == subsection_id)
            .map(|s| s.locked)
    }

    pub fn subsections(&self) -> impl Iterator<Item = &ResolvedSubsection> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .flat_map(|s| s.subsections.iter())
    }

    pub fn section(&self, section_id: DbId) -> Option<&ResolvedSection> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .find(|s| s.id == section_id)
    }

    /// True once every chapter is complete. Never true for an empty course.
    pub fn is_finished(&self) -> bool {
        self.meta.progress == 100
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Compute the lock state of every node of `outline` for one customer.
///
/// When `subscribed` is false every node is [`LockState::SubscriptionLocked`].
pub fn resolve(
    outline: &CourseOutline,
    progress: &ProgressSnapshot,
    subscribed: bool,
) -> ResolvedCourse {
    let mut chapter_open = true;
    let mut chapters = Vec::with_capacity(outline.chapters.len());

    for chapter in &outline.chapters {
        let state = if !subscribed {
            LockState::SubscriptionLocked
        } else {
            LockState::nested(LockState::Open, chapter_open)
        };
        chapters.push(resolve_chapter(chapter, progress, state));
        chapter_open = chapter_open && progress.is_chapter_complete(chapter);
    }

    let complete = outline
        .chapters
        .iter()
        .filter(|c| progress.is_chapter_complete(c))
        .count();

    ResolvedCourse {
        meta: CourseMeta {
            total_chapters: outline.chapters.len(),
            progress: progress_pct(complete, outline.chapters.len()),
        },
        chapters,
    }
}

fn resolve_chapter(
    chapter: &OutlineChapter,
    progress: &ProgressSnapshot,
    state: LockState,
) -> ResolvedChapter {
    let mut section_open = true;
    let mut sections = Vec::with_capacity(chapter.sections.len());

    for section in &chapter.sections {
        let section_state = LockState::nested(state, section_open);
        sections.push(resolve_section(section, progress, section_state));
        section_open = section_open && progress.is_section_complete(section);
    }

    let complete = chapter
        .sections
        .iter()
        .filter(|s| progress.is_section_complete(s))
        .count();
    ResolvedChapter {
        id: chapter.id,
        title: chapter.title.clone(),
        sort_order: chapter.sort_order,
        locked: state,
        meta: NodeMeta::new(complete, chapter.sections.len()),
        sections,
    }
}

fn resolve_section(
    section: &OutlineSection,
    progress: &ProgressSnapshot,
    state: LockState,
) -> ResolvedSection {
    let mut chain_open = true;
    let subsections = section
        .subsections
        .iter()
        .map(|sub| {
            let resolved = resolve_subsection(sub, progress, LockState::nested(state, chain_open));
            // Not done covers both a missing completion record and a
            // completed lesson whose mandatory quiz is not yet passed.
            if !resolved.completed {
                chain_open = false;
            }
            resolved
        })
        .collect();

    ResolvedSection {
        id: section.id,
        title: section.title.clone(),
        subtitle: section.subtitle.clone(),
        sort_order: section.sort_order,
        locked: state,
        meta: NodeMeta::new(
            progress.done_count(&section.subsections),
            section.subsections.len(),
        ),
        subsections,
    }
}

fn resolve_subsection(
    sub: &OutlineSubsection,
    progress: &ProgressSnapshot,
    state: LockState,
) -> ResolvedSubsection {
    let done = progress.is_done(sub);
    let quiz = progress.quiz_outcome(sub.id);
    ResolvedSubsection {
        id: sub.id,
        title: sub.title.clone(),
        sort_order: sub.sort_order,
        locked: state,
        completed: done,
        quiz_required: sub.quiz_required,
        quiz_pass_score: sub.quiz_pass_score,
        quiz_status: quiz.as_str(),
        quiz_score: quiz.score(),
        meta: NodeMeta::new(usize::from(done), 1),
    }
}
