//! Ordered course outline: chapters → sections → subsections.
//!
//! The database layer loads flat rows and hands them to
//! [`CourseOutline::assemble`], which nests them, sorts every level by
//! `(sort_order, id)`, and rejects rows whose parent is not part of the
//! course. List order in the assembled outline *is* prerequisite order; the
//! resolver and the enforcer never re-sort.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::types::DbId;

/// Pass threshold used when a subsection does not override it.
pub const DEFAULT_QUIZ_PASS_SCORE: i16 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSubsection {
    pub id: DbId,
    pub section_id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub quiz_required: bool,
    /// Integer percentage, 0..=100.
    pub quiz_pass_score: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection {
    pub id: DbId,
    pub chapter_id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub sort_order: i32,
    pub subsections: Vec<OutlineSubsection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineChapter {
    pub id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub sections: Vec<OutlineSection>,
}

impl OutlineChapter {
    /// Number of subsections across all sections of this chapter.
    pub fn subsection_count(&self) -> usize {
        self.sections.iter().map(|s| s.subsections.len()).sum()
    }
}

/// Indices of a subsection inside a [`CourseOutline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    pub chapter: usize,
    pub section: usize,
    pub subsection: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOutline {
    pub course_id: DbId,
    pub chapters: Vec<OutlineChapter>,
}

impl CourseOutline {
    /// Nest flat chapter/section/subsection rows into an ordered outline.
    ///
    /// The `sections` / `subsections` fields of the passed-in chapters and
    /// sections are ignored; children are attached from the flat lists.
    ///
    /// Returns [`CoreError::CourseStructure`] when a section names a chapter
    /// that is not in `chapters`, or a subsection names a section that is
    /// not in `sections`.
    pub fn assemble(
        course_id: DbId,
        mut chapters: Vec<OutlineChapter>,
        mut sections: Vec<OutlineSection>,
        mut subsections: Vec<OutlineSubsection>,
    ) -> Result<Self, CoreError> {
        chapters.sort_by_key(|c| (c.sort_order, c.id));
        sections.sort_by_key(|s| (s.sort_order, s.id));
        subsections.sort_by_key(|s| (s.sort_order, s.id));

        let mut children: HashMap<DbId, Vec<OutlineSubsection>> = HashMap::new();
        let section_ids: HashSet<DbId> = sections.iter().map(|s| s.id).collect();
        for sub in subsections {
            if !section_ids.contains(&sub.section_id) {
                return Err(CoreError::CourseStructure(format!(
                    "subsection {} references section {} which is not part of course {course_id}",
                    sub.id, sub.section_id
                )));
            }
            children.entry(sub.section_id).or_default().push(sub);
        }

        let chapter_index: HashMap<DbId, usize> = chapters
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        for chapter in &mut chapters {
            chapter.sections.clear();
        }
        for mut section in sections {
            let Some(&idx) = chapter_index.get(&section.chapter_id) else {
                return Err(CoreError::CourseStructure(format!(
                    "section {} references chapter {} which is not part of course {course_id}",
                    section.id, section.chapter_id
                )));
            };
            section.subsections = children.remove(&section.id).unwrap_or_default();
            chapters[idx].sections.push(section);
        }

        Ok(Self {
            course_id,
            chapters,
        })
    }

    /// Locate a subsection by id.
    pub fn position_of(&self, subsection_id: DbId) -> Option<NodePosition> {
        self.chapters.iter().enumerate().find_map(|(ci, chapter)| {
            chapter.sections.iter().enumerate().find_map(|(si, section)| {
                section
                    .subsections
                    .iter()
                    .position(|sub| sub.id == subsection_id)
                    .map(|ki| NodePosition {
                        chapter: ci,
                        section: si,
                        subsection: ki,
                    })
            })
        })
    }

    pub fn subsection(&self, subsection_id: DbId) -> Option<&OutlineSubsection> {
        self.position_of(subsection_id).map(|p| self.at(p))
    }

    pub fn section_of(&self, subsection_id: DbId) -> Option<&OutlineSection> {
        self.position_of(subsection_id)
            .map(|p| &self.chapters[p.chapter].sections[p.section])
    }

    /// The subsection at a position previously returned by
    /// [`CourseOutline::position_of`].
    pub fn at(&self, pos: NodePosition) -> &OutlineSubsection {
        &self.chapters[pos.chapter].sections[pos.section].subsections[pos.subsection]
    }

    /// All subsections in prerequisite order.
    pub fn subsections(&self) -> impl Iterator<Item = &OutlineSubsection> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .flat_map(|s| s.subsections.iter())
    }

    pub fn subsection_count(&self) -> usize {
        self.subsections().count()
    }

    /// Previous and next subsection ids across the whole course.
    ///
    /// `None` at either end of the course. Returns `(None, None)` when the
    /// id is not part of the outline.
    pub fn neighbours(&self, subsection_id: DbId) -> (Option<DbId>, Option<DbId>) {
        let ids: Vec<DbId> = self.subsections().map(|s| s.id).collect();
        match ids.iter().position(|&id| id == subsection_id) {
            Some(i) => (
                i.checked_sub(1).map(|p| ids[p]),
                ids.get(i + 1).copied(),
            ),
            None => (None, None),
        }
    }
}
