//! Course content tree rows: `courses`, `chapters`, `sections`, `subsections`.

use academy_core::error::CoreError;
use academy_core::outline::{CourseOutline, OutlineChapter, OutlineSection, OutlineSubsection};
use academy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub chapter_id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub sort_order: i32,
}

/// Subsection row without its body, used to build the outline.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubsectionHeader {
    pub id: DbId,
    pub section_id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub quiz_required: bool,
    pub quiz_pass_score: i16,
}

/// A full row from the `subsections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subsection {
    pub id: DbId,
    pub section_id: DbId,
    pub title: String,
    pub body: String,
    pub sort_order: i32,
    pub quiz_required: bool,
    pub quiz_pass_score: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Flat rows of one course, ready to be assembled into an outline.
#[derive(Debug, Clone, Default)]
pub struct CourseRows {
    pub chapters: Vec<Chapter>,
    pub sections: Vec<Section>,
    pub subsections: Vec<SubsectionHeader>,
}

impl CourseRows {
    pub fn into_outline(self, course_id: DbId) -> Result<CourseOutline, CoreError> {
        CourseOutline::assemble(
            course_id,
            self.chapters.into_iter().map(Into::into).collect(),
            self.sections.into_iter().map(Into::into).collect(),
            self.subsections.into_iter().map(Into::into).collect(),
        )
    }
}

impl From<Chapter> for OutlineChapter {
    fn from(row: Chapter) -> Self {
        Self {
            id: row.id,
            title: row.title,
            sort_order: row.sort_order,
            sections: Vec::new(),
        }
    }
}

impl From<Section> for OutlineSection {
    fn from(row: Section) -> Self {
        Self {
            id: row.id,
            chapter_id: row.chapter_id,
            title: row.title,
            subtitle: row.subtitle,
            sort_order: row.sort_order,
            subsections: Vec::new(),
        }
    }
}

impl From<SubsectionHeader> for OutlineSubsection {
    fn from(row: SubsectionHeader) -> Self {
        Self {
            id: row.id,
            section_id: row.section_id,
            title: row.title,
            sort_order: row.sort_order,
            quiz_required: row.quiz_required,
            quiz_pass_score: row.quiz_pass_score,
        }
    }
}
