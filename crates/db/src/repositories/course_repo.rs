//! Repository for the course content tree.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{
    Chapter, Course, CourseRows, Section, Subsection, SubsectionHeader,
};

const COURSE_COLUMNS: &str = "id, slug, title, is_active, created_at, updated_at";

const SUBSECTION_COLUMNS: &str = "\
    s.id, s.section_id, s.title, s.body, s.sort_order, s.quiz_required, \
    s.quiz_pass_score, s.created_at, s.updated_at";

/// Read-only access to courses and their chapter/section/subsection rows.
pub struct CourseRepo;

impl CourseRepo {
    /// Find an active course by slug. Inactive courses are not returned.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query =
            format!("SELECT {COURSE_COLUMNS} FROM courses WHERE slug = $1 AND is_active = true");
        sqlx::query_as::<_, Course>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Load every chapter, section and subsection header of a course,
    /// each list ordered by `(sort_order, id)`.
    pub async fn load_rows(pool: &PgPool, course_id: DbId) -> Result<CourseRows, sqlx::Error> {
        let chapters = sqlx::query_as::<_, Chapter>(
            "SELECT id, course_id, title, sort_order \
             FROM chapters \
             WHERE course_id = $1 \
             ORDER BY sort_order, id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        let sections = sqlx::query_as::<_, Section>(
            "SELECT sec.id, sec.chapter_id, sec.title, sec.subtitle, sec.sort_order \
             FROM sections sec \
             JOIN chapters ch ON ch.id = sec.chapter_id \
             WHERE ch.course_id = $1 \
             ORDER BY sec.sort_order, sec.id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        let subsections = sqlx::query_as::<_, SubsectionHeader>(
            "SELECT s.id, s.section_id, s.title, s.sort_order, s.quiz_required, s.quiz_pass_score \
             FROM subsections s \
             JOIN sections sec ON sec.id = s.section_id \
             JOIN chapters ch ON ch.id = sec.chapter_id \
             WHERE ch.course_id = $1 \
             ORDER BY s.sort_order, s.id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(CourseRows {
            chapters,
            sections,
            subsections,
        })
    }

    /// Find a subsection (with body) only if it belongs to the given course.
    pub async fn find_subsection_in_course(
        pool: &PgPool,
        course_id: DbId,
        subsection_id: DbId,
    ) -> Result<Option<Subsection>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBSECTION_COLUMNS} \
             FROM subsections s \
             JOIN sections sec ON sec.id = s.section_id \
             JOIN chapters ch ON ch.id = sec.chapter_id \
             WHERE ch.course_id = $1 AND s.id = $2"
        );
        sqlx::query_as::<_, Subsection>(&query)
            .bind(course_id)
            .bind(subsection_id)
            .fetch_optional(pool)
            .await
    }
}
