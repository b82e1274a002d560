//! Seed helpers shared by the repository integration tests.

#![allow(dead_code)]

use sqlx::PgPool;

pub async fn insert_course(pool: &PgPool, slug: &str, is_active: bool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO courses (slug, title, is_active) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(slug)
    .bind(format!("Course {slug}"))
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_chapter(pool: &PgPool, course_id: i64, sort_order: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO chapters (course_id, title, sort_order) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(course_id)
    .bind(format!("Chapter {sort_order}"))
    .bind(sort_order)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_section(pool: &PgPool, chapter_id: i64, sort_order: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO sections (chapter_id, title, sort_order) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(chapter_id)
    .bind(format!("Section {sort_order}"))
    .bind(sort_order)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_subsection(
    pool: &PgPool,
    section_id: i64,
    sort_order: i32,
    quiz_required: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO subsections (section_id, title, body, sort_order, quiz_required) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(section_id)
    .bind(format!("Lesson {sort_order}"))
    .bind("Lesson body")
    .bind(sort_order)
    .bind(quiz_required)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// One course, one chapter, one section, two subsections (second quiz-gated).
/// Returns `(course_id, first_subsection_id, quiz_subsection_id)`.
pub async fn seed_small_course(pool: &PgPool) -> (i64, i64, i64) {
    let course = insert_course(pool, "rust-101", true).await;
    let chapter = insert_chapter(pool, course, 1).await;
    let section = insert_section(pool, chapter, 1).await;
    let first = insert_subsection(pool, section, 1, false).await;
    let quiz = insert_subsection(pool, section, 2, true).await;
    (course, first, quiz)
}
