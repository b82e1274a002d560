//! Repository for the `customer_quiz_status` table.

use academy_core::progress::QuizOutcome;
use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::QuizStatus;
use crate::repositories::CompletionRepo;

const COLUMNS: &str = "\
    id, customer_id, subsection_id, status, score, attempts, last_attempt_at, \
    created_at, updated_at";

/// Same as [`COLUMNS`], qualified with the `q` alias for JOIN queries.
const Q_COLUMNS: &str = "\
    q.id, q.customer_id, q.subsection_id, q.status, q.score, q.attempts, \
    q.last_attempt_at, q.created_at, q.updated_at";

/// Latest quiz outcome per (customer, subsection).
pub struct QuizStatusRepo;

impl QuizStatusRepo {
    /// All quiz status rows of a customer within one course.
    pub async fn list_for_course(
        pool: &PgPool,
        customer_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<QuizStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {Q_COLUMNS} \
             FROM customer_quiz_status q \
             JOIN subsections s ON s.id = q.subsection_id \
             JOIN sections sec ON sec.id = s.section_id \
             JOIN chapters ch ON ch.id = sec.chapter_id \
             WHERE q.customer_id = $1 AND ch.course_id = $2"
        );
        sqlx::query_as::<_, QuizStatus>(&query)
            .bind(customer_id)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        customer_id: DbId,
        subsection_id: DbId,
    ) -> Result<Option<QuizStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_quiz_status \
             WHERE customer_id = $1 AND subsection_id = $2"
        );
        sqlx::query_as::<_, QuizStatus>(&query)
            .bind(customer_id)
            .bind(subsection_id)
            .fetch_optional(pool)
            .await
    }

    /// Record one graded attempt in a single transaction.
    ///
    /// Increments `attempts`, overwrites status and score, and on a pass
    /// also upserts the completion record.
    pub async fn record_attempt(
        pool: &PgPool,
        customer_id: DbId,
        subsection_id: DbId,
        outcome: QuizOutcome,
    ) -> Result<QuizStatus, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO customer_quiz_status \
                (customer_id, subsection_id, status, score, attempts, last_attempt_at) \
             VALUES ($1, $2, $3, $4, 1, NOW()) \
             ON CONFLICT (customer_id, subsection_id) DO UPDATE SET \
                status = EXCLUDED.status, \
                score = EXCLUDED.score, \
                attempts = customer_quiz_status.attempts + 1, \
                last_attempt_at = EXCLUDED.last_attempt_at \
             RETURNING {COLUMNS}"
        );
        let status = sqlx::query_as::<_, QuizStatus>(&query)
            .bind(customer_id)
            .bind(subsection_id)
            .bind(outcome.as_str())
            .bind(outcome.score().map(i16::from))
            .fetch_one(&mut *tx)
            .await?;

        if outcome.is_passed() {
            CompletionRepo::upsert(&mut *tx, customer_id, subsection_id).await?;
        }

        tx.commit().await?;
        Ok(status)
    }
}
