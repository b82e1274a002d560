//! Repository for the `customer_completions` table.

use academy_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::progress::Completion;

const COLUMNS: &str = "id, customer_id, subsection_id, completed_at, created_at, updated_at";

/// Completion records. Rows are only ever inserted; never deleted.
pub struct CompletionRepo;

impl CompletionRepo {
    /// Ids of every subsection of `course_id` the customer has completed.
    pub async fn list_subsection_ids(
        pool: &PgPool,
        customer_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT cc.subsection_id \
             FROM customer_completions cc \
             JOIN subsections s ON s.id = cc.subsection_id \
             JOIN sections sec ON sec.id = s.section_id \
             JOIN chapters ch ON ch.id = sec.chapter_id \
             WHERE cc.customer_id = $1 AND ch.course_id = $2",
        )
        .bind(customer_id)
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        customer_id: DbId,
        subsection_id: DbId,
    ) -> Result<Option<Completion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_completions \
             WHERE customer_id = $1 AND subsection_id = $2"
        );
        sqlx::query_as::<_, Completion>(&query)
            .bind(customer_id)
            .bind(subsection_id)
            .fetch_optional(pool)
            .await
    }

    /// Record a completion. Repeated calls keep the first `completed_at`.
    ///
    /// Accepts any executor so it can run inside the quiz-attempt
    /// transaction.
    pub async fn upsert<'e, E>(
        executor: E,
        customer_id: DbId,
        subsection_id: DbId,
    ) -> Result<Completion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO customer_completions (customer_id, subsection_id) \
             VALUES ($1, $2) \
             ON CONFLICT (customer_id, subsection_id) \
             DO UPDATE SET completed_at = customer_completions.completed_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Completion>(&query)
            .bind(customer_id)
            .bind(subsection_id)
            .fetch_one(executor)
            .await
    }
}
