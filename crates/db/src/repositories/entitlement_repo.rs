//! Repository for the `course_entitlements` read-model.

use academy_core::entitlement::EntitlementStatus;
use academy_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::entitlement::CourseEntitlement;

const COLUMNS: &str = "id, customer_id, course_id, status, expires_at, created_at, updated_at";

pub struct EntitlementRepo;

impl EntitlementRepo {
    pub async fn find(
        pool: &PgPool,
        customer_id: DbId,
        course_id: DbId,
    ) -> Result<Option<CourseEntitlement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_entitlements \
             WHERE customer_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, CourseEntitlement>(&query)
            .bind(customer_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the customer's entitlement to a course.
    pub async fn upsert<'e, E>(
        executor: E,
        customer_id: DbId,
        course_id: DbId,
        status: EntitlementStatus,
        expires_at: Option<Timestamp>,
    ) -> Result<CourseEntitlement, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO course_entitlements (customer_id, course_id, status, expires_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (customer_id, course_id) DO UPDATE SET \
                status = EXCLUDED.status, \
                expires_at = EXCLUDED.expires_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CourseEntitlement>(&query)
            .bind(customer_id)
            .bind(course_id)
            .bind(status.as_str())
            .bind(expires_at)
            .fetch_one(executor)
            .await
    }
}
