//! Repository for the `certificate_requests` hand-off table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::certificate::CertificateRequest;

const COLUMNS: &str = "id, customer_id, course_id, requested_at, created_at, updated_at";

pub struct CertificateRepo;

impl CertificateRepo {
    /// Queue a certificate for the customer. Returns `true` only when a new
    /// request row was inserted.
    pub async fn request(
        pool: &PgPool,
        customer_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO certificate_requests (customer_id, course_id) \
             VALUES ($1, $2) \
             ON CONFLICT (customer_id, course_id) DO NOTHING",
        )
        .bind(customer_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(
        pool: &PgPool,
        customer_id: DbId,
        course_id: DbId,
    ) -> Result<Option<CertificateRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certificate_requests \
             WHERE customer_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, CertificateRequest>(&query)
            .bind(customer_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }
}
