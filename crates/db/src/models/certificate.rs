//! Certificate hand-off rows: `certificate_requests`.

use academy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CertificateRequest {
    pub id: DbId,
    pub customer_id: DbId,
    pub course_id: DbId,
    pub requested_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
