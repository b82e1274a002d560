//! Entitlement read-model and access codes: `course_entitlements`,
//! `access_codes`, `access_code_redemptions`.

use academy_core::entitlement::{Entitlement, EntitlementStatus};
use academy_core::error::{AccessCodeRejection, CoreError};
use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseEntitlement {
    pub id: DbId,
    pub customer_id: DbId,
    pub course_id: DbId,
    pub status: String,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CourseEntitlement {
    pub fn to_domain(&self) -> Result<Entitlement, CoreError> {
        Ok(Entitlement {
            status: EntitlementStatus::from_str_value(&self.status)?,
            expires_at: self.expires_at,
        })
    }
}

/// A row from `access_codes`. The plaintext code is never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessCode {
    pub id: DbId,
    pub course_id: DbId,
    #[serde(skip_serializing)]
    pub code_hash: String,
    pub max_uses: i32,
    pub used_count: i32,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for an access code. `code_hash` is the SHA-256 hex digest of
/// the normalized code.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccessCode {
    pub course_id: DbId,
    pub code_hash: String,
    pub max_uses: i32,
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RedeemAccessCode {
    #[validate(length(min = 1, max = 128))]
    pub code: String,
}

/// Result of a redemption attempt.
#[derive(Debug, Clone)]
pub enum Redemption {
    /// A use was consumed and the entitlement granted.
    Granted(CourseEntitlement),
    /// The customer had already redeemed this code; no use consumed.
    AlreadyRedeemed(CourseEntitlement),
    Rejected(AccessCodeRejection),
}
