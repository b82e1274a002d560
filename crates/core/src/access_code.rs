//! Access-code normalization, hashing and redeemability rules.
//!
//! Plaintext codes are never stored. Lookups go through the SHA-256 hex
//! digest of the normalized code.

use sha2::{Digest, Sha256};

use crate::error::{AccessCodeRejection, CoreError};
use crate::types::Timestamp;

pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 64;

/// Trim surrounding whitespace, drop inner dashes and spaces, uppercase.
///
/// `" abcd-1234 "` and `"ABCD1234"` normalize to the same code.
pub fn normalize_access_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Reject codes that cannot possibly exist before hitting the database.
pub fn validate_access_code_format(normalized: &str) -> Result<(), CoreError> {
    let len = normalized.chars().count();
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "access code must be {MIN_CODE_LENGTH}-{MAX_CODE_LENGTH} characters"
        )));
    }
    if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::Validation(
            "access code may only contain letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// SHA-256 hex digest of a normalized code.
pub fn hash_access_code(normalized: &str) -> String {
    let hash = Sha256::digest(normalized.as_bytes());
    format!("{hash:x}")
}

/// Whether a stored code can be consumed once more at `now`.
pub fn check_redeemable(
    active: bool,
    expires_at: Option<Timestamp>,
    used_count: i32,
    max_uses: i32,
    now: Timestamp,
) -> Result<(), AccessCodeRejection> {
    if !active {
        return Err(AccessCodeRejection::Invalid);
    }
    if expires_at.is_some_and(|exp| exp <= now) {
        return Err(AccessCodeRejection::Expired);
    }
    if used_count >= max_uses {
        return Err(AccessCodeRejection::Exhausted);
    }
    Ok(())
}
