//! Entitlement read-model evaluation.
//!
//! Entitlements are owned by the external subscription system; this crate
//! only interprets the stored `(status, expires_at)` pair at a given instant.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

pub const ENTITLEMENT_NONE: &str = "none";
pub const ENTITLEMENT_ACTIVE: &str = "active";
pub const ENTITLEMENT_EXPIRED: &str = "expired";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementStatus {
    None,
    Active,
    Expired,
}

impl EntitlementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => ENTITLEMENT_NONE,
            Self::Active => ENTITLEMENT_ACTIVE,
            Self::Expired => ENTITLEMENT_EXPIRED,
        }
    }

    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            ENTITLEMENT_NONE => Ok(Self::None),
            ENTITLEMENT_ACTIVE => Ok(Self::Active),
            ENTITLEMENT_EXPIRED => Ok(Self::Expired),
            other => Err(CoreError::Internal(format!(
                "unknown entitlement status '{other}'"
            ))),
        }
    }
}

/// One customer's entitlement to one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entitlement {
    pub status: EntitlementStatus,
    pub expires_at: Option<Timestamp>,
}

impl Entitlement {
    /// A customer with no stored row.
    pub fn none() -> Self {
        Self {
            status: EntitlementStatus::None,
            expires_at: None,
        }
    }

    /// Status as of `now`. An `active` row past its expiry is expired.
    pub fn effective_status(&self, now: Timestamp) -> EntitlementStatus {
        match (self.status, self.expires_at) {
            (EntitlementStatus::Active, Some(exp)) if exp <= now => EntitlementStatus::Expired,
            (status, _) => status,
        }
    }

    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.effective_status(now) == EntitlementStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn missing_row_is_not_active() {
        assert!(!Entitlement::none().is_active_at(Utc::now()));
    }

    #[test]
    fn active_without_expiry_is_active() {
        let e = Entitlement {
            status: EntitlementStatus::Active,
            expires_at: None,
        };
        assert!(e.is_active_at(Utc::now()));
    }

    #[test]
    fn active_past_expiry_is_expired() {
        let now = Utc::now();
        let e = Entitlement {
            status: EntitlementStatus::Active,
            expires_at: Some(now - Duration::minutes(1)),
        };
        assert_eq!(e.effective_status(now), EntitlementStatus::Expired);
        assert!(!e.is_active_at(now));

        let future = Entitlement {
            expires_at: Some(now + Duration::days(30)),
            ..e
        };
        assert!(future.is_active_at(now));
    }

    #[test]
    fn expired_status_stays_expired() {
        let e = Entitlement {
            status: EntitlementStatus::Expired,
            expires_at: None,
        };
        assert!(!e.is_active_at(Utc::now()));
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            EntitlementStatus::None,
            EntitlementStatus::Active,
            EntitlementStatus::Expired,
        ] {
            assert_eq!(EntitlementStatus::from_str_value(status.as_str()).unwrap(), status);
        }
        assert!(EntitlementStatus::from_str_value("paused").is_err());
    }
}
