//! Shared response envelope types for API handlers.
//!
//! Endpoints whose body shape is not fixed by the client contract use the
//! `{ "data": ... }` envelope. Use [`DataResponse`] instead of ad-hoc
//! `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
