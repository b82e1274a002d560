//! Handler for redeeming course access codes.

use academy_core::access_code::{
    hash_access_code, normalize_access_code, validate_access_code_format,
};
use academy_core::error::CoreError;
use academy_core::types::Timestamp;
use academy_db::models::entitlement::{RedeemAccessCode, Redemption};
use academy_db::repositories::AccessCodeRepo;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::access::find_course;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub course_id: i64,
    pub status: String,
    pub expires_at: Option<Timestamp>,
    pub already_redeemed: bool,
}

/// POST /api/v1/courses/{slug}/redeem
///
/// Grants the caller an active entitlement. Redeeming the same code twice
/// is a no-op that reports `already_redeemed`.
pub async fn redeem_access_code(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(input): ApiJson<RedeemAccessCode>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let code = normalize_access_code(&input.code);
    validate_access_code_format(&code)?;

    let course = find_course(&state.pool, &slug).await?;
    let redemption = AccessCodeRepo::redeem(
        &state.pool,
        course.id,
        user.customer_id,
        &hash_access_code(&code),
        Utc::now(),
    )
    .await?;

    let (entitlement, already_redeemed) = match redemption {
        Redemption::Granted(e) => (e, false),
        Redemption::AlreadyRedeemed(e) => (e, true),
        Redemption::Rejected(rejection) => {
            tracing::warn!(
                customer_id = user.customer_id,
                course_id = course.id,
                code = rejection.code(),
                "Access code rejected",
            );
            return Err(AppError::Core(CoreError::AccessCodeRejected(rejection)));
        }
    };

    tracing::info!(
        customer_id = user.customer_id,
        course_id = course.id,
        already_redeemed,
        "Access code redeemed",
    );

    Ok(Json(DataResponse {
        data: RedeemResponse {
            course_id: course.id,
            status: entitlement.status,
            expires_at: entitlement.expires_at,
            already_redeemed,
        },
    }))
}
