//! Handlers for course content: the resolved tree, single subsections, and
//! marking subsections complete.

use academy_core::error::CoreError;
use academy_core::lock_state::ResolvedCourse;
use academy_core::prerequisite::AccessIntent;
use academy_core::types::DbId;
use academy_db::models::course::Subsection;
use academy_db::repositories::{CompletionRepo, CourseRepo};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::access::CourseContext;
use crate::error::{AppError, AppResult};
use crate::extract::ApiPath;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CourseContentResponse {
    pub subscribed: bool,
    pub content: ResolvedCourse,
}

#[derive(Debug, Serialize)]
pub struct Navigation {
    pub previous_subsection_id: Option<DbId>,
    pub next_subsection_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct SubsectionDetail {
    #[serde(flatten)]
    pub subsection: Subsection,
    /// Completed in the gating sense.
    pub completed: bool,
    pub quiz_status: &'static str,
    pub quiz_score: Option<u8>,
    pub navigation: Navigation,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub next_subsection_id: Option<DbId>,
}

/// GET /api/v1/courses/{slug}/content
///
/// The whole course tree with lock states and progress for the caller.
pub async fn get_course_content(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> AppResult<impl IntoResponse> {
    let ctx = CourseContext::load(&state.pool, &slug, user.customer_id).await?;
    ctx.require_subscription()?;

    let content = ctx.resolve();
    tracing::debug!(
        customer_id = user.customer_id,
        course_id = ctx.course.id,
        progress = content.meta.progress,
        "Resolved course content",
    );

    Ok(Json(CourseContentResponse {
        subscribed: ctx.subscribed,
        content,
    }))
}

/// GET /api/v1/courses/{slug}/subsections/{id}
pub async fn get_subsection(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath((slug, subsection_id)): ApiPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let ctx = CourseContext::load(&state.pool, &slug, user.customer_id).await?;

    let subsection = CourseRepo::find_subsection_in_course(&state.pool, ctx.course.id, subsection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subsection",
            id: subsection_id,
        }))?;

    let node = ctx.authorize(subsection_id, AccessIntent::View)?;
    let quiz = ctx.progress.quiz_outcome(subsection_id);
    let (previous_subsection_id, next_subsection_id) = ctx.outline.neighbours(subsection_id);

    Ok(Json(DataResponse {
        data: SubsectionDetail {
            completed: ctx.progress.is_done(node),
            quiz_status: quiz.as_str(),
            quiz_score: quiz.score(),
            navigation: Navigation {
                previous_subsection_id,
                next_subsection_id,
            },
            subsection,
        },
    }))
}

/// POST /api/v1/courses/{slug}/subsections/{id}/complete
///
/// Idempotent. Rejected with `QUIZ_REQUIRED_NOT_PASSED` while the
/// subsection's own mandatory quiz is not passed.
pub async fn complete_subsection(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath((slug, subsection_id)): ApiPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let mut ctx = CourseContext::load(&state.pool, &slug, user.customer_id).await?;
    ctx.authorize(subsection_id, AccessIntent::Complete)?;

    CompletionRepo::upsert(&state.pool, user.customer_id, subsection_id).await?;
    ctx.progress.mark_completed(subsection_id);

    tracing::info!(
        customer_id = user.customer_id,
        course_id = ctx.course.id,
        subsection_id,
        "Subsection completed",
    );

    let resolved = ctx.resolve();
    ctx.hand_off_certificate(&state.pool, &resolved).await?;

    let (_, next_subsection_id) = ctx.outline.neighbours(subsection_id);
    Ok(Json(CompleteResponse { next_subsection_id }))
}
