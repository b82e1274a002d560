//! Route definitions for course access, mounted at `/courses`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{academy, access_code, quiz};
use crate::state::AppState;

/// ```text
/// GET  /{slug}/content                         -> get_course_content
/// POST /{slug}/redeem                          -> redeem_access_code
/// GET  /{slug}/subsections/{id}                -> get_subsection
/// POST /{slug}/subsections/{id}/complete       -> complete_subsection
/// GET  /{slug}/subsections/{id}/quiz           -> get_quiz
/// POST /{slug}/subsections/{id}/quiz           -> replace_quiz (admin)
/// POST /{slug}/subsections/{id}/quiz/submit    -> submit_quiz
/// GET  /{slug}/subsections/{id}/quiz/admin     -> get_quiz_admin (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}/content", get(academy::get_course_content))
        .route("/{slug}/redeem", post(access_code::redeem_access_code))
        .route("/{slug}/subsections/{id}", get(academy::get_subsection))
        .route(
            "/{slug}/subsections/{id}/complete",
            post(academy::complete_subsection),
        )
        .route(
            "/{slug}/subsections/{id}/quiz",
            get(quiz::get_quiz).post(quiz::replace_quiz),
        )
        .route("/{slug}/subsections/{id}/quiz/submit", post(quiz::submit_quiz))
        .route("/{slug}/subsections/{id}/quiz/admin", get(quiz::get_quiz_admin))
}
