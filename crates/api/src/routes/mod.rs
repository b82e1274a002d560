pub mod academy;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /courses/{slug}/content                            resolved tree (GET)
/// /courses/{slug}/redeem                             redeem access code (POST)
/// /courses/{slug}/subsections/{id}                   subsection detail (GET)
/// /courses/{slug}/subsections/{id}/complete          mark complete (POST)
/// /courses/{slug}/subsections/{id}/quiz              get quiz, replace quiz (admin)
/// /courses/{slug}/subsections/{id}/quiz/submit       submit answers (POST)
/// /courses/{slug}/subsections/{id}/quiz/admin        quiz with answer key (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/courses", academy::router())
}
