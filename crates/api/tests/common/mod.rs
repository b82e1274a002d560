//! Shared helpers for the HTTP integration tests: app construction, bearer
//! tokens, request shortcuts, and database seeding.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use academy_api::auth::jwt::{generate_access_token, JwtConfig};
use academy_api::config::ServerConfig;
use academy_api::router::build_app_router;
use academy_api::state::AppState;
use academy_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The production router and middleware stack over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub fn customer_token(customer_id: i64) -> String {
    generate_access_token(customer_id, ROLE_CUSTOMER, &test_config().jwt).unwrap()
}

pub fn admin_token(admin_id: i64) -> String {
    generate_access_token(admin_id, ROLE_ADMIN, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST a raw body labelled as JSON, for malformed payloads.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn insert_course(pool: &PgPool, slug: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO courses (slug, title) VALUES ($1, $2) RETURNING id")
        .bind(slug)
        .bind(format!("Course {slug}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_chapter(pool: &PgPool, course_id: i64, sort_order: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO chapters (course_id, title, sort_order) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(course_id)
    .bind(format!("Chapter {sort_order}"))
    .bind(sort_order)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_section(pool: &PgPool, chapter_id: i64, sort_order: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO sections (chapter_id, title, sort_order) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(chapter_id)
    .bind(format!("Section {sort_order}"))
    .bind(sort_order)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_subsection(
    pool: &PgPool,
    section_id: i64,
    sort_order: i32,
    quiz_required: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO subsections (section_id, title, body, sort_order, quiz_required) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(section_id)
    .bind(format!("Lesson {sort_order}"))
    .bind(format!("Body of lesson {sort_order}"))
    .bind(sort_order)
    .bind(quiz_required)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a question with its options. Returns the question id and the
/// option ids in the given order.
pub async fn insert_question(
    pool: &PgPool,
    subsection_id: i64,
    prompt: &str,
    options: &[(&str, bool)],
) -> (i64, Vec<i64>) {
    let question_id: i64 = sqlx::query_scalar(
        "INSERT INTO quiz_questions (subsection_id, prompt) VALUES ($1, $2) RETURNING id",
    )
    .bind(subsection_id)
    .bind(prompt)
    .fetch_one(pool)
    .await
    .unwrap();

    let mut option_ids = Vec::with_capacity(options.len());
    for (i, (text, is_correct)) in options.iter().enumerate() {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO quiz_options (question_id, text, is_correct, sort_order) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(question_id)
        .bind(*text)
        .bind(*is_correct)
        .bind(i as i32)
        .fetch_one(pool)
        .await
        .unwrap();
        option_ids.push(id);
    }
    (question_id, option_ids)
}

pub async fn grant_entitlement(
    pool: &PgPool,
    customer_id: i64,
    course_id: i64,
    status: &str,
    expires_at: Option<DateTime<Utc>>,
) {
    sqlx::query(
        "INSERT INTO course_entitlements (customer_id, course_id, status, expires_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(customer_id)
    .bind(course_id)
    .bind(status)
    .bind(expires_at)
    .execute(pool)
    .await
    .unwrap();
}

/// Ids of the two-chapter course used by most tests.
pub struct SeededCourse {
    pub course_id: i64,
    pub sub1: i64,
    /// Quiz-gated, pass score 70.
    pub sub2: i64,
    pub sub3: i64,
}

/// `intro`: Chapter1 { Section1 { Sub1, Sub2 (quiz, 70) } },
/// Chapter2 { Section1 { Sub3 } }.
pub async fn seed_course(pool: &PgPool) -> SeededCourse {
    let course_id = insert_course(pool, "intro").await;
    let ch1 = insert_chapter(pool, course_id, 1).await;
    let ch2 = insert_chapter(pool, course_id, 2).await;
    let s1 = insert_section(pool, ch1, 1).await;
    let s2 = insert_section(pool, ch2, 1).await;
    let sub1 = insert_subsection(pool, s1, 1, false).await;
    let sub2 = insert_subsection(pool, s1, 2, true).await;
    let sub3 = insert_subsection(pool, s2, 1, false).await;
    SeededCourse {
        course_id,
        sub1,
        sub2,
        sub3,
    }
}
