//! Request extractors whose rejections use the JSON error body.
//!
//! Handlers take [`ApiPath`] and [`ApiJson`] instead of axum's `Path` and
//! `Json`, so a malformed id or body is reported as `BAD_REQUEST` or
//! `VALIDATION_ERROR` like every other error.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::extract::Path` with [`AppError`] as its rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `axum::Json` with [`AppError`] as its rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
