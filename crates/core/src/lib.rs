//! Domain logic for course access gating.
//!
//! Everything in this crate is pure: callers load rows from the database,
//! convert them into the snapshot types here, and ask the resolver,
//! enforcer, or grading engine for a decision.

pub mod access_code;
pub mod entitlement;
pub mod error;
pub mod grading;
pub mod lock_state;
pub mod outline;
pub mod prerequisite;
pub mod progress;
pub mod roles;
pub mod types;
