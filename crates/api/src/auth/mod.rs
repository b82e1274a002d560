//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation, used by
//!   tooling and tests; customer login lives in the identity service).

pub mod jwt;
