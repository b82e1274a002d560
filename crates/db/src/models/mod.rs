//! Row structs and request DTOs.
//!
//! Each submodule contains `FromRow` + `Serialize` structs matching table
//! rows and, where the API accepts input for that table, a `Deserialize`
//! DTO validated with `validator`.

pub mod certificate;
pub mod course;
pub mod entitlement;
pub mod progress;
pub mod quiz;
