//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` (or any Postgres executor, for calls that must
//! join an open transaction) as the first argument.

pub mod access_code_repo;
pub mod certificate_repo;
pub mod completion_repo;
pub mod course_repo;
pub mod entitlement_repo;
pub mod quiz_repo;
pub mod quiz_status_repo;

pub use access_code_repo::AccessCodeRepo;
pub use certificate_repo::CertificateRepo;
pub use completion_repo::CompletionRepo;
pub use course_repo::CourseRepo;
pub use entitlement_repo::EntitlementRepo;
pub use quiz_repo::QuizRepo;
pub use quiz_status_repo::QuizStatusRepo;
