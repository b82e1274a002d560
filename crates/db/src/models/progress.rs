//! Per-customer progress rows: `customer_completions`, `customer_quiz_status`.

use academy_core::error::CoreError;
use academy_core::progress::{ProgressSnapshot, QuizOutcome};
use academy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Completion {
    pub id: DbId,
    pub customer_id: DbId,
    pub subsection_id: DbId,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Latest quiz attempt for one (customer, subsection) pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizStatus {
    pub id: DbId,
    pub customer_id: DbId,
    pub subsection_id: DbId,
    pub status: String,
    pub score: Option<i16>,
    pub attempts: i32,
    pub last_attempt_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QuizStatus {
    pub fn outcome(&self) -> Result<QuizOutcome, CoreError> {
        QuizOutcome::from_row(&self.status, self.score)
    }
}

/// Build the in-memory snapshot the resolver and enforcer work on.
pub fn build_snapshot(
    completed: Vec<DbId>,
    quiz_rows: &[QuizStatus],
) -> Result<ProgressSnapshot, CoreError> {
    let quizzes = quiz_rows
        .iter()
        .map(|row| row.outcome().map(|o| (row.subsection_id, o)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProgressSnapshot::new(completed, quizzes))
}
