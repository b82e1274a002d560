//! Integration tests for the completion and quiz status stores.

mod common;

use academy_core::progress::QuizOutcome;
use academy_db::models::progress::build_snapshot;
use academy_db::repositories::{CompletionRepo, QuizStatusRepo};
use sqlx::PgPool;

use common::*;

const CUSTOMER: i64 = 42;

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_upsert_is_idempotent(pool: PgPool) {
    let (course, first, _) = seed_small_course(&pool).await;

    let a = CompletionRepo::upsert(&pool, CUSTOMER, first).await.unwrap();
    let b = CompletionRepo::upsert(&pool, CUSTOMER, first).await.unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(a.completed_at, b.completed_at);

    let ids = CompletionRepo::list_subsection_ids(&pool, CUSTOMER, course)
        .await
        .unwrap();
    assert_eq!(ids, vec![first]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_completions_converge_on_one_row(pool: PgPool) {
    let (_, first, _) = seed_small_course(&pool).await;

    let (a, b) = tokio::join!(
        CompletionRepo::upsert(&pool, CUSTOMER, first),
        CompletionRepo::upsert(&pool, CUSTOMER, first),
    );
    assert_eq!(a.unwrap().id, b.unwrap().id);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM customer_completions WHERE customer_id = $1",
    )
    .bind(CUSTOMER)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_attempt_counts_but_does_not_complete(pool: PgPool) {
    let (_, _, quiz) = seed_small_course(&pool).await;

    let status = QuizStatusRepo::record_attempt(&pool, CUSTOMER, quiz, QuizOutcome::Failed(50))
        .await
        .unwrap();
    assert_eq!(status.status, "failed");
    assert_eq!(status.score, Some(50));
    assert_eq!(status.attempts, 1);
    assert!(status.last_attempt_at.is_some());

    assert!(CompletionRepo::find(&pool, CUSTOMER, quiz)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn passing_attempt_overwrites_status_and_completes(pool: PgPool) {
    let (course, first, quiz) = seed_small_course(&pool).await;

    QuizStatusRepo::record_attempt(&pool, CUSTOMER, quiz, QuizOutcome::Failed(50))
        .await
        .unwrap();
    let status = QuizStatusRepo::record_attempt(&pool, CUSTOMER, quiz, QuizOutcome::Passed(80))
        .await
        .unwrap();
    assert_eq!(status.status, "passed");
    assert_eq!(status.score, Some(80));
    assert_eq!(status.attempts, 2);
    assert_eq!(status.outcome().unwrap(), QuizOutcome::Passed(80));

    assert!(CompletionRepo::find(&pool, CUSTOMER, quiz)
        .await
        .unwrap()
        .is_some());

    CompletionRepo::upsert(&pool, CUSTOMER, first).await.unwrap();
    let completed = CompletionRepo::list_subsection_ids(&pool, CUSTOMER, course)
        .await
        .unwrap();
    let quiz_rows = QuizStatusRepo::list_for_course(&pool, CUSTOMER, course)
        .await
        .unwrap();
    let snapshot = build_snapshot(completed, &quiz_rows).unwrap();
    assert!(snapshot.has_completion(first));
    assert!(snapshot.quiz_outcome(quiz).is_passed());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_is_per_customer(pool: PgPool) {
    let (course, first, _) = seed_small_course(&pool).await;
    CompletionRepo::upsert(&pool, CUSTOMER, first).await.unwrap();

    let other = CompletionRepo::list_subsection_ids(&pool, CUSTOMER + 1, course)
        .await
        .unwrap();
    assert!(other.is_empty());
}
