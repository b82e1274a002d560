//! Repository for the `quiz_questions` and `quiz_options` tables.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::quiz::{QuizOption, QuizQuestion, ReplaceQuiz};

const QUESTION_COLUMNS: &str = "id, subsection_id, prompt, sort_order, created_at, updated_at";

const OPTION_COLUMNS: &str = "\
    o.id, o.question_id, o.text, o.is_correct, o.sort_order, o.created_at, o.updated_at";

/// Authored quiz content per subsection.
pub struct QuizRepo;

impl QuizRepo {
    pub async fn list_questions(
        pool: &PgPool,
        subsection_id: DbId,
    ) -> Result<Vec<QuizQuestion>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM quiz_questions \
             WHERE subsection_id = $1 \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, QuizQuestion>(&query)
            .bind(subsection_id)
            .fetch_all(pool)
            .await
    }

    /// Every option of every question of the subsection.
    pub async fn list_options(
        pool: &PgPool,
        subsection_id: DbId,
    ) -> Result<Vec<QuizOption>, sqlx::Error> {
        let query = format!(
            "SELECT {OPTION_COLUMNS} \
             FROM quiz_options o \
             JOIN quiz_questions q ON q.id = o.question_id \
             WHERE q.subsection_id = $1 \
             ORDER BY o.question_id, o.sort_order, o.id"
        );
        sqlx::query_as::<_, QuizOption>(&query)
            .bind(subsection_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the subsection's whole question set.
    ///
    /// Existing questions are deleted (options cascade) and the new ones
    /// inserted with `sort_order` equal to their position, all in one
    /// transaction.
    pub async fn replace_questions(
        pool: &PgPool,
        subsection_id: DbId,
        input: &ReplaceQuiz,
    ) -> Result<Vec<QuizQuestion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM quiz_questions WHERE subsection_id = $1")
            .bind(subsection_id)
            .execute(&mut *tx)
            .await?;

        let insert_question = format!(
            "INSERT INTO quiz_questions (subsection_id, prompt, sort_order) \
             VALUES ($1, $2, $3) \
             RETURNING {QUESTION_COLUMNS}"
        );
        let mut questions = Vec::with_capacity(input.questions.len());
        for (qi, q) in input.questions.iter().enumerate() {
            let question = sqlx::query_as::<_, QuizQuestion>(&insert_question)
                .bind(subsection_id)
                .bind(&q.prompt)
                .bind(qi as i32)
                .fetch_one(&mut *tx)
                .await?;

            for (oi, o) in q.options.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO quiz_options (question_id, text, is_correct, sort_order) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(question.id)
                .bind(&o.text)
                .bind(o.is_correct)
                .bind(oi as i32)
                .execute(&mut *tx)
                .await?;
            }
            questions.push(question);
        }

        tx.commit().await?;
        tracing::debug!(subsection_id, count = questions.len(), "Replaced quiz questions");
        Ok(questions)
    }
}
