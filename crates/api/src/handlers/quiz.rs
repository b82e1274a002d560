//! Handlers for quizzes: customer view and submission, admin authoring.

use std::collections::HashMap;

use academy_core::error::CoreError;
use academy_core::grading::{evaluate, validate_question_set, QuizSubmission, Submission};
use academy_core::prerequisite::AccessIntent;
use academy_core::progress::QuizOutcome;
use academy_core::types::DbId;
use academy_db::models::quiz::{answer_keys, QuizOption, QuizQuestion, ReplaceQuiz};
use academy_db::repositories::{CourseRepo, QuizRepo, QuizStatusRepo};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use crate::access::{find_course, CourseContext};
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Option as shown to customers (no answer key).
#[derive(Debug, Serialize)]
pub struct OptionView {
    pub id: DbId,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionView<O: Serialize> {
    pub id: DbId,
    pub prompt: String,
    pub options: Vec<O>,
}

#[derive(Debug, Serialize)]
pub struct QuizView {
    pub subsection_id: DbId,
    pub pass_score: i16,
    pub status: &'static str,
    pub score: Option<u8>,
    pub attempts: i32,
    pub questions: Vec<QuestionView<OptionView>>,
}

#[derive(Debug, Serialize)]
pub struct AdminQuizView {
    pub subsection_id: DbId,
    pub quiz_required: bool,
    pub pass_score: i16,
    pub questions: Vec<QuestionView<QuizOption>>,
}

#[derive(Debug, Serialize)]
pub struct QuizSubmitResponse {
    pub passed: bool,
    pub score: u8,
    /// Pass threshold of this quiz.
    pub required: i16,
    pub attempts: i32,
    pub next_subsection_id: Option<DbId>,
    pub section_progress: u8,
}

/// Attach options to their questions, preserving question order.
fn group_options<O: Serialize>(
    questions: Vec<QuizQuestion>,
    options: Vec<QuizOption>,
    view: impl Fn(QuizOption) -> O,
) -> Vec<QuestionView<O>> {
    let mut by_question: HashMap<DbId, Vec<O>> = HashMap::new();
    for option in options {
        by_question
            .entry(option.question_id)
            .or_default()
            .push(view(option));
    }
    questions
        .into_iter()
        .map(|q| QuestionView {
            id: q.id,
            options: by_question.remove(&q.id).unwrap_or_default(),
            prompt: q.prompt,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Customer endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/courses/{slug}/subsections/{id}/quiz
pub async fn get_quiz(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath((slug, subsection_id)): ApiPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let ctx = CourseContext::load(&state.pool, &slug, user.customer_id).await?;
    let node = ctx.authorize(subsection_id, AccessIntent::View)?;
    if !node.quiz_required {
        return Err(AppError::Core(CoreError::QuizNotRequired { subsection_id }));
    }

    let questions = QuizRepo::list_questions(&state.pool, subsection_id).await?;
    if questions.is_empty() {
        return Err(AppError::Core(CoreError::QuizNotConfigured { subsection_id }));
    }
    let options = QuizRepo::list_options(&state.pool, subsection_id).await?;
    let status = QuizStatusRepo::find(&state.pool, user.customer_id, subsection_id).await?;
    let outcome = ctx.progress.quiz_outcome(subsection_id);

    Ok(Json(DataResponse {
        data: QuizView {
            subsection_id,
            pass_score: node.quiz_pass_score,
            status: outcome.as_str(),
            score: outcome.score(),
            attempts: status.map_or(0, |s| s.attempts),
            questions: group_options(questions, options, |o| OptionView {
                id: o.id,
                text: o.text,
            }),
        },
    }))
}

/// POST /api/v1/courses/{slug}/subsections/{id}/quiz/submit
///
/// Grades the submission, records the attempt, and on a pass marks the
/// subsection complete in the same transaction.
pub async fn submit_quiz(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath((slug, subsection_id)): ApiPath<(String, DbId)>,
    ApiJson(body): ApiJson<QuizSubmission>,
) -> AppResult<impl IntoResponse> {
    let mut ctx = CourseContext::load(&state.pool, &slug, user.customer_id).await?;
    let node = ctx.authorize(subsection_id, AccessIntent::View)?.clone();
    if !node.quiz_required {
        return Err(AppError::Core(CoreError::QuizNotRequired { subsection_id }));
    }

    let submission = Submission::try_from(body)?;
    let keys = match &submission {
        Submission::Answers(_) => {
            let questions = QuizRepo::list_questions(&state.pool, subsection_id).await?;
            let options = QuizRepo::list_options(&state.pool, subsection_id).await?;
            answer_keys(&questions, &options)
        }
        Submission::LegacyScore(_) => Vec::new(),
    };
    let grade = evaluate(subsection_id, &keys, &submission, node.quiz_pass_score)?;
    let outcome = QuizOutcome::graded(grade.score, grade.passed);

    let status =
        QuizStatusRepo::record_attempt(&state.pool, user.customer_id, subsection_id, outcome)
            .await?;

    tracing::info!(
        customer_id = user.customer_id,
        subsection_id,
        score = grade.score,
        passed = grade.passed,
        attempts = status.attempts,
        "Quiz attempt recorded",
    );

    ctx.progress.record_quiz(subsection_id, outcome);
    if grade.passed {
        ctx.progress.mark_completed(subsection_id);
    }
    let resolved = ctx.resolve();
    if grade.passed {
        ctx.hand_off_certificate(&state.pool, &resolved).await?;
    }

    let section_progress = resolved
        .section(node.section_id)
        .map_or(0, |s| s.meta.progress);
    let (_, next_subsection_id) = ctx.outline.neighbours(subsection_id);

    Ok(Json(QuizSubmitResponse {
        passed: grade.passed,
        score: grade.score,
        required: node.quiz_pass_score,
        attempts: status.attempts,
        next_subsection_id,
        section_progress,
    }))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

async fn admin_quiz_view(
    state: &AppState,
    slug: &str,
    subsection_id: DbId,
) -> AppResult<AdminQuizView> {
    let course = find_course(&state.pool, slug).await?;
    let subsection = CourseRepo::find_subsection_in_course(&state.pool, course.id, subsection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subsection",
            id: subsection_id,
        }))?;

    let questions = QuizRepo::list_questions(&state.pool, subsection_id).await?;
    let options = QuizRepo::list_options(&state.pool, subsection_id).await?;

    Ok(AdminQuizView {
        subsection_id,
        quiz_required: subsection.quiz_required,
        pass_score: subsection.quiz_pass_score,
        questions: group_options(questions, options, |o| o),
    })
}

/// GET /api/v1/courses/{slug}/subsections/{id}/quiz/admin
///
/// Authored questions including the answer key.
pub async fn get_quiz_admin(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath((slug, subsection_id)): ApiPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let view = admin_quiz_view(&state, &slug, subsection_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/courses/{slug}/subsections/{id}/quiz
///
/// Replace the subsection's whole question set.
pub async fn replace_quiz(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath((slug, subsection_id)): ApiPath<(String, DbId)>,
    ApiJson(input): ApiJson<ReplaceQuiz>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_question_set(&input.drafts())?;

    let course = find_course(&state.pool, &slug).await?;
    CourseRepo::find_subsection_in_course(&state.pool, course.id, subsection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subsection",
            id: subsection_id,
        }))?;

    let questions = QuizRepo::replace_questions(&state.pool, subsection_id, &input).await?;

    tracing::info!(
        admin_id = admin.customer_id,
        course_id = course.id,
        subsection_id,
        question_count = questions.len(),
        "Quiz questions replaced",
    );

    let view = admin_quiz_view(&state, &slug, subsection_id).await?;
    Ok(Json(DataResponse { data: view }))
}
