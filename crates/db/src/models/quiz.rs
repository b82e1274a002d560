//! Authored quiz content: `quiz_questions`, `quiz_options`.

use std::collections::{HashMap, HashSet};

use academy_core::grading::{AnswerKey, QuestionDraft};
use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizQuestion {
    pub id: DbId,
    pub subsection_id: DbId,
    pub prompt: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `quiz_options`. Carries the answer key, so it is only ever
/// serialized on admin endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizOption {
    pub id: DbId,
    pub question_id: DbId,
    pub text: String,
    pub is_correct: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Group the correct option ids by question. Questions without options
/// still produce a key, so they count in the denominator.
pub fn answer_keys(questions: &[QuizQuestion], options: &[QuizOption]) -> Vec<AnswerKey> {
    let mut correct: HashMap<DbId, HashSet<DbId>> = HashMap::new();
    for option in options.iter().filter(|o| o.is_correct) {
        correct.entry(option.question_id).or_default().insert(option.id);
    }
    questions
        .iter()
        .map(|q| AnswerKey {
            question_id: q.id,
            correct_option_ids: correct.remove(&q.id).unwrap_or_default(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Authoring DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizOption {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizQuestion {
    #[validate(length(min = 1, max = 4000))]
    pub prompt: String,
    #[validate(length(min = 2), nested)]
    pub options: Vec<CreateQuizOption>,
}

/// Replace-all payload for a subsection's quiz.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceQuiz {
    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<CreateQuizQuestion>,
}

impl ReplaceQuiz {
    pub fn drafts(&self) -> Vec<QuestionDraft<'_>> {
        self.questions
            .iter()
            .map(|q| QuestionDraft {
                prompt: &q.prompt,
                options: q
                    .options
                    .iter()
                    .map(|o| (o.text.as_str(), o.is_correct))
                    .collect(),
            })
            .collect()
    }
}
