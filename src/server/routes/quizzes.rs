use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    selection::next_question,
    server::{app::AppState, extractors::AppJson},
    telemetry::{QUIZ_QUESTIONS_SERVED, QUIZ_ROUNDS_COMPLETED},
};

use super::{success, ApiResponse};

/// `quiz_category.id` value that selects from every category.
const ANY_CATEGORY: i64 = 0;

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    quiz_category: QuizCategory,
}

#[derive(Serialize)]
struct QuizQuestion {
    question: Option<Question>,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let scope = request.quiz_category.id;
    let candidates = if scope == ANY_CATEGORY {
        get_all_questions(&pool).await?
    } else {
        get_questions_for_category(&pool, scope).await?
    };
    let previous = request.previous_questions.unwrap_or_default();

    let question = next_question(candidates, &previous);
    match &question {
        Some(question) => {
            let label = if scope == ANY_CATEGORY { "all" } else { "category" };
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label]).inc();
            tracing::debug!(question_id = question.id, category = scope, "Serving quiz question");
        }
        None => {
            QUIZ_ROUNDS_COMPLETED.inc();
            tracing::info!(
                category = scope,
                served = previous.len(),
                "Quiz round has no questions left"
            );
        }
    }

    success(QuizQuestion { question })
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_quiz_question))
}
