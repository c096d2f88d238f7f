use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{find_category, get_all_categories},
            questions::{count_questions_for_category, get_category_questions_page},
        },
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extractors::{AppPath, AppQuery},
    },
};

use super::{success, ApiResponse, PageQuery};

#[derive(Serialize)]
struct CategoryLabels {
    categories: Vec<String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestions {
    questions: Vec<Question>,
    current_category: String,
    total_questions: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoryLabels> {
    let categories: Vec<String> = get_all_categories(&pool)
        .await?
        .into_iter()
        .map(|c| c.kind)
        .collect();
    success(CategoryLabels {
        total_categories: categories.len(),
        categories,
    })
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<CategoryQuestions> {
    let Some(category) = find_category(&pool, id).await? else {
        tracing::debug!(category_id = id, "Unknown category");
        return Err(ApiError::NotFound);
    };

    let questions = get_category_questions_page(&pool, id, page).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    success(CategoryQuestions {
        questions,
        current_category: category.kind,
        total_questions: count_questions_for_category(&pool, id).await?,
    })
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
}
