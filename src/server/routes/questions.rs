use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{self, count_questions, get_all_questions, get_questions_page},
        },
        NewQuestion, Question,
    },
    selection::{current_category, search_questions, Page, ALL_CATEGORIES},
    server::{
        app::AppState,
        error::ApiError,
        extractors::{AppJson, AppPath, AppQuery},
    },
};

use super::{success, ApiResponse, PageQuery};

// Form clients send the select values as strings
#[derive(Deserialize)]
struct NewQuestionBody {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

impl TryFrom<NewQuestionBody> for NewQuestion {
    type Error = ApiError;

    fn try_from(body: NewQuestionBody) -> Result<Self, Self::Error> {
        if body.question.trim().is_empty() {
            return Err(ApiError::BadRequest("question must not be blank".to_owned()));
        }
        if body.answer.trim().is_empty() {
            return Err(ApiError::BadRequest("answer must not be blank".to_owned()));
        }
        Ok(NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    categories: Vec<String>,
    current_category: &'static str,
    total_questions: i64,
}

#[derive(Serialize)]
struct Created {
    created: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    current_category: String,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = get_questions_page(&pool, page).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = get_all_categories(&pool)
        .await?
        .into_iter()
        .map(|c| c.kind)
        .collect();

    success(QuestionsPage {
        questions,
        categories,
        current_category: ALL_CATEGORIES,
        total_questions: count_questions(&pool).await?,
    })
}

// After a write the client re-renders from the refreshed listing.
async fn refreshed_page(pool: &SqlitePool, page: Page) -> Result<(Vec<Question>, i64), ApiError> {
    let questions = get_questions_page(pool, page)
        .await
        .map_err(ApiError::unprocessable)?;
    let total = count_questions(pool)
        .await
        .map_err(ApiError::unprocessable)?;
    Ok((questions, total))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
    AppJson(body): AppJson<NewQuestionBody>,
) -> ApiResponse<Created> {
    let new_question = NewQuestion::try_from(body)?;
    let created = questions::create_question(&pool, &new_question)
        .await
        .map_err(ApiError::unprocessable)?;
    tracing::info!(question_id = created, category = new_question.category, "Question created");

    let (questions, total_questions) = refreshed_page(&pool, page).await?;
    success(Created {
        created,
        questions,
        total_questions,
    })
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<Deleted> {
    let removed = questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    if !removed {
        return Err(ApiError::Unprocessable(format!("question {id} does not exist")));
    }
    tracing::info!(question_id = id, "Question deleted");

    let (questions, total_questions) = refreshed_page(&pool, page).await?;
    success(Deleted {
        deleted: id,
        questions,
        total_questions,
    })
}

async fn search(
    State(pool): State<SqlitePool>,
    AppJson(SearchBody { search_term }): AppJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let found = search_questions(get_all_questions(&pool).await?, &search_term);
    let category_ids: Vec<i64> = found.iter().map(|q| q.category).collect();
    let categories = get_all_categories(&pool).await?;

    success(SearchResults {
        current_category: current_category(&category_ids, &categories),
        total_questions: found.len(),
        questions: found,
    })
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
}
