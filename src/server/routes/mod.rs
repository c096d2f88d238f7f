mod categories;
mod questions;
mod quizzes;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::selection::Page;

use super::deserializers::deserialize_page;
use super::error::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

/// Successful reply: the endpoint's fields next to `"success": true`.
#[derive(Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub type ApiResponse<T> = Result<Success<T>, ApiError>;

pub fn success<T>(body: T) -> ApiResponse<T> {
    Ok(Success {
        success: true,
        body,
    })
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_page")]
    pub page: Page,
}
