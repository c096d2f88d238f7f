use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use trivia_api::db::queries::questions::{count_questions, get_question_by_id};
use trivia_api::server::{build_router, AppState};

fn create_test_app(pool: SqlitePool) -> TestServer {
    TestServer::new(build_router(AppState::new(pool))).expect("Failed to create test server")
}

fn ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .expect("questions should be a list")
        .iter()
        .map(|q| q["id"].as_i64().expect("question id"))
        .collect()
}

fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], status.as_u16());
    assert_eq!(body["message"], message);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_retrieve_all_categories(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/categories").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_categories"], 6);
    assert_eq!(
        body["categories"],
        json!(["Science", "Art", "Geography", "History", "Entertainment", "Sports"])
    );
}

#[sqlx::test(fixtures("trivia"))]
async fn test_retrieve_questions_first_page(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/questions").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_questions"], 19);
    assert_eq!(body["current_category"], "All");
    assert_eq!(body["categories"].as_array().map(Vec::len), Some(6));
    assert_eq!(ids(&body), vec![2, 4, 5, 6, 9, 10, 11, 12, 13, 14]);
    assert_eq!(body["questions"][0]["answer"], "Apollo 13");
    assert_eq!(body["questions"][0]["category"], 5);
    assert_eq!(body["questions"][0]["difficulty"], 4);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_retrieve_questions_last_page(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/questions").add_query_param("page", 2).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec![15, 16, 17, 18, 19, 20, 21, 22, 23]);
    assert_eq!(body["total_questions"], 19);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_404_sent_requesting_beyond_valid_page(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/questions").add_query_param("page", 1000).await;
    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");

    let response = app.get("/questions").add_query_param("page", 0).await;
    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_unparsable_page_means_first_page(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/questions").add_query_param("page", "abc").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body)[0], 2);
}

#[sqlx::test]
async fn test_404_when_store_is_empty(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/questions").await;

    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_delete_question(pool: SqlitePool) {
    let app = create_test_app(pool.clone());

    let response = app.delete("/questions/9").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"], 9);
    assert_eq!(body["total_questions"], 18);
    assert!(!ids(&body).contains(&9));
    assert_eq!(get_question_by_id(&pool, 9).await.unwrap(), None);
    assert_eq!(count_questions(&pool).await.unwrap(), 18);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_422_if_question_does_not_exist(pool: SqlitePool) {
    let app = create_test_app(pool.clone());

    let response = app.delete("/questions/1000").await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
    assert_eq!(count_questions(&pool).await.unwrap(), 19);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_404_if_question_id_is_not_a_number(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.delete("/questions/abc").await;

    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_create_new_question(pool: SqlitePool) {
    let app = create_test_app(pool.clone());

    let response = app
        .post("/questions")
        .json(&json!({
            "question": "What's the most available liquid on earth ?",
            "answer": "water",
            "difficulty": 1,
            "category": 3
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_questions"], 20);
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(10));

    let created = body["created"].as_i64().expect("created id");
    assert!(created > 23);
    let stored = get_question_by_id(&pool, created)
        .await
        .unwrap()
        .expect("question should be stored");
    assert_eq!(stored.answer, "water");
    assert_eq!(stored.category, 3);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_create_question_from_form_strings(pool: SqlitePool) {
    let app = create_test_app(pool.clone());

    let response = app
        .post("/questions")
        .json(&json!({
            "question": "Which planet is known as the red planet?",
            "answer": "Mars",
            "difficulty": "2",
            "category": "1"
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(count_questions(&pool).await.unwrap(), 20);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_400_if_question_fields_missing_or_blank(pool: SqlitePool) {
    let app = create_test_app(pool.clone());

    let response = app
        .post("/questions")
        .json(&json!({"question": "No answer?", "difficulty": 1, "category": 3}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "bad request");

    let response = app
        .post("/questions")
        .json(&json!({"question": "  ", "answer": "x", "difficulty": 1, "category": 3}))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "bad request");

    assert_eq!(count_questions(&pool).await.unwrap(), 19);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_422_if_category_does_not_exist(pool: SqlitePool) {
    let app = create_test_app(pool.clone());

    let response = app
        .post("/questions")
        .json(&json!({"question": "Orphan?", "answer": "yes", "difficulty": 1, "category": 99}))
        .await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
    assert_eq!(count_questions(&pool).await.unwrap(), 19);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_405_if_question_creation_not_allowed(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/questions/45")
        .json(&json!({"question": "q", "answer": "a", "difficulty": 1, "category": 3}))
        .await;

    assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_search_questions(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/questions/search")
        .json(&json!({"searchTerm": "TiTle"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec![5, 6]);
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["current_category"], "All");
    for question in body["questions"].as_array().unwrap() {
        let text = question["question"].as_str().unwrap().to_lowercase();
        assert!(text.contains("title"));
    }
}

#[sqlx::test(fixtures("trivia"))]
async fn test_search_within_one_category(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/questions/search")
        .json(&json!({"searchTerm": "soccer"}))
        .await;
    let body: Value = response.json();
    assert_eq!(ids(&body), vec![10, 11]);
    assert_eq!(body["current_category"], "Sports");

    let response = app
        .post("/questions/search")
        .json(&json!({"searchTerm": "penicillin"}))
        .await;
    let body: Value = response.json();
    assert_eq!(ids(&body), vec![21]);
    assert_eq!(body["current_category"], "Science");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_search_without_matches(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/questions/search")
        .json(&json!({"searchTerm": "xylophone"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["questions"], json!([]));
    assert_eq!(body["total_questions"], 0);
    assert_eq!(body["current_category"], "All");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_400_if_search_term_missing(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.post("/questions/search").json(&json!({})).await;

    assert_error(&response, StatusCode::BAD_REQUEST, "bad request");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_retrieve_category_questions(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/categories/3/questions").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec![13, 14, 15]);
    assert_eq!(body["total_questions"], 3);
    assert_eq!(body["current_category"], "Geography");
    for question in body["questions"].as_array().unwrap() {
        assert_eq!(question["category"], 3);
    }
}

#[sqlx::test(fixtures("trivia"))]
async fn test_404_for_category_page_or_unknown_category(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .get("/categories/3/questions")
        .add_query_param("page", 2)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");

    let response = app.get("/categories/99/questions").await;
    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_get_quiz_question(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/quizzes")
        .json(&json!({"previous_questions": [], "quiz_category": {"type": null, "id": 0}}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["question"]["id"], 2);

    let response = app
        .post("/quizzes")
        .json(&json!({"previous_questions": [2, 4], "quiz_category": {"type": null, "id": 0}}))
        .await;
    let body: Value = response.json();
    assert_eq!(body["question"]["id"], 5);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_quiz_within_category(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/quizzes")
        .json(&json!({"previous_questions": [13], "quiz_category": {"type": "Geography", "id": "3"}}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["question"]["id"], 14);
    assert_eq!(body["question"]["category"], 3);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_quiz_round_exhausted(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/quizzes")
        .json(&json!({"previous_questions": [15, 13, 14], "quiz_category": {"id": 3}}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["question"], Value::Null);
}

#[sqlx::test(fixtures("trivia"))]
async fn test_400_if_quiz_category_missing(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .post("/quizzes")
        .json(&json!({"previous_questions": []}))
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "bad request");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_unknown_route(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app.get("/answers").await;

    assert_error(&response, StatusCode::NOT_FOUND, "resource not found");
}

#[sqlx::test(fixtures("trivia"))]
async fn test_cors_headers_on_every_response(pool: SqlitePool) {
    let app = create_test_app(pool);
    let origin = HeaderValue::from_static("http://localhost:3000");

    let ok = app
        .get("/categories")
        .add_header(header::ORIGIN, origin.clone())
        .await;
    let failed = app
        .get("/questions")
        .add_query_param("page", 1000)
        .add_header(header::ORIGIN, origin)
        .await;

    for response in [ok, failed] {
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(
            response.header("access-control-allow-headers"),
            "Content-Type,Authorization"
        );
        assert_eq!(
            response.header("access-control-allow-methods"),
            "GET,PUT,POST,DELETE,OPTIONS"
        );
    }
}

#[sqlx::test(fixtures("trivia"))]
async fn test_cors_preflight(pool: SqlitePool) {
    let app = create_test_app(pool);

    let response = app
        .method(Method::OPTIONS, "/questions")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .add_header(
            HeaderName::from_static("access-control-request-method"),
            HeaderValue::from_static("POST"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
    let methods = response.header("access-control-allow-methods");
    assert!(methods.to_str().unwrap().contains("POST"));
}

#[sqlx::test(fixtures("trivia"))]
async fn test_metrics_count_errors(pool: SqlitePool) {
    let app = create_test_app(pool);

    app.get("/questions").add_query_param("page", 500).await;
    let response = app.get("/metrics").await;

    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("trivia_api_errors_total"));
}
