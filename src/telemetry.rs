use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of quiz questions handed out",
        &["scope"]
    )
    .expect("metric can be registered");
    pub static ref QUIZ_ROUNDS_COMPLETED: IntCounter = register_int_counter!(
        "trivia_quiz_rounds_completed_total",
        "Number of quiz requests that found every question already served"
    )
    .expect("metric can be registered");
    pub static ref API_ERRORS: IntCounterVec = register_int_counter_vec!(
        "trivia_api_errors_total",
        "Number of error responses by status code",
        &["status"]
    )
    .expect("metric can be registered");
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
