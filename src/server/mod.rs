pub mod app;
mod deserializers;
mod error;
mod extractors;
mod routes;

pub use app::{build_router, run_server, AppState};
pub use error::ApiError;
