use anyhow::Context;
use secrecy::ExposeSecret;
use trivia_api::db;
use trivia_api::server::run_server;
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load().context("Failed to load configuration")?;
    let pool = db::establish_connection(
        settings.database_url.expose_secret(),
        settings.max_connections,
    )
    .await
    .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;

    run_server(pool, &settings.bind_address()).await
}
