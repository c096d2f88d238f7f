use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trivia_api::db;
use trivia_api::seed::{export_data, import_data};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string, e.g. sqlite:trivia.db
    database_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the schema
    Migrate,
    /// Load categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Write categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let pool = db::establish_connection(&cli.database_url, 1)
        .await
        .context("Cannot connect to DB")?;
    match cli.command {
        Commands::Migrate => db::run_migrations(&pool).await?,
        Commands::Import { path } => {
            db::run_migrations(&pool).await?;
            import_data(&pool, &path).await.context("Cannot import")?
        }
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export")?,
    }
    Ok(())
}
