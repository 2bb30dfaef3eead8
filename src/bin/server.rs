use anyhow::Context;
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;
use trivia_api::{db, server::run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::load().context("Failed to load settings")?;
    init_tracing(&settings);
    let pool = db::establish_connection(&settings.db_path)
        .await
        .with_context(|| format!("Cannot open database {}", settings.db_path))?;

    if settings.run_migrations {
        tracing::info!("Running db migrations...");
        db::run_migrations(&pool).await?;
    }

    run_server(pool, &settings.address).await
}
