use anyhow::Context;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are set directly).
    let _ = dotenvy::dotenv();

    server::telemetry::init_logging();
    server::config::load_config();
    server::health::record_start_time();

    if server::config::feature_flags().telemetry {
        server::telemetry::init_telemetry()?;
    }

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    if std::env::var("JWT_SECRET").map_or(true, |s| s.is_empty()) {
        anyhow::bail!("JWT_SECRET must be set");
    }

    let pool = server::db::create_pool(&database_url).context("invalid DATABASE_URL")?;
    server::db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let addr = server::config::bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("caseload listening on {addr}");

    axum::serve(listener, server::openapi::app(pool)).await?;
    Ok(())
}
