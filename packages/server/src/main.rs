use anyhow::Context;
use tracing::{Level, info};

use coffee_server::config::AppConfig;
use coffee_server::state::AppState;
use coffee_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;

    seed::seed_bootstrap_user(&db, config.seed.admin.as_ref())
        .await
        .context("Failed to seed bootstrap user")?;
    seed::ensure_indexes(&db).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
