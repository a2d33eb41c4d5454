use anyhow::Context;
use axum::http::HeaderValue;
use tracing_subscriber::EnvFilter;

use token_server::{AppState, config::Config, create_router, db};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("token_server=info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    let pool = db::create_db_pool(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    let cors_origin = HeaderValue::from_str(&config.cors_origin).context("invalid CORS_ORIGIN")?;
    let state = AppState::new(pool, config.auth, config.bcrypt_cost);
    let app = create_router(state, cors_origin);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("listening on {}", config.addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
