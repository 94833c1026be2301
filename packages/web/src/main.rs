use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = api::Settings::new().context("Failed to load settings")?;

    // Initialize database pool
    let pool = api::db::connect(&settings.database)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    api::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    let waitlist = api::Waitlist::new(api::db::PgStore::new(pool), settings.waitlist.clone());
    let state = routes::AppState::new(waitlist, settings.server.public_url.clone());

    let router = routes::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.address))?;
    tracing::info!("Server listening on {}", settings.server.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
