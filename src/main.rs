use bookflix_api::{
    api::{create_router, AppState},
    config::Config,
    services::{sources, QueryEngine},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookflix_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // A bad data source leaves the server up in a degraded state
    let engine = match sources::from_config(&config) {
        Ok(source) => QueryEngine::initialize(source.as_ref()).await,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build data source, serving empty results");
            QueryEngine::degraded(e.to_string())
        }
    };

    let app = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
