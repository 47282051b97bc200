use film_catalog::{
    api::{create_router, AppState},
    config::Config,
    db,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("film_catalog=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = db::create_pool(&config.database_url, config.db_max_connections).await?;
    let state = AppState::new(store, config.popular_default_count);

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
