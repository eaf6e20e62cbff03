use std::sync::Arc;

use samta_api::config::Config;
use samta_api::state::AppState;
use samta_api::store::PgStore;
use samta_api::{api, db, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::load()?;
    tracing::info!("configuration loaded");

    let pool = db::connect_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, Arc::new(config.clone()));
    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
