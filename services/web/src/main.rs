use std::sync::Arc;

use anyhow::Result;
use common::{MemoryStore, RealtimeStore, RedisStore};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod auth;
mod config;
mod error;
mod header;
mod likes;
mod middleware;
mod models;
mod navigation;
mod register;
mod routes;
mod state;
mod validation;

use crate::{
    config::{AppConfig, StoreBackend},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Bloggy web service");

    let config = AppConfig::from_env()?;

    let store: Arc<dyn RealtimeStore> = match &config.store {
        StoreBackend::Memory => {
            info!("Using in-memory realtime store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Redis(redis_config) => {
            let store = RedisStore::new(redis_config)?;
            if store.health_check().await? {
                info!("Redis connection successful");
            } else {
                anyhow::bail!("Failed to connect to Redis");
            }
            Arc::new(store)
        }
    };

    let app_state = AppState::with_in_memory_accounts(store);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Web service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
