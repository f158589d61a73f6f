//! Service configuration from the environment

use anyhow::Result;
use common::RedisConfig;

/// Which realtime store backs the like ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis(RedisConfig),
}

/// Web service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    pub store: StoreBackend,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: Listen address (default: "0.0.0.0:3000")
    /// - `STORE_BACKEND`: `memory` or `redis` (default: "memory")
    /// - `REDIS_URL`, `REDIS_KEY_PREFIX`: see [`RedisConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".to_string());
        let store = match backend.to_ascii_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "redis" => StoreBackend::Redis(RedisConfig::from_env()?),
            other => anyhow::bail!("Unknown STORE_BACKEND '{}'", other),
        };

        Ok(AppConfig { bind_addr, store })
    }
}
