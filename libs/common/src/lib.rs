//! Common library for the Bloggy application
//!
//! This crate provides the path-addressed realtime store shared by the blog
//! services, with an in-memory backend and a Redis backend.
//!
//! ```rust,no_run
//! use common::store::{MemoryStore, RealtimeStore, StorePath};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     let path = StorePath::parse("likes/post-1")?;
//!     let mut children = serde_json::Map::new();
//!     children.insert("user-1".to_string(), serde_json::Value::Bool(true));
//!     store.update(&path, children).await?;
//!     println!("{:?}", store.get(&path).await?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod redis_store;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use redis_store::{RedisConfig, RedisStore};
pub use store::{MemoryStore, RealtimeStore, StorePath};
