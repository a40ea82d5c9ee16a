//! Gearstock client - inventory synchronization and caching layer.
//!
//! Mediates between an unreliable remote product service and a locally
//! persisted snapshot so a front end always has some catalog to render.
//!
//! # Architecture
//!
//! - [`session`] - authenticated identity, persisted across restarts
//! - [`api`] - stateless REST client for the remote product service
//! - [`cache`] - durable last-known-good catalog snapshot
//! - [`sync`] - the synchronizer owning the in-memory catalog
//! - [`scan`] - barcode lookup and the one-shot scan channel
//!
//! # Example
//!
//! ```rust,ignore
//! use gearstock_client::{config::ClientConfig, api::HttpCatalogClient};
//! use gearstock_client::{cache::CatalogCache, session::SessionStore};
//! use gearstock_client::sync::InventorySynchronizer;
//!
//! let config = ClientConfig::from_env()?;
//! let sessions = SessionStore::new(&config)?;
//! sessions.restore().await;
//!
//! let sync = InventorySynchronizer::new(
//!     HttpCatalogClient::new(&config)?,
//!     CatalogCache::new(&config),
//!     sessions.clone(),
//! );
//! sync.start().await;
//! let catalog = sync.products().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod scan;
pub mod session;
mod storage;
pub mod sync;

pub use api::{ApiError, CatalogApi, Confirmation, HttpCatalogClient};
pub use cache::CatalogCache;
pub use config::{ClientConfig, ConfigError};
pub use session::{AuthError, SessionStore};
pub use sync::{DataSource, InventorySynchronizer, SyncError, SyncStatus};
