//! Inventory synchronizer: the owner of the in-memory catalog.
//!
//! Orchestrates fetch-vs-cache fallback and keeps memory, cache, and remote
//! state in agreement across create/update/delete. Interior state lives
//! behind a single `RwLock` (the write guard is held across the cache write
//! so memory and disk cannot diverge), and every catalog-affecting operation
//! carries a monotonically increasing sequence number: a response that
//! completes after a newer operation has already applied is discarded
//! instead of clobbering it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use gearstock_core::{Product, ProductDraft, ProductId, ValidationError};

use crate::api::{ApiError, CatalogApi, Confirmation};
use crate::cache::CatalogCache;
use crate::session::SessionStore;

/// Errors surfaced by synchronizer mutations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Operation attempted with no credential; no network call was made.
    #[error("not logged in")]
    Unauthenticated,

    /// Draft rejected before any network call.
    #[error("invalid product: {0}")]
    Validation(#[from] ValidationError),

    /// Remote call failed; the catalog is untouched.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where the catalog currently being served came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Replaced wholesale by a successful remote fetch.
    Remote,
    /// Adopted from the durable snapshot (startup or fetch fallback).
    Cache,
    /// Nothing loaded yet.
    #[default]
    Empty,
}

/// Observable synchronizer state for presentation layers.
#[derive(Debug, Clone)]
pub struct SyncStatus {
    /// Origin of the catalog being served.
    pub source: DataSource,
    /// True when cached data is being presented in place of live data.
    pub stale: bool,
    /// True while a fetch is in flight.
    pub loading: bool,
    /// Diagnostic from the most recent failed fetch, cleared on success.
    pub last_error: Option<String>,
    /// Number of products currently held.
    pub len: usize,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    source: DataSource,
    stale: bool,
    loading: bool,
    last_error: Option<String>,
    /// Sequence number of the last applied catalog-affecting operation.
    applied_seq: u64,
}

/// Owns the in-memory catalog and mediates remote/cache consistency.
///
/// Cheaply cloneable; all clones share the same catalog. Presentation code
/// never mutates the catalog directly.
pub struct InventorySynchronizer<C: CatalogApi> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    api: C,
    cache: CatalogCache,
    sessions: SessionStore,
    seq: AtomicU64,
    state: RwLock<CatalogState>,
}

impl<C: CatalogApi> Clone for InventorySynchronizer<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CatalogApi> InventorySynchronizer<C> {
    /// Create a synchronizer with an empty catalog. Call [`Self::start`]
    /// once at startup.
    pub fn new(api: C, cache: CatalogCache, sessions: SessionStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                cache,
                sessions,
                seq: AtomicU64::new(0),
                state: RwLock::new(CatalogState::default()),
            }),
        }
    }

    /// Startup sequence: adopt the cache snapshot immediately so the first
    /// paint never blocks on network, then fetch if a credential is present.
    pub async fn start(&self) {
        if let Some(snapshot) = self.inner.cache.load().await {
            let seq = self.next_seq();
            let mut state = self.inner.state.write().await;
            if seq > state.applied_seq {
                debug!(len = snapshot.len(), "catalog populated from snapshot");
                state.applied_seq = seq;
                state.products = snapshot;
                state.source = DataSource::Cache;
                state.stale = true;
            }
        }

        if self.inner.sessions.credential().await.is_some() {
            self.refresh().await;
        }
    }

    /// Fetch the full catalog from the remote service.
    ///
    /// On success the in-memory catalog is replaced wholesale and persisted.
    /// On failure the last snapshot is adopted when available; either way the
    /// failure is recorded in [`SyncStatus::last_error`] rather than
    /// returned - a failed refresh must never blank a previously populated
    /// view. With no credential this is a no-op. No retry, no backoff.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let Some(credential) = self.inner.sessions.credential().await else {
            debug!("no credential, serving cached or empty catalog");
            return;
        };

        let seq = self.next_seq();
        self.inner.state.write().await.loading = true;

        match self.inner.api.list_all(&credential).await {
            Ok(products) => {
                let mut state = self.inner.state.write().await;
                state.loading = false;
                if seq <= state.applied_seq {
                    debug!(seq, applied = state.applied_seq, "discarding stale fetch result");
                    return;
                }
                state.applied_seq = seq;
                state.products = products;
                state.source = DataSource::Remote;
                state.stale = false;
                state.last_error = None;
                info!(len = state.products.len(), "catalog refreshed from remote");

                if let Err(e) = self.inner.cache.save(&state.products).await {
                    error!(error = %e, "failed to persist catalog snapshot");
                }
            }
            Err(e) => {
                warn!(error = %e, "catalog fetch failed, trying snapshot fallback");
                let fallback = self.inner.cache.load().await;

                let mut state = self.inner.state.write().await;
                state.loading = false;
                if seq <= state.applied_seq {
                    debug!(seq, applied = state.applied_seq, "discarding stale fetch failure");
                    return;
                }
                state.applied_seq = seq;
                state.last_error = Some(e.to_string());
                if let Some(snapshot) = fallback {
                    state.products = snapshot;
                    state.source = DataSource::Cache;
                    state.stale = true;
                }
                // No snapshot: leave the catalog as it was, error flag set.
            }
        }
    }

    /// Create a product on the remote service and append the server's
    /// returned product (server-assigned id) to the catalog.
    ///
    /// # Errors
    ///
    /// Fails with `Unauthenticated` before any network call when no
    /// credential is present, `Validation` for an incomplete draft, and the
    /// remote failure otherwise - in every error case the catalog is exactly
    /// as it was before the call.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add(&self, draft: &ProductDraft) -> Result<Product, SyncError> {
        let credential = self.credential().await?;
        draft.validate()?;

        let seq = self.next_seq();
        let product = self.inner.api.create(&credential, draft).await?;

        let mut state = self.inner.state.write().await;
        if seq > state.applied_seq {
            state.applied_seq = seq;
            // The server assigns ids, but uniqueness is our invariant to keep.
            if let Some(existing) = state.products.iter_mut().find(|p| p.id == product.id) {
                *existing = product.clone();
            } else {
                state.products.push(product.clone());
            }
            self.persist(&state).await;
        }
        Ok(product)
    }

    /// Update a product on the remote service and replace the matching
    /// catalog entry by value with the server's response.
    ///
    /// A missing in-memory entry makes the replacement a no-op on the
    /// catalog; the snapshot is still rewritten.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::add`]; `NotFound` surfaces when the target
    /// is absent server-side.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, SyncError> {
        let credential = self.credential().await?;
        draft.validate()?;

        let seq = self.next_seq();
        let product = self.inner.api.update(&credential, id, draft).await?;

        let mut state = self.inner.state.write().await;
        if seq > state.applied_seq {
            state.applied_seq = seq;
            if let Some(existing) = state.products.iter_mut().find(|p| p.id == *id) {
                *existing = product.clone();
            }
            self.persist(&state).await;
        }
        Ok(product)
    }

    /// Delete a product on the remote service and drop the matching entry.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::add`].
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: &ProductId) -> Result<Confirmation, SyncError> {
        let credential = self.credential().await?;

        let seq = self.next_seq();
        let confirmation = self.inner.api.delete(&credential, id).await?;

        let mut state = self.inner.state.write().await;
        if seq > state.applied_seq {
            state.applied_seq = seq;
            state.products.retain(|p| p.id != *id);
            self.persist(&state).await;
        }
        Ok(confirmation)
    }

    /// A copy of the current catalog, in catalog order.
    pub async fn products(&self) -> Vec<Product> {
        self.inner.state.read().await.products.clone()
    }

    /// Observable synchronizer state.
    pub async fn status(&self) -> SyncStatus {
        let state = self.inner.state.read().await;
        SyncStatus {
            source: state.source,
            stale: state.stale,
            loading: state.loading,
            last_error: state.last_error.clone(),
            len: state.products.len(),
        }
    }

    fn next_seq(&self) -> u64 {
        self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn credential(&self) -> Result<SecretString, SyncError> {
        self.inner
            .sessions
            .credential()
            .await
            .ok_or(SyncError::Unauthenticated)
    }

    /// Best-effort snapshot write after a confirmed mutation. The remote is
    /// authoritative at this point; a failed write only costs fallback
    /// freshness, so it is logged rather than propagated.
    async fn persist(&self, state: &CatalogState) {
        if let Err(e) = self.inner.cache.save(&state.products).await {
            error!(error = %e, "failed to persist catalog snapshot");
        }
    }
}
