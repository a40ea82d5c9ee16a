//! End-to-end scenarios for the inventory synchronizer: fetch-vs-cache
//! fallback, optimistic-confirmed mutations, and credential gating.

use gearstock_client::{ApiError, CatalogCache, DataSource, InventorySynchronizer, SyncError};
use gearstock_core::{ProductId, stats};
use gearstock_integration_tests::{
    FakeCatalogApi, anonymous_sessions, config, draft, logged_in_sessions, network_error, product,
};

fn synchronizer(
    api: &FakeCatalogApi,
    dir: &std::path::Path,
    sessions: gearstock_client::SessionStore,
) -> InventorySynchronizer<FakeCatalogApi> {
    InventorySynchronizer::new(api.clone(), CatalogCache::new(&config(dir)), sessions)
}

/// Scenario A: empty cache, successful first fetch. The low-stock view sees
/// the fetched entry and the snapshot now holds it.
#[tokio::test]
async fn first_fetch_populates_catalog_and_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Ok(vec![product("1", "Pad", 2, 5)]));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    let catalog = sync.products().await;
    assert_eq!(catalog.len(), 1);

    let low = stats::low_stock(&catalog);
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Pad");

    let status = sync.status().await;
    assert_eq!(status.source, DataSource::Remote);
    assert!(!status.stale);
    assert!(status.last_error.is_none());

    // The snapshot was written through
    let snapshot = CatalogCache::new(&config(dir.path())).load().await;
    assert_eq!(snapshot, Some(catalog));
}

/// Scenario B: a populated cache and a network failure. The cached entry is
/// served instead of a blank catalog, flagged stale with a diagnostic.
#[tokio::test]
async fn fetch_failure_falls_back_to_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cached = vec![product("1", "Pad", 10, 5)];
    CatalogCache::new(&config(dir.path()))
        .save(&cached)
        .await
        .expect("seed snapshot");

    let api = FakeCatalogApi::new();
    api.push_list(Err(network_error().await));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    assert_eq!(sync.products().await, cached);

    let status = sync.status().await;
    assert_eq!(status.source, DataSource::Cache);
    assert!(status.stale);
    assert!(status.last_error.is_some(), "diagnostic must be recorded");
    assert!(!status.loading);
}

/// Fetch failure with no snapshot at all: the catalog stays empty but the
/// state is still observable as ready-with-diagnostic, not a hard error.
#[tokio::test]
async fn fetch_failure_without_snapshot_keeps_empty_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Err(network_error().await));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    assert!(sync.products().await.is_empty());
    let status = sync.status().await;
    assert_eq!(status.source, DataSource::Empty);
    assert!(status.last_error.is_some());
}

/// Scenario C: a successful create appends the server's product (with its
/// server-assigned id) and rewrites the snapshot with both entries.
#[tokio::test]
async fn add_appends_server_product_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Ok(vec![product("1", "Pad", 2, 5)]));
    api.push_create(Ok(product("2", "Plug", 3, 5)));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    let created = sync.add(&draft("Plug", 3)).await.expect("add");
    assert_eq!(created.id, ProductId::new("2"));

    let catalog = sync.products().await;
    assert_eq!(catalog.len(), 2);

    let snapshot = CatalogCache::new(&config(dir.path())).load().await;
    assert_eq!(snapshot, Some(catalog));
}

/// Scenario D: a failed update leaves the catalog exactly as it was.
#[tokio::test]
async fn failed_update_leaves_catalog_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Ok(vec![product("2", "Plug", 3, 5)]));
    api.push_update(Err(ApiError::NotFound("Product not found".to_string())));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    let before = sync.products().await;
    let result = sync.update(&ProductId::new("2"), &draft("Plug", 0)).await;
    assert!(matches!(
        result,
        Err(SyncError::Api(ApiError::NotFound(_)))
    ));

    let after = sync.products().await;
    assert_eq!(after, before);
    assert_eq!(after[0].quantity, 3, "quantity must remain as fetched");
}

/// Scenario E: with no credential, mutations fail before any network call
/// and the catalog is untouched.
#[tokio::test]
async fn unauthenticated_add_makes_no_network_call() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();

    let sync = synchronizer(&api, dir.path(), anonymous_sessions(dir.path()));
    sync.start().await;

    let result = sync.add(&draft("Plug", 3)).await;
    assert!(matches!(result, Err(SyncError::Unauthenticated)));
    assert!(api.calls().is_empty(), "no call may reach the remote");
    assert!(sync.products().await.is_empty());
}

/// An invalid draft is rejected before the remote sees it.
#[tokio::test]
async fn invalid_draft_rejected_before_network() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Ok(vec![]));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    let result = sync.add(&draft("", 3)).await;
    assert!(matches!(result, Err(SyncError::Validation(_))));
    assert_eq!(api.calls(), vec!["list[tok-1]"], "only the startup fetch ran");
}

/// A successful remove drops the entry and persists the smaller catalog.
#[tokio::test]
async fn remove_drops_entry_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Ok(vec![
        product("1", "Pad", 2, 5),
        product("2", "Plug", 3, 5),
    ]));
    api.push_delete(Ok(gearstock_client::Confirmation::default()));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    sync.remove(&ProductId::new("1")).await.expect("remove");

    let catalog = sync.products().await;
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].id, ProductId::new("2"));

    let snapshot = CatalogCache::new(&config(dir.path())).load().await;
    assert_eq!(snapshot, Some(catalog));
}

/// Updating an id the catalog does not hold is a no-op on memory, but the
/// snapshot is still rewritten and the server's product returned.
#[tokio::test]
async fn update_of_unknown_id_is_noop_on_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = FakeCatalogApi::new();
    api.push_list(Ok(vec![product("1", "Pad", 2, 5)]));
    api.push_update(Ok(product("9", "Ghost", 7, 5)));

    let sessions = logged_in_sessions(dir.path(), "tok-1").await;
    let sync = synchronizer(&api, dir.path(), sessions);
    sync.start().await;

    let updated = sync
        .update(&ProductId::new("9"), &draft("Ghost", 7))
        .await
        .expect("update");
    assert_eq!(updated.id, ProductId::new("9"));

    let catalog = sync.products().await;
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].id, ProductId::new("1"));
}
