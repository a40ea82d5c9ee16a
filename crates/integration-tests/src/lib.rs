//! Test support for exercising the inventory synchronizer without a real
//! remote service.
//!
//! [`FakeCatalogApi`] implements the catalog contract over scripted,
//! per-call results. Each queued response may be gated on a oneshot so tests
//! can complete calls out of order deterministically.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::oneshot;
use url::Url;

use gearstock_client::{ApiError, CatalogApi, ClientConfig, Confirmation, SessionStore};
use gearstock_core::{Product, ProductDraft, ProductId, Role, Session};

/// Client configuration rooted in a test directory.
#[must_use]
pub fn config(dir: &Path) -> ClientConfig {
    ClientConfig {
        api_base_url: Url::parse("https://parts.example.com").expect("url"),
        data_dir: dir.to_path_buf(),
        request_timeout: Duration::from_secs(5),
    }
}

/// A catalog entry with the given id, quantity, and threshold.
#[must_use]
pub fn product(id: &str, name: &str, quantity: u32, threshold: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: "Spares".to_string(),
        price: Decimal::from(100),
        quantity,
        threshold,
        image: None,
    }
}

/// A valid draft for mutation tests.
#[must_use]
pub fn draft(name: &str, quantity: u32) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        category: "Electrical".to_string(),
        price: Decimal::from(50),
        quantity,
        threshold: 5,
        image_base64: None,
    }
}

/// A session store whose persisted session carries the given token, as if a
/// user had logged in on a previous run.
pub async fn logged_in_sessions(dir: &Path, token: &str) -> SessionStore {
    let session = Session {
        user_id: "64aa01".to_string(),
        name: "Asha Motors".to_string(),
        username: "asha".to_string(),
        role: Role::Owner,
        token: SecretString::from(token),
        logged_in_at: chrono::Utc::now(),
    };
    let bytes = serde_json::to_vec(&session).expect("serialize session");
    std::fs::create_dir_all(dir).expect("data dir");
    std::fs::write(dir.join("session.json"), bytes).expect("write session file");

    let sessions = SessionStore::new(&config(dir)).expect("session store");
    sessions.restore().await.expect("session restored");
    sessions
}

/// A session store with no persisted session.
#[must_use]
pub fn anonymous_sessions(dir: &Path) -> SessionStore {
    SessionStore::new(&config(dir)).expect("session store")
}

/// A genuine transport-level [`ApiError::Network`], produced by dialing a
/// port nothing listens on.
pub async fn network_error() -> ApiError {
    let err = reqwest::Client::new()
        .get("http://127.0.0.1:9/api/products")
        .timeout(Duration::from_secs(1))
        .send()
        .await
        .expect_err("connect to a closed port must fail");
    ApiError::Network(err)
}

type Scripted<T> = VecDeque<(Result<T, ApiError>, Option<oneshot::Receiver<()>>)>;

#[derive(Default)]
struct FakeState {
    list: Scripted<Vec<Product>>,
    create: Scripted<Product>,
    update: Scripted<Product>,
    delete: Scripted<Confirmation>,
    /// Operation log, including the credential each call carried.
    calls: Vec<String>,
}

/// Scripted implementation of the remote product service.
///
/// Each operation pops the next queued response for that endpoint; running
/// dry panics, which marks a mis-scripted test. Gated responses block until
/// the test releases them, so completion order is controllable.
#[derive(Clone, Default)]
pub struct FakeCatalogApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCatalogApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `list_all` response.
    pub fn push_list(&self, result: Result<Vec<Product>, ApiError>) {
        self.lock().list.push_back((result, None));
    }

    /// Queue a `list_all` response held until the returned sender fires.
    pub fn push_list_gated(
        &self,
        result: Result<Vec<Product>, ApiError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().list.push_back((result, Some(rx)));
        tx
    }

    /// Queue a `create` response.
    pub fn push_create(&self, result: Result<Product, ApiError>) {
        self.lock().create.push_back((result, None));
    }

    /// Queue an `update` response.
    pub fn push_update(&self, result: Result<Product, ApiError>) {
        self.lock().update.push_back((result, None));
    }

    /// Queue a `delete` response.
    pub fn push_delete(&self, result: Result<Confirmation, ApiError>) {
        self.lock().delete.push_back((result, None));
    }

    /// Every operation performed so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake api lock")
    }

    async fn take<T>(
        &self,
        call: String,
        pop: impl FnOnce(&mut FakeState) -> Option<(Result<T, ApiError>, Option<oneshot::Receiver<()>>)>,
    ) -> Result<T, ApiError> {
        let (result, gate) = {
            let mut state = self.lock();
            state.calls.push(call.clone());
            pop(&mut state).unwrap_or_else(|| panic!("no scripted response for {call}"))
        };
        if let Some(gate) = gate {
            gate.await.expect("gate sender dropped");
        }
        result
    }
}

impl CatalogApi for FakeCatalogApi {
    async fn list_all(&self, credential: &SecretString) -> Result<Vec<Product>, ApiError> {
        self.take(
            format!("list[{}]", credential.expose_secret()),
            |s| s.list.pop_front(),
        )
        .await
    }

    async fn create(
        &self,
        credential: &SecretString,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        self.take(
            format!("create[{}] {}", credential.expose_secret(), draft.name),
            |s| s.create.pop_front(),
        )
        .await
    }

    async fn update(
        &self,
        credential: &SecretString,
        id: &ProductId,
        _draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        self.take(
            format!("update[{}] {id}", credential.expose_secret()),
            |s| s.update.pop_front(),
        )
        .await
    }

    async fn delete(
        &self,
        credential: &SecretString,
        id: &ProductId,
    ) -> Result<Confirmation, ApiError> {
        self.take(
            format!("delete[{}] {id}", credential.expose_secret()),
            |s| s.delete.pop_front(),
        )
        .await
    }
}
