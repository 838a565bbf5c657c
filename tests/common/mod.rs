use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use formvault::config::{Config, EnvelopeStyle};
use formvault::storage::{BlobStore, MemoryStore, StorageError};

/// A running test server backed by an in-memory store. For the failing and
/// unconfigured variants the store handle is unwired and stays empty.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON payload to the contact endpoint, return (body, status).
    pub async fn submit(&self, payload: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .json(payload)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST raw bytes as JSON, return the body as text for plain-text
    /// envelope assertions.
    pub async fn submit_raw(&self, body: &'static str) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        (text, status)
    }
}

fn test_config(envelope: EnvelopeStyle) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        envelope,
        cors_allow_origin: "*".parse().unwrap(),
        static_dir: "static".to_string(),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        storage: None,
    }
}

async fn spawn_with(store: Option<Arc<dyn BlobStore>>, envelope: EnvelopeStyle) -> (SocketAddr, Client) {
    let app = formvault::build_app(store, test_config(envelope));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    (addr, client)
}

/// Spawn a test server with the default (correlated) envelope.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_envelope(EnvelopeStyle::Correlated).await
}

pub async fn spawn_app_with_envelope(envelope: EnvelopeStyle) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (addr, client) = spawn_with(Some(store.clone()), envelope).await;
    TestApp {
        addr,
        client,
        store,
    }
}

/// Server with no storage configured at all.
pub async fn spawn_unconfigured_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (addr, client) = spawn_with(None, EnvelopeStyle::Correlated).await;
    TestApp {
        addr,
        client,
        store,
    }
}

/// Server whose storage accepts the container but rejects every upload.
pub async fn spawn_failing_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (addr, client) = spawn_with(Some(Arc::new(FailingStore)), EnvelopeStyle::Correlated).await;
    TestApp {
        addr,
        client,
        store,
    }
}

struct FailingStore;

#[async_trait::async_trait]
impl BlobStore for FailingStore {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put_object(&self, _: &str, _: Vec<u8>, _: &str) -> Result<(), StorageError> {
        Err(StorageError::from("upload rejected by backend"))
    }

    async fn fetch_object(&self, _: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }
}
