/*!
Test Harness pour l'API du kernel

Monte le routeur complet sur un store en mémoire (ou n'importe quel store)
et envoie des requêtes via `tower::ServiceExt::oneshot`, sans socket.
*/

use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use mta_optimizer::http::build_router;
use mta_optimizer::models::ErrorResponse;
use mta_optimizer::store::{MemoryRecordStore, SharedStore};
use mta_optimizer::{AppState, InventoryService};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

pub const DEFAULT_KEY: &str = "ip-config.json";

/// Harness de test complet pour l'API
pub struct TestHarness {
    /// Store en mémoire des harness `new`/`with_inventory` (vide pour `with_store`)
    pub store: MemoryRecordStore,
    shared: SharedStore,
    threshold: String,
    router: Router,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Décode le corps d'erreur `{"error", "statusCode"}`
    pub fn error(&self) -> anyhow::Result<ErrorResponse> {
        self.json()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestHarness {
    /// Harness sur un store en mémoire vide
    pub fn new(threshold: &str) -> Self {
        Self::on_memory(MemoryRecordStore::new(), threshold)
    }

    /// Harness dont le store contient déjà `bytes` à l'emplacement par défaut
    pub fn with_inventory(threshold: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Self::on_memory(MemoryRecordStore::with_object(DEFAULT_KEY, bytes), threshold)
    }

    /// Harness sur un store arbitraire (ex: FaultyStore)
    pub fn with_store(store: SharedStore, threshold: &str) -> Self {
        Self::build(MemoryRecordStore::new(), store, threshold)
    }

    /// Reconstruit le routeur sur le même store avec une clé d'API exigée
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.router = Self::router_for(self.shared.clone(), &self.threshold, Some(api_key));
        self
    }

    fn on_memory(store: MemoryRecordStore, threshold: &str) -> Self {
        let shared: SharedStore = Arc::new(store.clone());
        Self::build(store, shared, threshold)
    }

    fn build(store: MemoryRecordStore, shared: SharedStore, threshold: &str) -> Self {
        init_tracing();
        let router = Self::router_for(shared.clone(), threshold, None);
        Self { store, shared, threshold: threshold.to_string(), router }
    }

    fn router_for(store: SharedStore, threshold: &str, api_key: Option<&str>) -> Router {
        let inventory = InventoryService::new(store, DEFAULT_KEY, threshold);
        build_router(AppState::new(inventory).with_api_key(api_key.map(str::to_string)))
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<TestResponse> {
        self.send(Method::GET, uri, Body::empty(), &[]).await
    }

    pub async fn post(&self, uri: &str, body: impl Into<Body>) -> anyhow::Result<TestResponse> {
        self.send(Method::POST, uri, body.into(), &[("content-type", "application/json")]).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        headers: &[(&str, &str)],
    ) -> anyhow::Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let resp = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = resp.status();
        let body = body::to_bytes(resp.into_body(), usize::MAX).await?.to_vec();
        tracing::debug!(%status, bytes = body.len(), "test response");
        Ok(TestResponse { status, body })
    }
}

fn init_tracing() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault_store::{Fault, FaultyStore, StoreOp};
    use crate::fixtures::sample_fleet;
    use mta_optimizer::models::HostnameResponse;

    #[tokio::test]
    async fn test_harness_round_trip() {
        let harness = TestHarness::with_inventory("0", sample_fleet().to_json());
        let resp = harness.get("/inefficient-servers").await.unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        let hosts: HostnameResponse = resp.json().unwrap();
        assert_eq!(hosts.hostnames, vec!["mta-prod-3"]);
    }

    #[tokio::test]
    async fn test_harness_error_body() {
        let harness = TestHarness::new("1");
        let resp = harness.get("/mock-data").await.unwrap();
        let err = resp.error().unwrap();
        assert_eq!(err.status_code, 404);
        assert_eq!(err.error, "server information not found");
    }

    #[tokio::test]
    async fn test_api_key_keeps_injected_store() {
        let faulty = FaultyStore::new(MemoryRecordStore::with_object(DEFAULT_KEY, sample_fleet().to_json()));
        faulty.fail(StoreOp::Fetch, Fault::Backend("disk on fire".into()));
        let harness = TestHarness::with_store(Arc::new(faulty.clone()), "1").with_api_key("k");

        let resp = harness
            .send(Method::GET, "/inefficient-servers", Body::empty(), &[("x-api-key", "k")])
            .await
            .unwrap();
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(faulty.calls(), vec![StoreOp::Exists, StoreOp::Fetch]);
        assert_eq!(faulty.inner().len(), 1);
    }
}
