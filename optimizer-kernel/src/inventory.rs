/**
 * INVENTORY SERVICE - Composes the record store and the evaluator
 *
 * ROLE :
 * One method per API operation. Each call is a straight pipeline
 * (exists -> fetch -> decode -> evaluate) that aborts on the first failure.
 *
 * HOW IT WORKS :
 * - Built once from the config and a shared store handle
 * - Decode failures are always surfaced, never replaced by an empty inventory
 * - add_mock_record is a read-modify-write of the whole blob (last write wins)
 */

use crate::config::OptimizerConfig;
use crate::error::ServiceError;
use crate::evaluator::{self, InefficientHostnames};
use crate::models::{ServerRecord, ServerRecords};
use crate::store::SharedStore;
use tracing::{debug, info, warn};

const NOT_FOUND_MESSAGE: &str = "server information not found";
const EMPTY_BODY_MESSAGE: &str = "request body cannot be empty. Please provide valid data";

#[derive(Clone)]
pub struct InventoryService {
    store: SharedStore,
    key: String,
    threshold: String,
}

impl InventoryService {
    pub fn new(store: SharedStore, key: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self { store, key: key.into(), threshold: threshold.into() }
    }

    pub fn from_config(store: SharedStore, cfg: &OptimizerConfig) -> Self {
        Self::new(store, cfg.storage.key.clone(), cfg.threshold.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Inefficient hostnames; an empty result is reported as an error.
    pub async fn inefficient_servers(&self) -> Result<InefficientHostnames, ServiceError> {
        let hostnames = self.hostnames().await?;
        if hostnames.is_empty() {
            info!(threshold = %self.threshold, "no inefficient servers");
            return Err(ServiceError::no_inefficient_servers());
        }
        Ok(hostnames)
    }

    /// Same evaluation as `inefficient_servers`, but an empty set is a valid answer.
    pub async fn hostnames(&self) -> Result<InefficientHostnames, ServiceError> {
        let records = self.load_records().await?;
        let hostnames = evaluator::evaluate(&records, &self.threshold).inspect_err(|e| {
            warn!(threshold = %self.threshold, error = %e, "threshold rejected");
        })?;
        info!(records = records.len(), inefficient = hostnames.len(), "inventory evaluated");
        Ok(hostnames)
    }

    /// Raw stored blob, returned as-is.
    pub async fn mock_data(&self) -> Result<Vec<u8>, ServiceError> {
        self.ensure_present().await?;
        self.fetch().await
    }

    /// Appends one record to the stored collection, creating it when absent.
    pub async fn add_mock_record(&self, body: &[u8]) -> Result<ServerRecord, ServiceError> {
        if body.is_empty() {
            return Err(ServiceError::bad_request(EMPTY_BODY_MESSAGE));
        }
        let record: ServerRecord = serde_json::from_slice(body).inspect_err(|e| {
            warn!(error = %e, "rejected mock record");
        })?;

        let mut records = if self.exists().await? {
            self.decode(&self.fetch().await?)?
        } else {
            debug!(key = %self.key, "no inventory yet, starting a new one");
            ServerRecords::new()
        };
        records.push(record.clone());

        let bytes = serde_json::to_vec(&records)?;
        self.store.store(&self.key, bytes).await.map_err(|e| {
            warn!(key = %self.key, error = %e, "failed to store inventory");
            ServiceError::from(e)
        })?;
        info!(hostname = %record.hostname, total = records.len(), "mock record added");
        Ok(record)
    }

    async fn load_records(&self) -> Result<ServerRecords, ServiceError> {
        self.ensure_present().await?;
        let bytes = self.fetch().await?;
        self.decode(&bytes)
    }

    async fn exists(&self) -> Result<bool, ServiceError> {
        self.store.exists(&self.key).await.map_err(|e| {
            warn!(key = %self.key, error = %e, "existence check failed");
            ServiceError::from(e)
        })
    }

    async fn ensure_present(&self) -> Result<(), ServiceError> {
        if self.exists().await? {
            Ok(())
        } else {
            Err(ServiceError::not_found(NOT_FOUND_MESSAGE))
        }
    }

    async fn fetch(&self) -> Result<Vec<u8>, ServiceError> {
        self.store.fetch(&self.key).await.map_err(|e| {
            warn!(key = %self.key, error = %e, "fetch failed");
            ServiceError::from(e)
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<ServerRecords, ServiceError> {
        serde_json::from_slice(bytes).map_err(|e| {
            warn!(key = %self.key, error = %e, "stored inventory is malformed");
            ServiceError::from(e)
        })
    }
}
