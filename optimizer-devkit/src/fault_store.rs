/*!
Store à pannes injectables

Enveloppe un RecordStore réel et permet de faire échouer exists/fetch/store
à la demande, pour tester la propagation des erreurs sans vrai backend.
Enregistre aussi l'ordre des appels pour les assertions.
*/

use async_trait::async_trait;
use mta_optimizer::store::{RecordStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Exists,
    Fetch,
    Store,
}

#[derive(Debug, Clone)]
pub enum Fault {
    /// Erreur backend (permission, réseau, service)
    Backend(String),
    NotFound,
}

#[derive(Clone)]
pub struct FaultyStore<S> {
    inner: S,
    faults: Arc<Mutex<HashMap<StoreOp, Fault>>>,
    calls: Arc<Mutex<Vec<StoreOp>>>,
}

impl<S: RecordStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fail(&self, op: StoreOp, fault: Fault) -> &Self {
        self.faults.lock().unwrap().insert(op, fault);
        self
    }

    pub fn heal(&self, op: StoreOp) -> &Self {
        self.faults.lock().unwrap().remove(&op);
        self
    }

    /// Opérations appelées, dans l'ordre
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, op: StoreOp, key: &str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        match self.faults.lock().unwrap().get(&op) {
            Some(Fault::Backend(msg)) => Err(StoreError::Backend(msg.clone())),
            Some(Fault::NotFound) => Err(StoreError::NotFound(key.to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for FaultyStore<S> {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check(StoreOp::Exists, key)?;
        self.inner.exists(key).await
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.check(StoreOp::Fetch, key)?;
        self.inner.fetch(key).await
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.check(StoreOp::Store, key)?;
        self.inner.store(key, bytes).await
    }

    fn backend(&self) -> &'static str {
        "faulty"
    }
}
