use crate::health::HealthTracker;
use crate::inventory::InventoryService;
use parking_lot::Mutex;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Single state shared by every axum handler
#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub health: HealthTracker,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(inventory: InventoryService) -> Self {
        Self { inventory, health: HealthTracker::new(), api_key: None }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty()).map(Arc::from);
        self
    }
}
