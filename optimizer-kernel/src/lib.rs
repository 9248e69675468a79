//! MTA hosting optimizer: finds hostnames whose number of active MTA servers
//! is at or below a configured threshold, from an inventory kept in a
//! single-object record store.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod health;
pub mod http;
pub mod inventory;
pub mod models;
pub mod state;
pub mod store;

pub use error::{ErrorKind, ServiceError};
pub use inventory::InventoryService;
pub use models::ServerRecord;
pub use state::AppState;
