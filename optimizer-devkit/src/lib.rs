/*!
# MTA Optimizer DevKit - Stubs et utilitaires de test

Bibliothèque facilitant les tests du kernel avec:
- Fixtures d'inventaire (builder de ServerRecord, flotte d'exemple)
- Store à pannes injectables autour de n'importe quel RecordStore
- Harness HTTP qui pilote le routeur sans ouvrir de socket
*/

pub mod fault_store;
pub mod fixtures;
pub mod test_utils;

pub use fault_store::{Fault, FaultyStore, StoreOp};
pub use fixtures::{sample_fleet, InventoryBuilder};
pub use test_utils::{TestHarness, TestResponse, DEFAULT_KEY};
