/*!
Fixtures d'inventaire

Builder fluide pour composer des listes de ServerRecord, et la flotte
d'exemple utilisée dans les scénarios (3 hostnames, 1/2/0 actifs).
*/

use mta_optimizer::ServerRecord;

#[derive(Debug, Default, Clone)]
pub struct InventoryBuilder {
    records: Vec<ServerRecord>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self, ip: &str, hostname: &str) -> Self {
        self.records.push(ServerRecord::new(ip, hostname, true));
        self
    }

    pub fn inactive(mut self, ip: &str, hostname: &str) -> Self {
        self.records.push(ServerRecord::new(ip, hostname, false));
        self
    }

    /// Ajoute `count` enregistrements actifs avec des IPs 10.0.0.x
    pub fn active_many(mut self, hostname: &str, count: usize) -> Self {
        for i in 0..count {
            self.records.push(ServerRecord::new(format!("10.0.0.{}", i + 1), hostname, true));
        }
        self
    }

    pub fn build(self) -> Vec<ServerRecord> {
        self.records
    }

    pub fn to_json(&self) -> Vec<u8> {
        // Vec<ServerRecord> always serializes
        serde_json::to_vec(&self.records).unwrap_or_default()
    }
}

/// mta-prod-1: 1 actif, mta-prod-2: 2 actifs (+1 inactif), mta-prod-3: 0 actif
pub fn sample_fleet() -> InventoryBuilder {
    InventoryBuilder::new()
        .active("127.0.0.1", "mta-prod-1")
        .inactive("127.0.0.2", "mta-prod-2")
        .active("127.0.0.2", "mta-prod-2")
        .active("127.0.0.1", "mta-prod-2")
        .inactive("127.0.0.3", "mta-prod-3")
}
