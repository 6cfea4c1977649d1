use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::assigner::Assignment;
use crate::config::RunConfig;
use crate::record::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub created_at: String,
    pub generator: String,
    /// Seed the run actually used
    pub seed: u64,
    /// SHA-256 of the input snapshot, in input order
    pub input_digest: String,
    pub config: RunConfig,
    pub stats: RunStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub item_count: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub inner_unassigned: usize,
}

impl RunManifest {
    pub fn new(config: &RunConfig, seed: u64, items: &[Item], assignment: &Assignment) -> Self {
        let mut config = config.clone();
        config.seed = Some(seed);

        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now().to_rfc3339(),
            generator: format!("stratagroup v{}", env!("CARGO_PKG_VERSION")),
            seed,
            input_digest: input_digest(items),
            config,
            stats: RunStats {
                item_count: items.len(),
                assigned: assignment.assigned_count(),
                unassigned: assignment.unassigned.len(),
                inner_unassigned: assignment.inner_unassigned.len(),
            },
        }
    }
}

/// Hex SHA-256 over ids and attributes, so a rerun can confirm it saw the
/// same snapshot in the same order
pub fn input_digest(items: &[Item]) -> String {
    let mut hasher = Sha256::new();
    for item in items {
        hasher.update(item.id.as_bytes());
        for (name, value) in &item.attributes {
            hasher.update(b"\x1f");
            hasher.update(name.as_bytes());
            hasher.update(b"\x1d");
            hasher.update(value.as_bytes());
        }
        hasher.update(b"\x1e");
    }
    hex::encode(hasher.finalize())
}
