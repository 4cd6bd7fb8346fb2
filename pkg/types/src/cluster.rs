use serde::{Deserialize, Serialize};

/// A monitored cluster as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Stable identifier; also the snapshot file stem.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
}
