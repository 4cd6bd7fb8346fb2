use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource quota object for a namespace: hard limits and current usage.
///
/// Both maps hold Kubernetes quantity strings keyed by quota resource name,
/// e.g. `limits.cpu`, `requests.storage`, `requests.nvidia.com/gpu`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceQuota {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub hard: BTreeMap<String, String>,
    #[serde(default)]
    pub used: BTreeMap<String, String>,
}

/// Used vs. limit for one resource, rendered for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaStat {
    pub used: String,
    pub limit: String,
    pub unit: String,
    /// `used / limit` as a percentage, clamped to `[0, 100]`.
    pub percentage: f64,
}

/// All quota objects of one namespace folded into a single summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceQuota {
    pub namespace: String,
    pub cpu: QuotaStat,
    pub memory: QuotaStat,
    pub storage: QuotaStat,
    /// Allow-listed GPU quota keys only.
    pub gpu: BTreeMap<String, QuotaStat>,
}
