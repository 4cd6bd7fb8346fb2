//! Namespace quota aggregation and per-pod GPU attribution.

pub mod filter;
pub mod pods;

use pkg_constants::resources::{
    BYTES_UNIT, CPU_UNIT, GPU_UNIT, QUOTA_CPU_KEY, QUOTA_MEMORY_KEY, QUOTA_STORAGE_KEY,
};
use pkg_quantity::{format_bytes, format_cores, format_count, parse_quantity, usage_percentage};
use pkg_types::quota::{NamespaceQuota, QuotaStat, ResourceQuota};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::filter::is_tracked_gpu_quota_key;

/// Running used/limit sums for one resource.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    used: f64,
    limit: f64,
}

impl Tally {
    fn add(&mut self, quota: &ResourceQuota, key: &str) {
        self.limit += quota.hard.get(key).map_or(0.0, |v| parse_quantity(v));
        self.used += quota.used.get(key).map_or(0.0, |v| parse_quantity(v));
    }

    fn render(self, format: fn(f64) -> String, unit: &str) -> QuotaStat {
        QuotaStat {
            used: format(self.used),
            limit: format(self.limit),
            unit: unit.to_string(),
            percentage: usage_percentage(self.used, self.limit),
        }
    }
}

/// Fold every quota object of one namespace into a single summary.
///
/// The namespace is taken from the first object; objects from any other
/// namespace are skipped. CPU, memory, and storage are summed across objects
/// (missing keys count as zero); GPU keys are kept only if allow-listed.
/// Returns `None` for an empty list so callers can tell "no quota" from
/// "zero quota".
pub fn aggregate_quota(objects: &[ResourceQuota]) -> Option<NamespaceQuota> {
    let namespace = &objects.first()?.namespace;

    let mut cpu = Tally::default();
    let mut memory = Tally::default();
    let mut storage = Tally::default();
    let mut gpu: BTreeMap<String, Tally> = BTreeMap::new();

    for quota in objects {
        if &quota.namespace != namespace {
            warn!(
                "Quota {} belongs to {}, not {}; skipping",
                quota.name, quota.namespace, namespace
            );
            continue;
        }
        cpu.add(quota, QUOTA_CPU_KEY);
        memory.add(quota, QUOTA_MEMORY_KEY);
        storage.add(quota, QUOTA_STORAGE_KEY);

        for key in tracked_gpu_keys(quota) {
            gpu.entry(key.to_string()).or_default().add(quota, key);
        }
    }

    Some(NamespaceQuota {
        namespace: namespace.clone(),
        cpu: cpu.render(format_cores, CPU_UNIT),
        memory: memory.render(format_bytes, BYTES_UNIT),
        storage: storage.render(format_bytes, BYTES_UNIT),
        gpu: gpu
            .into_iter()
            .map(|(key, tally)| (key, tally.render(format_count, GPU_UNIT)))
            .collect(),
    })
}

/// Distinct allow-listed GPU keys across `hard` and `used`.
fn tracked_gpu_keys(quota: &ResourceQuota) -> Vec<&str> {
    let mut keys: Vec<&str> = quota
        .hard
        .keys()
        .chain(quota.used.keys())
        .map(String::as_str)
        .filter(|k| is_tracked_gpu_quota_key(k))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Group quota objects by namespace and aggregate each group. Output is
/// ordered by namespace.
pub fn aggregate_by_namespace(objects: &[ResourceQuota]) -> Vec<NamespaceQuota> {
    let mut groups: BTreeMap<&str, Vec<ResourceQuota>> = BTreeMap::new();
    for quota in objects {
        groups
            .entry(quota.namespace.as_str())
            .or_default()
            .push(quota.clone());
    }
    groups
        .into_values()
        .filter_map(|group| aggregate_quota(&group))
        .collect()
}

/// Aggregate per-namespace listing results, isolating failures.
///
/// A namespace whose listing failed is dropped (and logged). Objects from the
/// successful listings are merged by their own namespace, so each namespace
/// gets exactly one summary no matter which listing returned its objects.
/// Output is ordered by namespace.
pub fn collect_namespace_quotas(
    listings: Vec<(String, anyhow::Result<Vec<ResourceQuota>>)>,
) -> Vec<NamespaceQuota> {
    let mut objects = Vec::new();
    for (namespace, listing) in listings {
        match listing {
            Ok(found) if found.is_empty() => {
                debug!("No quota objects in namespace {}", namespace);
            }
            Ok(found) => objects.extend(found),
            Err(e) => {
                warn!("Dropping namespace {}: quota listing failed: {}", namespace, e);
            }
        }
    }
    aggregate_by_namespace(&objects)
}
