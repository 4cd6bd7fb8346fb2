//! Resource keys, allow-lists, and display markers.

// ─── Workloads ────────────────────────────────────────────────────────────

/// Only pods in namespaces with this prefix are attributed GPU usage.
pub const WORKLOAD_NAMESPACE_PREFIX: &str = "aip-";

/// Container limit keys starting with this prefix count toward a pod's GPUs.
pub const GPU_RESOURCE_PREFIX: &str = "nvidia.com/";

/// Resource key for a whole (non-MIG) GPU.
pub const GPU_RESOURCE_NAME: &str = "nvidia.com/gpu";

// ─── Quota ────────────────────────────────────────────────────────────────

/// Quota key summed into the CPU limit/used pair.
pub const QUOTA_CPU_KEY: &str = "limits.cpu";

/// Quota key summed into the memory limit/used pair.
pub const QUOTA_MEMORY_KEY: &str = "limits.memory";

/// Quota key summed into the storage limit/used pair.
pub const QUOTA_STORAGE_KEY: &str = "requests.storage";

/// GPU resources surfaced in the quota view. A quota key is kept when it
/// equals or ends with one of these, e.g. `requests.nvidia.com/mig-1g.5gb`.
pub const QUOTA_GPU_RESOURCES: &[&str] = &[
    "nvidia.com/gpu",
    "nvidia.com/mig-1g.5gb",
    "nvidia.com/mig-2g.10gb",
    "nvidia.com/mig-3g.20gb",
    "nvidia.com/mig-4g.20gb",
    "nvidia.com/mig-7g.40gb",
];

// ─── Display ──────────────────────────────────────────────────────────────

/// Placeholder for inventory fields that no source reported.
pub const UNKNOWN_MARKER: &str = "N/A";

/// Unit label for CPU quota figures.
pub const CPU_UNIT: &str = "cores";

/// Unit label for memory and storage quota figures.
pub const BYTES_UNIT: &str = "Gi";

/// Unit label for GPU quota figures.
pub const GPU_UNIT: &str = "devices";
