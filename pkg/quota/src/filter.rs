//! Predicates used by quota aggregation and pod attribution.

use pkg_constants::resources::{GPU_RESOURCE_PREFIX, QUOTA_GPU_RESOURCES, WORKLOAD_NAMESPACE_PREFIX};

/// Namespaces whose pods count as user workloads.
pub fn is_workload_namespace(namespace: &str) -> bool {
    namespace.starts_with(WORKLOAD_NAMESPACE_PREFIX)
}

/// Container resource keys that count as GPUs (`nvidia.com/gpu`,
/// `nvidia.com/mig-1g.5gb`, ...).
pub fn is_gpu_resource(key: &str) -> bool {
    key.starts_with(GPU_RESOURCE_PREFIX)
}

/// Quota keys surfaced in the GPU section of the quota view: an exact match
/// or a suffix match against the allow-list, so `requests.nvidia.com/gpu`
/// passes while `requests.example.com/fpga` does not.
pub fn is_tracked_gpu_quota_key(key: &str) -> bool {
    QUOTA_GPU_RESOURCES
        .iter()
        .any(|target| key == *target || key.ends_with(target))
}
