use pkg_quantity::parse_quantity;
use pkg_types::pod::{Pod, PodGpuUsage};

use crate::filter::{is_gpu_resource, is_workload_namespace};

/// Attribute GPU usage on `node_name` to individual pods.
///
/// Stages run in this order:
/// 1. the namespace must carry the workload prefix;
/// 2. the pod must be assigned to `node_name`;
/// 3. GPU-family limits summed across all containers must be > 0.
pub fn attribute_gpu_pods(pods: &[Pod], node_name: &str) -> Vec<PodGpuUsage> {
    pods.iter()
        .filter(|p| is_workload_namespace(&p.namespace))
        .filter(|p| p.node_name.as_deref() == Some(node_name))
        .filter_map(|p| {
            let gpu_count = pod_gpu_limit(p);
            (gpu_count > 0.0).then(|| PodGpuUsage {
                namespace: p.namespace.clone(),
                name: p.name.clone(),
                gpu_count,
            })
        })
        .collect()
}

/// Sum of every GPU-family limit declared by the pod's containers.
pub fn pod_gpu_limit(pod: &Pod) -> f64 {
    pod.spec
        .containers
        .iter()
        .flat_map(|c| c.resources.limits.iter())
        .filter(|(key, _)| is_gpu_resource(key))
        .map(|(_, value)| parse_quantity(value))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::pod::{ContainerSpec, PodSpec, ResourceRequirements};
    use std::collections::BTreeMap;

    fn make_container(limits: &[(&str, &str)]) -> ContainerSpec {
        ContainerSpec {
            name: "main".to_string(),
            resources: ResourceRequirements {
                limits: limits
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                requests: BTreeMap::new(),
            },
        }
    }

    fn make_pod(namespace: &str, node: Option<&str>, containers: Vec<ContainerSpec>) -> Pod {
        Pod {
            name: "job-0".to_string(),
            namespace: namespace.to_string(),
            node_name: node.map(str::to_string),
            spec: PodSpec { containers },
        }
    }

    #[test]
    fn test_workload_pod_with_gpus_included() {
        let pod = make_pod(
            "aip-x",
            Some("gpu-1"),
            vec![make_container(&[("nvidia.com/gpu", "2")])],
        );
        let result = attribute_gpu_pods(&[pod], "gpu-1");
        assert_eq!(
            result,
            vec![PodGpuUsage {
                namespace: "aip-x".to_string(),
                name: "job-0".to_string(),
                gpu_count: 2.0,
            }]
        );
    }

    #[test]
    fn test_non_workload_namespace_excluded() {
        let pod = make_pod(
            "default",
            Some("gpu-1"),
            vec![make_container(&[("nvidia.com/gpu", "2")])],
        );
        assert!(attribute_gpu_pods(&[pod], "gpu-1").is_empty());
    }

    #[test]
    fn test_zero_gpu_limit_excluded() {
        let pod = make_pod(
            "aip-x",
            Some("gpu-1"),
            vec![make_container(&[("nvidia.com/gpu", "0"), ("cpu", "4")])],
        );
        assert!(attribute_gpu_pods(&[pod], "gpu-1").is_empty());
    }

    #[test]
    fn test_other_node_and_unassigned_excluded() {
        let limits = [("nvidia.com/gpu", "1")];
        let pods = vec![
            make_pod("aip-x", Some("gpu-2"), vec![make_container(&limits)]),
            make_pod("aip-x", None, vec![make_container(&limits)]),
        ];
        assert!(attribute_gpu_pods(&pods, "gpu-1").is_empty());
    }

    #[test]
    fn test_limits_summed_across_containers_and_profiles() {
        let pod = make_pod(
            "aip-inference",
            Some("mig-node-1"),
            vec![
                make_container(&[("nvidia.com/mig-1g.5gb", "1"), ("memory", "8Gi")]),
                make_container(&[("nvidia.com/mig-2g.10gb", "2")]),
                make_container(&[]),
            ],
        );
        let result = attribute_gpu_pods(&[pod], "mig-node-1");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].gpu_count, 3.0);
    }
}
