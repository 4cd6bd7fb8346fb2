use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;

/// Server configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// port: 3000
/// snapshot-dir: /var/lib/kheat/snapshots
/// clusters:
///   - id: cluster-1
///     name: production-cluster
///   - id: cluster-2
///     name: staging-cluster
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "snapshot-dir")]
    pub snapshot_dir: Option<String>,
    /// Clusters served by this instance. Empty means "none configured".
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
