//! Filesystem path constants.

/// Default config file path for the server.
pub const DEFAULT_SERVER_CONFIG: &str = "/etc/kheat/config.yaml";

/// Default directory holding one snapshot file per cluster.
pub const DEFAULT_SNAPSHOT_DIR: &str = "/var/lib/kheat/snapshots";

/// Extension of cluster snapshot files inside the snapshot directory.
/// Full path = `<snapshot_dir>/<cluster-id>.SNAPSHOT_EXTENSION`.
pub const SNAPSHOT_EXTENSION: &str = "yaml";
