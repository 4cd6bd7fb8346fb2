use clap::Parser;
use pkg_api::server::{ServerConfig, start_server};
use pkg_constants::network::DEFAULT_API_PORT;
use pkg_constants::paths::{DEFAULT_SERVER_CONFIG, DEFAULT_SNAPSHOT_DIR};
use pkg_types::cluster::Cluster;
use pkg_types::config::{ServerConfigFile, load_config_file};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kheat-server", about = "Cluster utilization API server")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_SERVER_CONFIG)]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding one `<cluster-id>.yaml` snapshot per cluster
    #[arg(long)]
    snapshot_dir: Option<String>,

    /// Serve a cluster, as `id` or `id=Display Name` (repeatable)
    #[arg(long = "cluster")]
    clusters: Vec<String>,
}

fn parse_cluster(arg: &str) -> Cluster {
    match arg.split_once('=') {
        Some((id, name)) => Cluster {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
        },
        None => Cluster {
            id: arg.trim().to_string(),
            name: arg.trim().to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(DEFAULT_API_PORT);
    let snapshot_dir = cli
        .snapshot_dir
        .or(file_cfg.snapshot_dir)
        .unwrap_or_else(|| DEFAULT_SNAPSHOT_DIR.to_string());
    let clusters: Vec<Cluster> = if cli.clusters.is_empty() {
        file_cfg.clusters
    } else {
        cli.clusters.iter().map(|c| parse_cluster(c)).collect()
    };

    info!("Starting kheat-server");
    info!("  Port:          {}", port);
    info!("  Snapshot dir:  {}", snapshot_dir);
    info!("  Clusters:      {}", clusters.len());
    if clusters.is_empty() {
        warn!("No clusters configured; every cluster request will return 404");
    }

    let config = ServerConfig {
        addr: SocketAddr::from(([0, 0, 0, 0], port)),
        snapshot_dir: PathBuf::from(snapshot_dir),
        clusters,
    };

    start_server(config).await?;

    Ok(())
}
