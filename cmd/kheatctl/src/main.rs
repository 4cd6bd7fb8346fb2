use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use pkg_constants::network::DEFAULT_API_ADDR;
use pkg_constants::resources::{GPU_RESOURCE_PREFIX, UNKNOWN_MARKER};
use pkg_types::cluster::Cluster;
use pkg_types::node::NodeView;
use pkg_types::pod::PodGpuUsage;
use pkg_types::quota::{NamespaceQuota, QuotaStat};
use serde::de::DeserializeOwned;
use tracing::info;

/// Cells in a usage bar.
const BAR_CELLS: usize = 10;

#[derive(Parser)]
#[command(name = "kheatctl", about = "CLI for kheat cluster utilization")]
struct Cli {
    /// Server API endpoint
    #[arg(long, default_value = DEFAULT_API_ADDR)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List monitored clusters
    Clusters,
    /// Per-node utilization
    Nodes {
        #[arg(long)]
        cluster: String,
        /// Resource to chart
        #[arg(long, value_enum, default_value_t = ResourceKind::Cpu)]
        resource: ResourceKind,
    },
    /// Per-namespace quota usage
    Quotas {
        #[arg(long)]
        cluster: String,
    },
    /// GPU workloads on one node
    Pods {
        #[arg(long)]
        cluster: String,
        #[arg(long)]
        node: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ResourceKind {
    Cpu,
    Memory,
    Gpu,
}

impl ResourceKind {
    fn percentage(self, node: &NodeView) -> Option<f64> {
        match self {
            ResourceKind::Cpu => node.cpu_usage_percentage(),
            ResourceKind::Memory => node.memory_usage_percentage(),
            ResourceKind::Gpu => node.gpu_usage_percentage,
        }
    }
}

/// Ten-cell bar with `round(pct / 100 * cells)` cells filled.
fn usage_bar(pct: Option<f64>, cells: usize) -> String {
    let Some(pct) = pct else {
        return "·".repeat(cells);
    };
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * cells as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn percent(pct: Option<f64>) -> String {
    pct.map(|p| format!("{:.1}%", p))
        .unwrap_or_else(|| UNKNOWN_MARKER.to_string())
}

fn short_profile(key: &str) -> &str {
    key.strip_prefix(GPU_RESOURCE_PREFIX).unwrap_or(key)
}

fn quota_cell(stat: &QuotaStat) -> String {
    format!("{}/{} {} ({:.0}%)", stat.used, stat.limit, stat.unit, stat.percentage)
}

async fn fetch<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> anyhow::Result<T> {
    info!("GET {}", url);
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("server returned {}: {}", status, body);
    }
    Ok(resp.json().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    let client = reqwest::Client::new();
    let base = cli.server.trim_end_matches('/');

    match &cli.command {
        Commands::Clusters => {
            let clusters: Vec<Cluster> = fetch(&client, &format!("{}/api/v1/clusters", base)).await?;
            println!("{:<20} {}", "ID", "NAME");
            for c in &clusters {
                println!("{:<20} {}", c.id, c.name);
            }
            if clusters.is_empty() {
                println!("(no clusters configured)");
            }
        }
        Commands::Nodes { cluster, resource } => {
            let url = format!("{}/api/v1/clusters/{}/nodes", base, cluster);
            let nodes: Vec<NodeView> = fetch(&client, &url).await?;

            println!(
                "{:<24} {:<12} {:<8} {:<8} {:<8} {}",
                "NAME", "CHART", "CPU", "MEM", "GPU", "GPU PODS"
            );
            for node in &nodes {
                let name = if node.unschedulable {
                    format!("{} (cordoned)", node.name)
                } else {
                    node.name.clone()
                };
                println!(
                    "{:<24} {:<12} {:<8} {:<8} {:<8} {}",
                    name,
                    usage_bar(resource.percentage(node), BAR_CELLS),
                    percent(node.cpu_usage_percentage()),
                    percent(node.memory_usage_percentage()),
                    percent(node.gpu_usage_percentage),
                    node.pods.len()
                );
                for (key, gpu) in &node.gpus {
                    println!(
                        "  {:<22} cap={} alloc={} usage={}",
                        short_profile(key),
                        gpu.capacity,
                        gpu.allocatable,
                        percent(gpu.usage_percentage)
                    );
                }
            }
            if nodes.is_empty() {
                println!("(no nodes)");
            }
        }
        Commands::Quotas { cluster } => {
            let url = format!("{}/api/v1/clusters/{}/quotas", base, cluster);
            let quotas: Vec<NamespaceQuota> = fetch(&client, &url).await?;
            for q in &quotas {
                println!("{}", q.namespace);
                println!("  {:<10} {}", "CPU", quota_cell(&q.cpu));
                println!("  {:<10} {}", "Memory", quota_cell(&q.memory));
                println!("  {:<10} {}", "Storage", quota_cell(&q.storage));
                if q.gpu.is_empty() {
                    println!("  {:<10} none", "GPU");
                }
                for (key, stat) in &q.gpu {
                    println!("  {:<10} {} {}", "GPU", short_profile(key), quota_cell(stat));
                }
            }
            if quotas.is_empty() {
                println!("(no namespace quotas)");
            }
        }
        Commands::Pods { cluster, node } => {
            let url = format!("{}/api/v1/clusters/{}/nodes/{}/pods", base, cluster, node);
            let pods: Vec<PodGpuUsage> = fetch(&client, &url).await?;
            println!("{:<24} {:<32} {}", "NAMESPACE", "NAME", "GPUS");
            for p in &pods {
                println!("{:<24} {:<32} {}", p.namespace, p.name, p.gpu_count);
            }
            if pods.is_empty() {
                println!("(no GPU workloads on {})", node);
            }
        }
    }

    Ok(())
}
