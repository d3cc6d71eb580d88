use clap::{Parser, Subcommand};
use replikv_http::{init_tracing, serve, KvClient};
use replikv_replication::config::DEFAULT_BIND_HOST;
use replikv_replication::NodeConfig;
use std::path::PathBuf;

mod shell;

#[derive(Parser)]
#[command(name = "replikv", about = "Replicated in-memory key-value store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a node
    Serve(ServeArgs),
    /// Interactive shell against a running node
    Client {
        /// Port of the node to talk to
        port: u16,
        #[arg(long, env = "REPLIKV_HOST", default_value = DEFAULT_BIND_HOST)]
        host: String,
    },
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Port to listen on
    #[arg(required_unless_present = "config")]
    port: Option<u16>,
    /// Comma separated peer ports, e.g. "5002,5003"
    #[arg(default_value = "")]
    peer_ports: String,
    #[arg(long, env = "REPLIKV_BIND_HOST", default_value = DEFAULT_BIND_HOST)]
    bind_host: String,
    /// Per-peer replication timeout in ms (2000 if unset); overrides the config file
    #[arg(long, env = "REPLIKV_REPLICATION_TIMEOUT_MS")]
    replication_timeout_ms: Option<u64>,
    #[arg(long, env = "REPLIKV_NODE_ID")]
    node_id: Option<String>,
    /// Full node config as JSON; replaces the positional arguments
    #[arg(long, conflicts_with_all = ["port", "peer_ports"])]
    config: Option<PathBuf>,
}

impl ServeArgs {
    fn into_config(self) -> replikv::Result<NodeConfig> {
        let mut config = match (&self.config, self.port) {
            (Some(path), _) => NodeConfig::load(path)?,
            (None, Some(port)) => NodeConfig::from_ports(&self.bind_host, port, &self.peer_ports)?,
            (None, None) => {
                return Err(replikv::KvError::Config(
                    "either <PORT> or --config is required".to_string(),
                ))
            }
        };
        if let Some(timeout_ms) = self.replication_timeout_ms {
            config.replication_timeout_ms = timeout_ms;
        }
        if let Some(node_id) = self.node_id {
            config.node_id = node_id;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            init_tracing();
            serve(args.into_config()?).await
        }
        Command::Client { port, host } => {
            let client = KvClient::new(&format!("{}:{}", host, port))?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&client, stdin, &mut std::io::stdout()).await?;
            Ok(())
        }
    }
}
