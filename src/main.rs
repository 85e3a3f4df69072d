use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use household_planner::api::{FeasibilityRequest, run_http_server};
use household_planner::config::PlannerConfig;
use household_planner::core::evaluate;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "household-planner",
    about = "Household affordability, goal and FIRE projections"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Path to a TOML planner config")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Evaluate a house purchase from a JSON scenario file ("-" reads stdin)
    Evaluate {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            info!(port, "starting server");
            run_http_server(port, config)
                .await
                .context("server error")?;
        }
        Commands::Evaluate { input } => {
            let raw = read_input(&input)?;
            let request: FeasibilityRequest =
                serde_json::from_str(&raw).context("invalid scenario JSON")?;
            let result = evaluate(&request.financials, &request.mortgage)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed reading stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))
}
