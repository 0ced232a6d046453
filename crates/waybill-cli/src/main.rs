mod geocoder;
mod shipment;
mod timeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use waybill_carrier::Provider;

#[derive(Debug, Parser)]
#[command(name = "waybill")]
#[command(about = "Shipment checkpoint reconstruction and route animation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up a shipment on the tracking endpoint and resolve its checkpoints
    Track {
        /// Air waybill number
        awb: String,
        /// Carrier to query (e.g. FedEx, DHL, "Courier Wala")
        #[arg(long, default_value_t = Provider::FedEx)]
        provider: Provider,
    },
    /// Resolve checkpoints for a shipment record stored as JSON
    Resolve {
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the reconciled (chronological) timeline of a shipment record
    Reconcile {
        #[arg(long)]
        file: PathBuf,
    },
    /// Show the geocoder query each raw location normalizes to
    Normalize {
        #[arg(required = true)]
        locations: Vec<String>,
    },
    /// Resolve a shipment record and print live animation frames as JSON lines
    Animate {
        #[arg(long)]
        file: PathBuf,
        /// Number of frames to print
        #[arg(long, default_value = "10")]
        frames: usize,
        /// Freeze on the checkpoint with this id
        #[arg(long)]
        select: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = waybill_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Track { awb, provider } => shipment::run_track(&config, &awb, provider).await,
        Commands::Resolve { file } => shipment::run_resolve(&config, &file).await,
        Commands::Reconcile { file } => timeline::run_reconcile(&file),
        Commands::Normalize { locations } => timeline::run_normalize(&config, &locations),
        Commands::Animate {
            file,
            frames,
            select,
        } => shipment::run_animate(&config, &file, frames, select).await,
    }
}
