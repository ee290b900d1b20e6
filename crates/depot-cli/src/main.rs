mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, equipment::EquipmentSubcommand, movements::MovementsSubcommand,
    supplier::SupplierSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "depot",
    about = "Inventory dashboard: review equipment movement requests, register equipment and suppliers",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .depot/)
    #[arg(long, global = true, env = "DEPOT_ROOT")]
    root: Option<PathBuf>,

    /// Inventory API base URL (overrides config and DEPOT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .depot/config.yaml
    Init,

    /// Review and act on equipment movement requests
    Movements {
        #[command(subcommand)]
        subcommand: MovementsSubcommand,
    },

    /// List and register equipment
    Equipment {
        #[command(subcommand)]
        subcommand: EquipmentSubcommand,
    },

    /// List and register suppliers
    Supplier {
        #[command(subcommand)]
        subcommand: SupplierSubcommand,
    },

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the dashboard API server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let api_url = cli.api_url.as_deref();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, api_url),
        Commands::Movements { subcommand } => {
            cmd::movements::run(&root, api_url, subcommand, cli.json)
        }
        Commands::Equipment { subcommand } => {
            cmd::equipment::run(&root, api_url, subcommand, cli.json)
        }
        Commands::Supplier { subcommand } => {
            cmd::supplier::run(&root, api_url, subcommand, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, api_url, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, api_url, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
