mod cli;
mod color;
mod config;
mod discovery;
mod registry;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cli::{registries::get_cmd, registries::list_cmd, ColorMode};

#[derive(Default, Clone, Copy, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "modelreg")]
#[command(
    about = "Resolve model registry services into connection-ready endpoints",
    version = "0.0.1"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    /// Read the service catalog and defaults from this file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the model registries in a namespace
    List(ListArgs),
    /// Show a single model registry
    Get(GetArgs),
}

/// Output formats
#[derive(ValueEnum, Default, Clone, Copy, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum ListingFormat {
    /// Format the output as a table
    #[default]
    Table,
    /// Format the output as JSON
    Json,
    /// Format the output as a table without a header
    HeaderlessTable,
}

/// Options shared by every lookup
#[derive(clap::Args)]
pub(crate) struct LookupArgs {
    /// Namespace to search, defaults to the configured namespace
    #[arg(short, long)]
    namespace: Option<String>,
    /// Prefer externally routable addresses
    #[arg(long)]
    federated: bool,
    /// Output the result with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
}

#[derive(Parser)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    lookup: LookupArgs,
}

#[derive(Parser)]
pub(crate) struct GetArgs {
    /// Name of the model registry service
    name: String,
    #[command(flatten)]
    lookup: LookupArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let color = ColorMode::resolve_auto(cli.color);
    color::configure_color(color);

    let config = match config::read_config(cli.config) {
        Ok(config) => config,
        Err(err) => die!("{}", err),
    };

    match &cli.command {
        Commands::List(args) => list_cmd(&config, args).await,
        Commands::Get(args) => get_cmd(&config, args).await,
    }
}
