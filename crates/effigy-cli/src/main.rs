use anyhow::Result;
use clap::{Parser, Subcommand};
use effigy_config::{FileFormat, ProviderKind};
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;
use commands::{cmd_drop, cmd_init, cmd_inspect, cmd_sql};

/// effigy command-line interface.
#[derive(Parser, Debug)]
#[command(name = "effigy", author, version, about)]
struct Cli {
    /// Log builder and provider activity at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize effigy.json with defaults.
    Init {
        #[arg(long, value_enum)]
        provider: Option<ProviderKind>,
        /// File format for model definitions.
        #[arg(long, value_enum)]
        format: Option<FileFormat>,
    },
    /// Show CREATE statements for the models, in dependency order.
    Sql {
        /// Override the configured provider.
        #[arg(long, value_enum)]
        provider: Option<ProviderKind>,
    },
    /// Show DROP statements for the models, dependents first.
    Drop {
        #[arg(long, value_enum)]
        provider: Option<ProviderKind>,
    },
    /// Show synthesized tables and mapped relationships.
    Inspect,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "effigy={level},effigy_builder={level},effigy_cli={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init { provider, format } => cmd_init(provider, format),
        Commands::Sql { provider } => cmd_sql(provider),
        Commands::Drop { provider } => cmd_drop(provider),
        Commands::Inspect => cmd_inspect(),
    }
}
