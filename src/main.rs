//! MyVax Fetcher CLI application
//!
//! Command-line interface for the CITF Malaysia vaccination feeds. Every
//! command fetches the upstream CSV afresh and prints the requested view.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use myvax_fetcher::app::{FeedClient, FeedService};
use myvax_fetcher::cli::{
    handle_datasets, handle_population, handle_regions, handle_vacc, handle_vacc_reg, Cli,
    CommandContext, Commands, OutputOptions,
};
use myvax_fetcher::config::AppConfig;
use myvax_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        debug!("Command failed ({}, {:?})", e.category(), e.condition());
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("MyVax Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    if let Commands::Regions = cli.command {
        return handle_regions();
    }

    let client = FeedClient::with_config(config.client_config())?;
    let service = FeedService::new(client, config.feed_catalog()?);
    let ctx = CommandContext::new(
        service,
        OutputOptions {
            compact: cli.global.compact,
            progress: !cli.global.quiet,
        },
    );

    match cli.command {
        Commands::Vacc(args) => {
            info!("Executing vacc command");
            handle_vacc(&ctx, args).await
        }
        Commands::VaccReg(args) => {
            info!("Executing vacc-reg command");
            handle_vacc_reg(&ctx, args).await
        }
        Commands::Population(args) => {
            info!("Executing population command");
            handle_population(&ctx, args).await
        }
        Commands::Datasets(args) => {
            info!("Executing datasets command");
            handle_datasets(&ctx, args).await
        }
        Commands::Regions => handle_regions(),
    }
}

/// Initialize logging based on CLI verbosity and the configured default level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let log_level = cli.log_level(config.default_log_level());

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("myvax_fetcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
