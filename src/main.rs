//! Growthfy - social listening search proxy
//!
//! Growthfy runs a small HTTP proxy in front of the socialdata Twitter API
//! and ships a command-line client for paginated searches, user profiles,
//! timelines and trends.

use clap::{Parser, Subcommand};
use growthfy_cli::{
    execute_command, exit_code_for_error, CommandContext, InitArgs, OutputFormat, SearchArgs,
    ServeArgs, TimelineArgs, TrendsArgs, UserArgs, ValidateArgs,
};
use growthfy_core::{GrowthfyConfig, Result};
use growthfy_infra::{init_logger, LoggerConfig};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "growthfy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Growthfy - social listening search proxy and client")]
#[command(long_about = r#"
Growthfy forwards structured search requests to the socialdata Twitter API,
compiling filters into the Twitter advanced search syntax and returning
normalized posts.

Run 'growthfy serve' to start the proxy, then use 'growthfy search' and the
other client commands against it.

The vendor API key is read from SOCIALDATA_API_KEY.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the search proxy
    Serve(ServeArgs),

    /// Search posts through the proxy
    Search(SearchArgs),

    /// Show trending topics
    Trends(TrendsArgs),

    /// Show a user profile
    User(UserArgs),

    /// Show the recent posts of a user
    Timeline(TimelineArgs),

    /// Write a default configuration file
    Init(InitArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(exit_code_for_error(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = GrowthfyConfig::load(cli.config.as_deref())?;

    let mut logger = LoggerConfig::from_config(&config.logging)?
        .with_env_overrides(|key| std::env::var(key).ok());
    if cli.verbose {
        logger.level = "debug".to_string();
    }
    init_logger(logger)?;

    info!("Starting Growthfy v{}", env!("CARGO_PKG_VERSION"));

    let ctx = CommandContext::new(config, cli.output);
    match &cli.command {
        Commands::Serve(args) => execute_command(args, &ctx).await,
        Commands::Search(args) => execute_command(args, &ctx).await,
        Commands::Trends(args) => execute_command(args, &ctx).await,
        Commands::User(args) => execute_command(args, &ctx).await,
        Commands::Timeline(args) => execute_command(args, &ctx).await,
        Commands::Init(args) => execute_command(args, &ctx).await,
        Commands::Validate(args) => execute_command(args, &ctx).await,
        Commands::Version => {
            println!("{}", growthfy_core::version_info());
            Ok(())
        }
    }
}
