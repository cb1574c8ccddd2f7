use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use redian::config::{Config, OutputFormat, PageBound};
use redian::crawler::CrawlRequest;
use redian::error::{Error, RedianErrorTrait};

#[derive(Parser)]
#[command(
    name = "redian",
    version,
    about = "Weibo hot-search and comment crawler",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML, or JSON with headers and cookies)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

/// Options shared by crawl commands
#[derive(clap::Args)]
struct CrawlArgs {
    /// Output directory, one file per topic
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Listing page boundary: "inclusive" walks pages 1..=SCALE (default),
    /// "exclusive" walks 1..SCALE like the old ranked crawler, so SCALE=1
    /// fetches nothing
    #[arg(long)]
    page_bound: Option<PageBound>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current hot-search board
    Trending,

    /// Crawl comments of board ranks START..=END
    Ranked {
        /// First rank (1-based)
        #[arg(long)]
        start: usize,

        /// Last rank (inclusive)
        #[arg(long)]
        end: usize,

        /// Listing pages per topic
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        scale: i64,

        /// Drop per-comment like counts
        #[arg(long)]
        no_like_count: bool,

        #[command(flatten)]
        args: CrawlArgs,
    },

    /// Crawl comments of the first K board entries
    Top {
        /// Number of board entries
        #[arg(short, long, default_value = "10")]
        k: usize,

        /// Listing pages per topic
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        scale: i64,

        /// Keep per-comment like counts
        #[arg(long)]
        like_count: bool,

        #[command(flatten)]
        args: CrawlArgs,
    },

    /// Crawl comments of keyword search results
    Keyword {
        /// Search keyword
        keyword: String,

        /// Listing pages to walk
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        scale: i64,

        /// Drop per-comment like counts
        #[arg(long)]
        no_like_count: bool,

        #[command(flatten)]
        args: CrawlArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("redian crawler starting");

    let result = run(cli.command, config).await;
    if let Err(err) = &result {
        report_error(err);
        return result;
    }

    tracing::info!("redian completed successfully");
    Ok(())
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Trending => {
            commands::trending(config).await?;
        }

        Commands::Ranked {
            start,
            end,
            scale,
            no_like_count,
            args,
        } => {
            tracing::info!(start, end, scale, "Starting ranked crawl");
            let request = CrawlRequest::ranked(start, end, scale).with_like_count(!no_like_count);
            commands::crawl(config, request, args.into()).await?;
        }

        Commands::Top {
            k,
            scale,
            like_count,
            args,
        } => {
            tracing::info!(k, scale, "Starting top-k crawl");
            let request = CrawlRequest::top(k, scale).with_like_count(like_count);
            commands::crawl(config, request, args.into()).await?;
        }

        Commands::Keyword {
            keyword,
            scale,
            no_like_count,
            args,
        } => {
            tracing::info!(keyword = %keyword, scale, "Starting keyword crawl");
            let request = CrawlRequest::keyword(keyword, scale).with_like_count(!no_like_count);
            commands::crawl(config, request, args.into()).await?;
        }
    }

    Ok(())
}

/// Log a failed command with the category of its underlying crawler error
fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(cause) => tracing::error!(
            category = cause.category().as_str(),
            recoverable = cause.is_recoverable(),
            error = %cause,
            "{err}"
        ),
        None => tracing::error!(error = %err, "Command failed"),
    }
}

impl From<CrawlArgs> for commands::CrawlOverrides {
    fn from(args: CrawlArgs) -> Self {
        Self {
            output: args.output,
            format: args.format,
            page_bound: args.page_bound,
        }
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("redian=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("redian={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
