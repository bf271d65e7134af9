//! Diagnostic tool: run one retrieval strategy (or the whole fallback chain)
//! for a handle and show what comes back and how it normalizes.
//!
//! Usage: cargo run --bin diagnose_fetch -- <handle> [--max-items N] [--strategy direct|mirror|browser|all]

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use moodsignal_common::{Config, Handle, PostBatch};
use moodsignal_retrieval::{
    BrowserAutomationStrategy, DirectFetchStrategy, FallbackCoordinator, MirrorFetchStrategy,
    RetrievalStrategy, WebDriverBrowser,
};
use moodsignal_scoring::TextNormalizer;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyChoice {
    Direct,
    Mirror,
    Browser,
    All,
}

#[derive(Parser)]
#[command(name = "diagnose_fetch", about = "Trace post retrieval for one handle")]
struct Cli {
    /// Account handle to fetch
    handle: String,

    /// Maximum posts to retrieve (defaults to MAX_ITEMS)
    #[arg(long)]
    max_items: Option<usize>,

    #[arg(long, value_enum, default_value_t = StrategyChoice::All)]
    strategy: StrategyChoice,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("moodsignal=debug".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let handle = Handle::parse(&cli.handle)?;
    let max_items = cli.max_items.unwrap_or(config.max_items);

    let posts = fetch(&config, cli.strategy, &handle, max_items).await?;

    println!("\n=== {} posts for @{handle} ({:?}) ===\n", posts.len(), cli.strategy);
    for (i, post) in posts.iter().enumerate() {
        println!("[{:>3}] {post}", i + 1);
    }

    let matrix = TextNormalizer::new().normalize(&posts);
    let (rows, width) = matrix.shape();
    println!("\nNormalized matrix: {rows} x {width}");
    if posts.len() > rows {
        println!("  ({} posts dropped: no tokens after filtering)", posts.len() - rows);
    }

    Ok(())
}

async fn fetch(
    config: &Config,
    choice: StrategyChoice,
    handle: &Handle,
    max_items: usize,
) -> Result<PostBatch> {
    let strategy: Arc<dyn RetrievalStrategy> = match choice {
        StrategyChoice::Direct => Arc::new(DirectFetchStrategy::new(&config.profile_base_url)?),
        StrategyChoice::Mirror => {
            Arc::new(MirrorFetchStrategy::new(config.mirror_instances.clone())?)
        }
        StrategyChoice::Browser => Arc::new(BrowserAutomationStrategy::new(
            Arc::new(WebDriverBrowser::new(&config.webdriver_url)?),
            &config.profile_base_url,
        )),
        StrategyChoice::All => {
            let coordinator = FallbackCoordinator::from_config(config)?;
            return Ok(coordinator.fetch_posts(handle, max_items).await);
        }
    };

    Ok(strategy.fetch(handle, max_items).await)
}
