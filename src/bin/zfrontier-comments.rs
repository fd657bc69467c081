//! zfrontier-comments: downloads the comment thread of every crawled post

use clap::Parser;
use std::path::PathBuf;
use zfrontier_crawler::cli::CommonArgs;
use zfrontier_crawler::{run_comments, CrawlError};

/// Comment crawler for zFrontier
///
/// Reads post ids from a flow items CSV (by default the one the last feed
/// crawl wrote) and saves each post's comments to comments/<id>.json.
#[derive(Parser, Debug)]
#[command(name = "zfrontier-comments")]
#[command(version)]
#[command(about = "Comment crawler for zFrontier", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Flow items CSV to read (defaults to the last feed crawl's file)
    #[arg(long, value_name = "CSV")]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.common.init()?;

    // Failures are logged, never turned into an exit code
    match run_comments(&config, &cli.common.credentials(), cli.input.as_deref()).await {
        Ok(report) => tracing::info!(
            "Comment crawl done: {}/{} posts saved, {} comments",
            report.saved,
            report.posts,
            report.comments
        ),
        Err(CrawlError::InputNotFound(message)) => {
            tracing::error!("Error: no flow items CSV found: {}", message)
        }
        Err(e) => tracing::error!("Unexpected error: {}", e),
    }

    Ok(())
}
