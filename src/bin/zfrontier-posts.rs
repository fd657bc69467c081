//! zfrontier-posts: crawls the circle feed into a dated flow items CSV

use clap::Parser;
use zfrontier_crawler::cli::CommonArgs;
use zfrontier_crawler::run_posts;

/// Feed crawler for zFrontier
///
/// Pages through the circle feed from the newest entry and appends every
/// entry to <data-dir>/<YYYYMMDD>_flow_items.csv.
#[derive(Parser, Debug)]
#[command(name = "zfrontier-posts")]
#[command(version)]
#[command(about = "Feed crawler for zFrontier", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Offset to start from instead of the newest page
    #[arg(long)]
    start_offset: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = cli.common.init()?;

    if let Some(offset) = cli.start_offset {
        config.crawler.start_offset = offset;
    }

    tracing::info!(
        "Starting feed crawl (start offset: '{}', stop below {})",
        config.crawler.start_offset,
        config.crawler.min_offset
    );

    // Failures are logged, never turned into an exit code
    match run_posts(&config, &cli.common.credentials()).await {
        Ok(report) => tracing::info!(
            "Feed crawl done: {} rows from {} pages in {}",
            report.items,
            report.pages,
            report.csv_path.display()
        ),
        Err(e) => tracing::error!("Feed crawl failed: {}", e),
    }

    Ok(())
}
