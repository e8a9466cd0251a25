use std::io::Write;

use crawler::LyricsCrawler;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toplyrics=info,crawler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = AppConfig::from_env();
    let crawler = LyricsCrawler::with_config(app.crawler_config());

    let outcome = crawler.crawl(app.crawl_options()?).await?;

    // Hand the record collection to the analysis stage: one JSON object per
    // line, in link-discovery order. The corpus stays in-process.
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &outcome.records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(
        "done: {} records ({} unlicensed, {} malformed), {} pages fetched, corpus of {} chars",
        outcome.records.len(),
        outcome.skipped_missing,
        outcome.skipped_malformed,
        outcome.pages_fetched,
        outcome.corpus.len(),
    );

    Ok(())
}
