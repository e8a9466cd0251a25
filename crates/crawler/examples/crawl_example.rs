use crawler::{CrawlOptions, CrawlerConfig, LyricsCrawler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CrawlerConfig::default().with_cache_dir("./lyrics");
    let crawler = LyricsCrawler::with_config(config);

    // The plain chart plus a few genre charts. Everything fetched lands in
    // ./lyrics, so rerunning this example touches the network only for
    // pages it has not seen before.
    let options = CrawlOptions::top100_with_genres(["pop", "rock", "country"])?;

    let outcome = crawler.crawl(options).await?;

    println!("{} records extracted", outcome.records.len());
    for record in outcome.records.iter().take(10) {
        let genre = if record.genre.is_empty() { "top100" } else { &record.genre };
        println!("[{}] {} <{}>", genre, record.title, record.url);
    }
    println!(
        "{} pages fetched this run, corpus of {} chars",
        outcome.pages_fetched,
        outcome.corpus.len()
    );

    Ok(())
}
