use std::sync::Arc;

use anyhow::Context;
use sb8200_exporter::{logger, modem, Config, LogBuffer, ModemMetrics, Scraper};

/// Run a single scrape cycle and print what would be exported.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let env_file = dotenv::dotenv();
    let level = logger::parse_level(dotenv::var("SB8200_LOG_LEVEL").ok().as_deref());
    logger::init(level).context("initialize logger")?;

    match env_file {
        Ok(path) => log::info!("loaded .env from {}", path.display()),
        Err(err) => log::warn!("couldn't load .env file: {:?}", err),
    };

    let config = Config::from_env();
    let metrics = ModemMetrics::new(config.clear_stale_channels).context("register metrics")?;
    let metrics = Arc::new(metrics);
    let logs = Arc::new(LogBuffer::new(config.logs_max));

    let scraper = Scraper::new(
        modem::Client::from_config(&config),
        Arc::clone(&metrics),
        Arc::clone(&logs),
    );
    let report = scraper.run_cycle().await;
    log::info!("{:?}", report);

    print!("{}", metrics.render().context("render metrics")?);
    for entry in logs.query(None) {
        println!("{}", entry);
    }

    if !report.is_up() {
        anyhow::bail!("couldn't log in to the modem at {}", config.host);
    }
    Ok(())
}
