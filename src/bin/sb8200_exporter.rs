use std::sync::Arc;

use anyhow::Context;
use sb8200_exporter::server::{self, AppState};
use sb8200_exporter::{logger, modem, Config, LogBuffer, ModemMetrics, Scraper};

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
    log::info!(
        "scraping {} as {} every {}s, keeping {} log entries",
        config.host,
        config.username,
        config.poll_interval.as_secs(),
        config.logs_max,
    );
    if config.password.is_none() {
        log::warn!("SB8200_PASSWORD is not set, the modem won't be scraped");
    }

    let metrics = ModemMetrics::new(config.clear_stale_channels).context("register metrics")?;
    let metrics = Arc::new(metrics);
    let logs = Arc::new(LogBuffer::new(config.logs_max));

    let scraper = Scraper::new(
        modem::Client::from_config(&config),
        Arc::clone(&metrics),
        Arc::clone(&logs),
    );
    let _scrape_loop_handle = tokio::spawn(scraper.run(config.poll_interval));

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::warn!("couldn't listen for ctrl+c: {:?}", err);
            std::future::pending::<()>().await;
        }
        log::info!("received ctrl+c signal");
    };

    server::serve(config.port, AppState { metrics, logs }, shutdown).await
}
