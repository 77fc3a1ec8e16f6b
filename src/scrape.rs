//! The scrape cycle: log in, fetch every document, publish what parsed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::log_buffer::LogBuffer;
use crate::metrics::ModemMetrics;
use crate::modem::{Document, Modem};
use crate::records::{
    ConfigRecord, DownstreamChannel, EventLogSnapshot, StatusRecord, UpstreamChannel,
};

/// How a single cycle went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// No password configured, nothing was attempted
    NoCredentials,
    /// Login failed, no document was fetched
    AuthenticationFailed,
    /// Logged in, each document either published or failed on its own
    Scraped {
        published: Vec<Document>,
        failed: Vec<Document>,
    },
}

impl CycleReport {
    pub fn is_up(&self) -> bool {
        matches!(self, CycleReport::Scraped { .. })
    }
}

pub struct Scraper<M> {
    modem: M,
    metrics: Arc<ModemMetrics>,
    logs: Arc<LogBuffer>,
}

impl<M: Modem> Scraper<M> {
    pub fn new(modem: M, metrics: Arc<ModemMetrics>, logs: Arc<LogBuffer>) -> Scraper<M> {
        Scraper {
            modem,
            metrics,
            logs,
        }
    }

    /// Scrape, sleep `interval`, repeat. Never returns.
    pub async fn run(self, interval: Duration) -> ! {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(interval).await;
        }
    }

    pub async fn run_cycle(&self) -> CycleReport {
        if !self.modem.has_credentials() {
            log::warn!("SB8200_PASSWORD is not set; skipping scrape");
            self.metrics.set_liveness(false);
            return CycleReport::NoCredentials;
        }

        let now = Instant::now();
        let session = match self.modem.authenticate().await {
            Ok(session) => session,
            Err(err) => {
                log::warn!("modem login failed: {:#}", err);
                self.metrics.set_liveness(false);
                return CycleReport::AuthenticationFailed;
            }
        };
        self.metrics.set_liveness(true);

        let mut published = Vec::new();
        let mut failed = Vec::new();

        for document in Document::ALL {
            match self.scrape_document(&session, document).await {
                Ok(()) => published.push(document),
                Err(err) => {
                    log::warn!("couldn't scrape {}: {:#}", document, err);
                    failed.push(document);
                }
            }
        }

        log::info!(
            "scraped {}/{} documents in {}ms",
            published.len(),
            Document::ALL.len(),
            now.elapsed().as_millis(),
        );

        CycleReport::Scraped { published, failed }
    }

    async fn scrape_document(
        &self,
        session: &M::Session,
        document: Document,
    ) -> anyhow::Result<()> {
        let bytes = self.modem.fetch_document(session, document).await?;
        let context = || format!("parse {}", document);

        match document {
            Document::Status => {
                let status = StatusRecord::from_xml(&bytes).with_context(context)?;
                log::debug!(
                    "modem status: {:?}, uptime: {:?}, firmware: {:?}",
                    status.status,
                    status.uptime,
                    status.firmware,
                );
                self.metrics.publish_status(&status);
            }
            Document::Config => {
                let config = ConfigRecord::from_xml(&bytes).with_context(context)?;
                self.metrics.publish_config(&config);
            }
            Document::Downstream => {
                let channels = DownstreamChannel::list_from_xml(&bytes).with_context(context)?;
                self.metrics.publish_downstream(&channels);
            }
            Document::Upstream => {
                let channels = UpstreamChannel::list_from_xml(&bytes).with_context(context)?;
                self.metrics.publish_upstream(&channels);
            }
            Document::EventLog => {
                let snapshot = EventLogSnapshot::from_xml(&bytes).with_context(context)?;
                if let Some(reported) = snapshot.reported_count {
                    if reported != snapshot.entries.len() as u64 {
                        log::debug!(
                            "event log reports {} entries but contains {}",
                            reported,
                            snapshot.entries.len(),
                        );
                    }
                }
                self.metrics.publish_event_counts(&snapshot.entries);
                self.logs.replace(snapshot.entries);
            }
        }

        Ok(())
    }
}
