#![allow(clippy::new_without_default)]

pub mod coerce;
pub mod config;
pub mod log_buffer;
pub mod logger;
pub mod metrics;
pub mod modem;
pub mod records;
pub mod scrape;
pub mod server;

mod xml;

pub use config::Config;
pub use log_buffer::LogBuffer;
pub use metrics::ModemMetrics;
pub use scrape::{CycleReport, Scraper};
