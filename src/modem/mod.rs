//! Talking to the modem's web interface.

use std::fmt::Display;
use std::future::Future;

mod client;
pub use client::Client;

mod session;
pub use session::Session;

/// The fixed documents served by `/xml/getter.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    /// `fun=1`
    Status,
    /// `fun=8`
    Config,
    /// `fun=16`
    Downstream,
    /// `fun=18`
    Upstream,
    /// `fun=20`
    EventLog,
}

impl Document {
    /// In the order a scrape cycle fetches them.
    pub const ALL: [Document; 5] = [
        Document::Status,
        Document::Config,
        Document::Downstream,
        Document::Upstream,
        Document::EventLog,
    ];

    /// Value of the `fun` form field selecting this document.
    pub fn selector(self) -> u8 {
        match self {
            Document::Status => 1,
            Document::Config => 8,
            Document::Downstream => 16,
            Document::Upstream => 18,
            Document::EventLog => 20,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Document::Status => "status",
            Document::Config => "config",
            Document::Downstream => "downstream",
            Document::Upstream => "upstream",
            Document::EventLog => "eventlog",
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (fun={})", self.name(), self.selector())
    }
}

/// Everything a scrape cycle needs from the modem.
///
/// [`Client`] is the real implementation, tests use an in-memory one.
pub trait Modem {
    type Session: Send + Sync;

    /// Whether a password is configured at all.
    fn has_credentials(&self) -> bool;

    /// Log in and return a fresh session, never one from an earlier cycle.
    fn authenticate(&self) -> impl Future<Output = anyhow::Result<Self::Session>> + Send;

    /// Raw XML of `document`.
    fn fetch_document(
        &self,
        session: &Self::Session,
        document: Document,
    ) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn selectors() {
        let selectors = Document::ALL.map(Document::selector);
        assert_eq!(selectors, [1, 8, 16, 18, 20]);
        assert_eq!(Document::Upstream.to_string(), "upstream (fun=18)");
    }
}
