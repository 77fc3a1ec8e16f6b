//! Typed views of the XML documents served by the modem.
//!
//! Fields are kept as the raw strings the modem sends, turning them into
//! numbers is left to [`crate::coerce`].

use thiserror::Error;

mod status;
pub use status::StatusRecord;

mod settings;
pub use settings::ConfigRecord;

mod channels;
pub use channels::{DownstreamChannel, UpstreamChannel};

mod events;
pub use events::{EventEntry, EventLogSnapshot};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("text is not valid xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unexpected document shape: {0}")]
    Shape(#[from] crate::xml::Error),
}
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parse raw response bytes into an XML document.
///
/// The `Document` borrows from `text`, so callers keep both alive together.
fn parse_document(text: &str) -> ParseResult<roxmltree::Document<'_>> {
    Ok(roxmltree::Document::parse(text)?)
}

fn utf8(bytes: &[u8]) -> ParseResult<&str> {
    Ok(std::str::from_utf8(bytes)?)
}
