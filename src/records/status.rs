use super::{parse_document, utf8, ParseResult};
use crate::xml::{expect_root, text_by_tag};

/// `fun=1`, the connection overview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRecord {
    /// `<freq>`, primary downstream frequency, e.g. `591000000 Hz`
    pub frequency: String,
    /// `<pow>`, primary downstream power, e.g. `6.1 dBmV`
    pub power: String,
    /// `<snr>`, primary downstream SNR, e.g. `40.3 dB`
    pub snr: String,
    /// `<cm_status>`
    pub status: String,
    /// `<cm_system_uptime>`
    pub uptime: String,
    /// `<SwVersion>`
    pub firmware: String,
}

impl StatusRecord {
    pub fn from_xml(bytes: &[u8]) -> ParseResult<StatusRecord> {
        let doc = parse_document(utf8(bytes)?)?;
        let data = expect_root(&doc, "data")?;

        Ok(StatusRecord {
            frequency: text_by_tag(data, "freq").to_string(),
            power: text_by_tag(data, "pow").to_string(),
            snr: text_by_tag(data, "snr").to_string(),
            status: text_by_tag(data, "cm_status").to_string(),
            uptime: text_by_tag(data, "cm_system_uptime").to_string(),
            firmware: text_by_tag(data, "SwVersion").to_string(),
        })
    }
}
