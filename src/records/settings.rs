use super::{parse_document, utf8, ParseResult};
use crate::xml::{expect_root, text_by_tag};

/// `fun=8`, a few device settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    /// `<ChannelPlan>`, 1 = North America, 2 = Europe, ...
    pub channel_plan: String,
    /// `<LEDControl>`, 0 = off, 1 = on
    pub led_control: String,
    /// `<EeePortState>`, 0 = disabled, 1 = enabled
    pub eee_port_state: String,
}

impl ConfigRecord {
    pub fn from_xml(bytes: &[u8]) -> ParseResult<ConfigRecord> {
        let doc = parse_document(utf8(bytes)?)?;
        let data = expect_root(&doc, "data")?;

        Ok(ConfigRecord {
            channel_plan: text_by_tag(data, "ChannelPlan").to_string(),
            led_control: text_by_tag(data, "LEDControl").to_string(),
            eee_port_state: text_by_tag(data, "EeePortState").to_string(),
        })
    }
}
