use roxmltree::Node;

use super::{parse_document, utf8, ParseResult};
use crate::xml::{children_by_tag, text_by_tag};

/// One bonded downstream channel, a `<chnl>` of `fun=16`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownstreamChannel {
    /// `<id>`, only ever used as a label
    pub id: String,
    /// `<lock>`, e.g. `Locked`
    pub lock: String,
    /// `<mod>`
    pub modulation: String,
    /// `<freq>`
    pub frequency: String,
    /// `<pow>`
    pub power: String,
    /// `<snr>`
    pub snr: String,
    /// `<correcteds>`
    pub corrected: String,
    /// `<uncorrectables>`
    pub uncorrectable: String,
}

/// One bonded upstream channel, a `<chnl>` of `fun=18`.
///
/// This firmware reports no error counters upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamChannel {
    /// `<id>`
    pub id: String,
    /// `<lock>`
    pub lock: String,
    /// `<mod>`
    pub modulation: String,
    /// `<freq>`
    pub frequency: String,
    /// `<pow>`
    pub power: String,
}

fn parse_channels<T>(bytes: &[u8], parse: impl Fn(Node<'_, '_>) -> T) -> ParseResult<Vec<T>> {
    let doc = parse_document(utf8(bytes)?)?;
    Ok(children_by_tag(doc.root_element(), "chnl")
        .map(parse)
        .collect())
}

impl DownstreamChannel {
    pub fn list_from_xml(bytes: &[u8]) -> ParseResult<Vec<DownstreamChannel>> {
        parse_channels(bytes, |chnl| DownstreamChannel {
            id: text_by_tag(chnl, "id").to_string(),
            lock: text_by_tag(chnl, "lock").to_string(),
            modulation: text_by_tag(chnl, "mod").to_string(),
            frequency: text_by_tag(chnl, "freq").to_string(),
            power: text_by_tag(chnl, "pow").to_string(),
            snr: text_by_tag(chnl, "snr").to_string(),
            corrected: text_by_tag(chnl, "correcteds").to_string(),
            uncorrectable: text_by_tag(chnl, "uncorrectables").to_string(),
        })
    }
}

impl UpstreamChannel {
    pub fn list_from_xml(bytes: &[u8]) -> ParseResult<Vec<UpstreamChannel>> {
        parse_channels(bytes, |chnl| UpstreamChannel {
            id: text_by_tag(chnl, "id").to_string(),
            lock: text_by_tag(chnl, "lock").to_string(),
            modulation: text_by_tag(chnl, "mod").to_string(),
            frequency: text_by_tag(chnl, "freq").to_string(),
            power: text_by_tag(chnl, "pow").to_string(),
        })
    }
}
