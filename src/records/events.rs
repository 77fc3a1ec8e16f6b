use std::fmt::Display;

use super::{parse_document, utf8, ParseResult};
use crate::xml::{children_by_tag, text_by_tag};

/// A single `<eventlog>` entry of `fun=20`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEntry {
    /// `<id>`
    pub id: String,
    /// `<time>`, kept as sent, e.g. `09/14/2026 21:04`
    pub time: String,
    /// `<level>`, free text like `Critical (3)` or `Notice`
    pub level: String,
    /// `<desc>`
    pub description: String,
}

impl EventEntry {
    /// Lower-cased, trimmed level used to group entries.
    pub fn level_key(&self) -> String {
        self.level.trim().to_lowercase()
    }
}

/// `<timestamp> [<level>] <description>`
impl Display for EventEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.time, self.level, self.description)
    }
}

/// The whole event log as delivered, oldest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLogSnapshot {
    /// `<log_num>`, the count the modem claims to have
    pub reported_count: Option<u64>,
    pub entries: Vec<EventEntry>,
}

impl EventLogSnapshot {
    pub fn from_xml(bytes: &[u8]) -> ParseResult<EventLogSnapshot> {
        let doc = parse_document(utf8(bytes)?)?;
        let root = doc.root_element();

        let reported_count = text_by_tag(root, "log_num").trim().parse::<u64>().ok();
        let entries = children_by_tag(root, "eventlog")
            .map(|event| EventEntry {
                id: text_by_tag(event, "id").to_string(),
                time: text_by_tag(event, "time").to_string(),
                level: text_by_tag(event, "level").to_string(),
                description: text_by_tag(event, "desc").to_string(),
            })
            .collect();

        Ok(EventLogSnapshot {
            reported_count,
            entries,
        })
    }
}
