use parking_lot::RwLock;

use crate::records::EventEntry;

/// The most recent modem event log entries, oldest first.
///
/// Every successful event log fetch replaces the content as a whole.
pub struct LogBuffer {
    capacity: usize,
    entries: RwLock<Vec<EventEntry>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> LogBuffer {
        LogBuffer {
            capacity,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Keep the newest `capacity` entries of `entries`, dropping everything
    /// stored before.
    pub fn replace(&self, mut entries: Vec<EventEntry>) {
        let excess = entries.len().saturating_sub(self.capacity);
        entries.drain(..excess);
        *self.entries.write() = entries;
    }

    /// Up to `count` of the newest entries, oldest first.
    ///
    /// No count, a non-positive one or one of at least `capacity` returns the
    /// whole buffer.
    pub fn query(&self, count: Option<i64>) -> Vec<EventEntry> {
        let limit = match count {
            Some(n) if n > 0 && (n as u64) < self.capacity as u64 => n as usize,
            _ => self.capacity,
        };

        let entries = self.entries.read();
        let start = entries.len().saturating_sub(limit);
        entries[start..].to_vec()
    }
}
