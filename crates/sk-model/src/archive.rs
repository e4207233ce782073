//! Archive sink: fire-and-forget, order-preserving record of produced
//! results. Observational only — a sink that drops everything must not
//! change any solver output.

use std::cell::RefCell;

use serde_json::Value;

pub trait ArchiveSink {
    fn archive(&self, label: &str, value: Value);
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullArchive;

impl ArchiveSink for NullArchive {
    fn archive(&self, _label: &str, _value: Value) {}
}

/// In-memory sink preserving call order. Single-threaded by design, like the
/// rest of the engine.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    records: RefCell<Vec<(String, Value)>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, Value)> {
        self.records.borrow().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records.borrow().iter().map(|(l, _)| l.clone()).collect()
    }
}

impl ArchiveSink for MemoryArchive {
    fn archive(&self, label: &str, value: Value) {
        self.records.borrow_mut().push((label.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_archive_preserves_order() {
        let sink = MemoryArchive::new();
        sink.archive("rates", json!([1.0, 2.0]));
        sink.archive("net_rates", json!([0.5]));
        sink.archive("rates", json!([3.0]));
        assert_eq!(sink.labels(), ["rates", "net_rates", "rates"]);
    }
}
