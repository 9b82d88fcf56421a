//! Per-session deferred command log.
//!
//! Append-only: records are marked executed rather than removed, and the
//! log dies with its session.

/// One recorded command. `line` is a fully formed wire line, replayed at
/// most once.
#[derive(Debug, Clone)]
pub struct DeferRecord {
    pub key: u64,
    pub line: String,
    pub executed: bool,
}

#[derive(Debug, Default)]
pub struct DeferLog {
    records: Vec<DeferRecord>,
}

impl DeferLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: u64, line: String) {
        self.records.push(DeferRecord {
            key,
            line,
            executed: false,
        });
    }

    /// Lines recorded under `key` and not yet replayed, in insertion order.
    /// Every match is marked executed before any line is handed back, so a
    /// replayed `Execute` of the same key finds nothing left to run.
    pub fn take_pending(&mut self, key: u64) -> Vec<String> {
        let mut lines = Vec::new();
        for record in &mut self.records {
            if record.key == key && !record.executed {
                record.executed = true;
                lines.push(record.line.clone());
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_pending_preserves_insertion_order() {
        let mut log = DeferLog::new();
        log.record(7, "Deliver:4:widget\n".into());
        log.record(9, "Deliver:1:coal\n".into());
        log.record(7, "Withdraw:2:widget\n".into());
        assert_eq!(
            log.take_pending(7),
            ["Deliver:4:widget\n", "Withdraw:2:widget\n"]
        );
    }

    #[test]
    fn second_take_finds_nothing() {
        let mut log = DeferLog::new();
        log.record(7, "Deliver:4:widget\n".into());
        assert_eq!(log.take_pending(7).len(), 1);
        assert!(log.take_pending(7).is_empty());
    }

    #[test]
    fn unrelated_keys_are_untouched() {
        let mut log = DeferLog::new();
        log.record(1, "Deliver:1:a\n".into());
        log.record(2, "Deliver:2:b\n".into());
        log.take_pending(1);
        assert_eq!(log.take_pending(2), ["Deliver:2:b\n"]);
    }

    #[test]
    fn records_added_after_a_take_are_pending_again() {
        let mut log = DeferLog::new();
        log.record(5, "Deliver:1:a\n".into());
        log.take_pending(5);
        log.record(5, "Deliver:2:a\n".into());
        assert_eq!(log.take_pending(5), ["Deliver:2:a\n"]);
    }

    #[test]
    fn missing_key_is_empty() {
        let mut log = DeferLog::new();
        assert!(log.take_pending(404).is_empty());
    }
}
