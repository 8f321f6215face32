use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::record::{DedupKey, LogRecord};

/// Outcome of folding one record into the set.
#[derive(Debug)]
pub enum Insert {
    Added,
    /// Key already present with identical fields.
    Duplicate,
    /// Key already present with different fields; first-seen wins. Carries
    /// both versions so the caller can log them.
    Conflict {
        kept: LogRecord,
        discarded: LogRecord,
    },
}

/// Project-level record set keyed by (timestamp, article, action).
/// Iteration order is the canonical output order.
#[derive(Debug, Default)]
pub struct RecordSet {
    map: BTreeMap<DedupKey, LogRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rec: LogRecord) -> Insert {
        match self.map.entry(rec.key()) {
            Entry::Vacant(slot) => {
                slot.insert(rec);
                Insert::Added
            }
            Entry::Occupied(slot) if slot.get() == &rec => Insert::Duplicate,
            Entry::Occupied(slot) => Insert::Conflict {
                kept: slot.get().clone(),
                discarded: rec,
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        self.map.values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Action;

    fn rec(ts: i64, name: &str, action: Action, new_qual: &str) -> LogRecord {
        LogRecord {
            project: "Dogs".into(),
            timestamp: ts,
            action,
            article_name: name.into(),
            old_quality: String::new(),
            new_quality: new_qual.into(),
            old_importance: String::new(),
            new_importance: String::new(),
            new_article_name: String::new(),
            old_article_link: String::new(),
            old_talk_link: String::new(),
        }
    }

    #[test]
    fn first_seen_wins() {
        let mut set = RecordSet::new();
        assert!(matches!(
            set.insert(rec(100, "Dog", Action::Assessed, "B-Class")),
            Insert::Added
        ));
        assert!(matches!(
            set.insert(rec(100, "Dog", Action::Assessed, "B-Class")),
            Insert::Duplicate
        ));
        match set.insert(rec(100, "Dog", Action::Assessed, "Start-Class")) {
            Insert::Conflict { kept, discarded } => {
                assert_eq!(kept.new_quality, "B-Class");
                assert_eq!(discarded.new_quality, "Start-Class");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().new_quality, "B-Class");
    }

    #[test]
    fn iteration_is_key_ordered() {
        let mut set = RecordSet::new();
        set.insert(rec(200, "Cat", Action::Assessed, ""));
        set.insert(rec(100, "Dog", Action::Renamed, ""));
        set.insert(rec(100, "Dog", Action::Assessed, ""));
        set.insert(rec(100, "Cat", Action::Assessed, ""));
        let keys: Vec<_> = set
            .iter()
            .map(|r| (r.timestamp, r.article_name.clone(), r.action))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0], (100, "Cat".to_string(), Action::Assessed));
    }

    #[test]
    fn refolding_identical_input_is_idempotent() {
        let inputs = [
            rec(100, "Dog", Action::Assessed, "B-Class"),
            rec(150, "Cat", Action::Removed, ""),
            rec(100, "Dog", Action::Assessed, "B-Class"),
        ];
        let mut once = RecordSet::new();
        for r in &inputs {
            once.insert(r.clone());
        }
        let mut twice = RecordSet::new();
        for r in inputs.iter().chain(inputs.iter()) {
            twice.insert(r.clone());
        }
        let a: Vec<_> = once.iter().map(LogRecord::tsv_row).collect();
        let b: Vec<_> = twice.iter().map(LogRecord::tsv_row).collect();
        assert_eq!(a, b);
    }
}
