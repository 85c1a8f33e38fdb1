use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::LogStore;
use crate::models::{EndpointCount, EndpointKey, LogEntry};

/**
 * In-process `LogStore` over a fixed set of entries.
 *
 * Answers the same queries as the MongoDB store. Ties are resolved deterministically:
 * the earliest inserted entry wins for the latest timestamp, and groups with equal
 * counts keep the order in which they were first seen.
 *
 * Entries only carry decoded timestamps, so a date that was stored as an RFC 3339 string
 * ranks by its instant here. MongoDB sorts by BSON type first and puts every Date above
 * every string; on mixed data the two stores can disagree on the last entry.
 */
#[derive(Debug, Clone, Default)]
pub struct MemoryLogStore {
    entries: Vec<LogEntry>,
}

impl MemoryLogStore {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn group_counts(&self) -> Vec<EndpointCount> {
        let mut index: HashMap<EndpointKey, usize> = HashMap::new();
        let mut groups: Vec<EndpointCount> = vec![];
        for entry in &self.entries {
            let key = entry.key();
            match index.get(&key) {
                Some(&i) => groups[i].count += 1,
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(EndpointCount { id: key, count: 1 });
                }
            }
        }
        // stable: equal counts keep first-seen order
        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn last_entry(&self) -> Result<Option<LogEntry>> {
        let mut last: Option<&LogEntry> = None;
        for entry in &self.entries {
            match last {
                Some(current) if entry.timestamp <= current.timestamp => {}
                _ => last = Some(entry),
            }
        }
        Ok(last.cloned())
    }

    async fn most_frequent(&self) -> Result<Option<EndpointCount>> {
        Ok(self.group_counts().into_iter().next())
    }

    async fn counts(&self) -> Result<Vec<EndpointCount>> {
        Ok(self.group_counts())
    }
}
