use crate::parser::LogRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// A single ranked key (client address or user agent) with its request count
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RankedItem {
    pub value: String,
    pub count: usize,
}

/// The N most frequent keys of a table, highest count first
pub type TopNList = Vec<RankedItem>;

/// Counts occurrences of string keys while remembering the order in which
/// each key was first seen.
///
/// The first-seen order is what breaks ties when ranking, so two keys with
/// the same count always come out in the order they appeared in the log.
#[derive(Debug, Default)]
pub struct FrequencyTable<'a> {
    index: HashMap<&'a str, usize>,
    entries: Vec<(&'a str, usize)>,
}

impl<'a> FrequencyTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &'a str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Iterate over `(key, count)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Rank keys by descending count and keep at most `top_n` of them.
    ///
    /// `sort_by` is stable, so equal counts keep their first-seen order.
    pub fn ranked(&self, top_n: usize) -> TopNList {
        let mut ranked: Vec<(&str, usize)> = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(top_n)
            .map(|(value, count)| RankedItem {
                value: value.to_string(),
                count,
            })
            .collect()
    }
}

/// Request count for every distinct status code, in first-seen order.
///
/// Never truncated. Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts(Vec<(String, usize)>);

impl StatusCounts {
    pub fn get(&self, status: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(code, _)| code == status)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.0.iter().map(|(code, count)| (code.as_str(), *count))
    }
}

impl From<&FrequencyTable<'_>> for StatusCounts {
    fn from(table: &FrequencyTable<'_>) -> Self {
        StatusCounts(
            table
                .iter()
                .map(|(code, count)| (code.to_string(), count))
                .collect(),
        )
    }
}

impl Serialize for StatusCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, count) in &self.0 {
            map.serialize_entry(code, count)?;
        }
        map.end()
    }
}

/// The complete analysis output
#[derive(Debug, Clone, serde::Serialize)]
pub struct Summary {
    pub total_records: usize,
    pub top_n: usize,
    pub top_clients: TopNList,
    pub top_agents: TopNList,
    pub status_counts: StatusCounts,
}

/// Aggregate parsed records into client, user agent and status summaries.
///
/// A `top_n` of zero yields empty top lists; the status counts are always
/// complete.
pub fn analyze(records: &[LogRecord], top_n: usize) -> Summary {
    let mut clients = FrequencyTable::new();
    let mut agents = FrequencyTable::new();
    let mut statuses = FrequencyTable::new();

    for record in records {
        clients.increment(record.client_address.as_str());
        agents.increment(record.user_agent.as_str());
        statuses.increment(record.status_code.as_str());
    }

    Summary {
        total_records: records.len(),
        top_n,
        top_clients: clients.ranked(top_n),
        top_agents: agents.ranked(top_n),
        status_counts: StatusCounts::from(&statuses),
    }
}
