use indexmap::IndexMap;
use serde::Serialize;

/// Enriched labels for one pipeline/environment cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub build_label: String,
    pub approver_name: Option<String>,
}

/// Result of one refresh cycle, keyed by [`make_key`](super::keys::make_key).
///
/// Immutable once built. The generation identifies the refresh that produced
/// it; snapshots built outside an [`EnrichmentFeed`](super::feed::EnrichmentFeed)
/// carry generation 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSnapshot {
    generation: u64,
    entries: IndexMap<String, Enrichment>,
}

impl EnrichmentSnapshot {
    pub(super) fn new(entries: IndexMap<String, Enrichment>) -> Self {
        Self {
            generation: 0,
            entries,
        }
    }

    pub(super) fn stamped(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, key: &str) -> Option<&Enrichment> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Enrichment)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of cells that resolved an approver.
    pub fn approved_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.approver_name.is_some())
            .count()
    }
}
