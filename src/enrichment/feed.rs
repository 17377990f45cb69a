use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::resolver::EnrichmentResolver;
use super::snapshot::EnrichmentSnapshot;
use super::source::EnrichmentSource;
use crate::dashboard::PipelineInstance;

/// What subscribers currently see.
#[derive(Debug, Clone, Default)]
pub enum EnrichmentState {
    /// No refresh has completed yet.
    #[default]
    Pending,
    Ready(Arc<EnrichmentSnapshot>),
}

impl EnrichmentState {
    pub fn snapshot(&self) -> Option<&EnrichmentSnapshot> {
        match self {
            Self::Pending => None,
            Self::Ready(snapshot) => Some(&**snapshot),
        }
    }

    fn generation(&self) -> u64 {
        self.snapshot().map_or(0, EnrichmentSnapshot::generation)
    }
}

/// Handle for one refresh cycle. Later tickets always have higher generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket {
    generation: u64,
}

/// Publishes enrichment snapshots to any number of subscribers.
///
/// A snapshot is only published if its refresh started after the one that
/// produced the currently visible snapshot, so a slow, older refresh can
/// never replace the result of a newer one. A refresh that is dropped before
/// completion publishes nothing.
pub struct EnrichmentFeed {
    sender: watch::Sender<EnrichmentState>,
    last_generation: AtomicU64,
}

impl Default for EnrichmentFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichmentFeed {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(EnrichmentState::Pending);
        Self {
            sender,
            last_generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<EnrichmentState> {
        self.sender.subscribe()
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.last_generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Publishes `snapshot` for `ticket`; returns whether it became visible.
    pub fn publish(&self, ticket: RefreshTicket, snapshot: EnrichmentSnapshot) -> bool {
        let snapshot = snapshot.stamped(ticket.generation);

        self.sender.send_if_modified(|state| {
            let visible = state.generation();
            if ticket.generation <= visible {
                debug!(
                    "Discarding snapshot of refresh {} (refresh {visible} already published)",
                    ticket.generation
                );
                return false;
            }
            *state = EnrichmentState::Ready(Arc::new(snapshot));
            true
        })
    }

    /// Runs one complete refresh cycle and publishes its snapshot.
    pub async fn refresh<S: EnrichmentSource>(
        &self,
        resolver: &EnrichmentResolver<S>,
        pipelines: &[PipelineInstance],
        project: &str,
    ) -> bool {
        let ticket = self.begin_refresh();
        let snapshot = resolver.enrich(pipelines, project).await;
        self.publish(ticket, snapshot)
    }
}
