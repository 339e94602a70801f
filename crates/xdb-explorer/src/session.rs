//! Last-writer-wins bookkeeping for overlapping lookups
//!
//! Owned by whatever presents results, never by the aggregator. Each lookup
//! takes a ticket before it starts; a completed result is kept only if no
//! lookup started later has already delivered its own.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Position of one lookup in start order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

pub struct LookupSequencer<T> {
    issued: AtomicU64,
    latest: RwLock<Option<(LookupTicket, T)>>,
}

impl<T: Clone> LookupSequencer<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    /// Ticket for a lookup about to start
    pub fn begin(&self) -> LookupTicket {
        LookupTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the most recently started lookup
    pub fn is_latest(&self, ticket: LookupTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Offer a finished result; returns `false` if it was stale and dropped
    pub async fn complete(&self, ticket: LookupTicket, value: T) -> bool {
        let mut latest = self.latest.write().await;
        if let Some((held, _)) = latest.as_ref() {
            if *held > ticket {
                debug!("Dropping stale lookup #{} (holding #{})", ticket.0, held.0);
                return false;
            }
        }
        *latest = Some((ticket, value));
        true
    }

    /// Result of the newest lookup that has completed so far
    pub async fn current(&self) -> Option<T> {
        self.latest.read().await.as_ref().map(|(_, value)| value.clone())
    }
}

impl<T: Clone> Default for LookupSequencer<T> {
    fn default() -> Self {
        Self::new()
    }
}
