//! Deduplica delle visualizzazioni: una vista per (visitatore, post) ogni `VIEW_DEDUP_WINDOW`

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

pub const VIEW_DEDUP_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

// oltre questa soglia le voci scadute vengono ripulite a ogni registrazione
const PURGE_THRESHOLD: usize = 10_000;

pub struct ViewTracker {
    seen: DashMap<(String, Uuid), Instant>,
    window: Duration,
}

impl ViewTracker {
    pub fn new() -> Self {
        Self::with_window(VIEW_DEDUP_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            seen: DashMap::new(),
            window,
        }
    }

    /// true se la vista va contata; la registra come vista più recente
    pub fn register(&self, viewer: &str, post_id: Uuid) -> bool {
        let now = Instant::now();
        if self.seen.len() > PURGE_THRESHOLD {
            self.purge_expired(now);
        }

        let mut counted = true;
        self.seen
            .entry((viewer.to_string(), post_id))
            .and_modify(|last| {
                if now.duration_since(*last) < self.window {
                    counted = false;
                } else {
                    *last = now;
                }
            })
            .or_insert(now);

        debug!(counted, "View registered");
        counted
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn purge_expired(&self, now: Instant) {
        self.seen
            .retain(|_, last| now.duration_since(*last) < self.window);
    }
}

impl Default for ViewTracker {
    fn default() -> Self {
        Self::new()
    }
}
