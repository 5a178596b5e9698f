//! The outbound-link gate: overlay first, destination after a fixed delay.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

#[must_use]
pub fn redirect_message(store: &str) -> String {
    format!("Levando você para a {store}...")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    Idle,
    Showing { store: String, message: String },
}

/// Opens the real destination once the overlay delay has elapsed.
pub trait Opener: Send + Sync {
    fn open(&self, url: &str, store: &str);
}

/// `Idle -> Showing -> Idle`. A trigger cannot be cancelled once started.
///
/// Overlapping triggers each run to completion; the gate shows the most
/// recent store and returns to `Idle` when the last one finishes.
pub struct RedirectGate<O: Opener> {
    delay: Duration,
    hide_after: Duration,
    opener: O,
    state: Mutex<GateState>,
    in_flight: AtomicUsize,
}

impl<O: Opener> RedirectGate<O> {
    #[must_use]
    pub fn new(delay: Duration, hide_after: Duration, opener: O) -> Self {
        Self {
            delay,
            hide_after,
            opener,
            state: Mutex::new(GateState::Idle),
            in_flight: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn opener(&self) -> &O {
        &self.opener
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, next: GateState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub async fn trigger(&self, store: &str, url: &str) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.set_state(GateState::Showing {
            store: store.to_owned(),
            message: redirect_message(store),
        });

        tokio::time::sleep(self.delay).await;
        self.opener.open(url, store);
        tokio::time::sleep(self.hide_after).await;

        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.set_state(GateState::Idle);
        }
    }
}

/// Records outbound clicks per store instead of opening anything.
#[derive(Debug, Default)]
pub struct OutboundLog {
    clicks: Mutex<BTreeMap<String, u64>>,
}

impl OutboundLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn counts(&self) -> BTreeMap<String, u64> {
        self.clicks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts().values().sum()
    }
}

impl Opener for OutboundLog {
    fn open(&self, url: &str, store: &str) {
        let mut clicks = self.clicks.lock().unwrap_or_else(PoisonError::into_inner);
        let count = clicks.entry(store.to_owned()).or_insert(0);
        *count += 1;
        tracing::info!(store, url, clicks = *count, "outbound click");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn message_names_the_store() {
        assert_eq!(redirect_message("Amazon"), "Levando você para a Amazon...");
    }

    #[test]
    fn outbound_log_counts_per_store() {
        let log = OutboundLog::new();
        log.open("https://a", "Amazon");
        log.open("https://b", "Amazon");
        log.open("https://c", "Shopee");
        assert_eq!(log.counts().get("Amazon"), Some(&2));
        assert_eq!(log.counts().get("Shopee"), Some(&1));
        assert_eq!(log.total(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_shows_then_opens_then_hides() {
        let gate = Arc::new(RedirectGate::new(
            Duration::from_millis(1200),
            Duration::from_millis(500),
            OutboundLog::new(),
        ));
        assert_eq!(gate.state(), GateState::Idle);

        let running = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.trigger("Amazon", "https://amazon.com.br/x").await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            gate.state(),
            GateState::Showing {
                store: "Amazon".to_owned(),
                message: "Levando você para a Amazon...".to_owned(),
            }
        );
        assert_eq!(gate.opener().total(), 0);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(gate.opener().total(), 1);
        assert!(matches!(gate.state(), GateState::Showing { .. }));

        running.await.unwrap();
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_triggers_stay_showing_until_the_last_finishes() {
        let gate = Arc::new(RedirectGate::new(
            Duration::from_millis(1200),
            Duration::from_millis(500),
            OutboundLog::new(),
        ));
        let first = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.trigger("Amazon", "https://a").await }
        });
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.trigger("Shopee", "https://s").await }
        });

        first.await.unwrap();
        assert!(matches!(
            gate.state(),
            GateState::Showing { ref store, .. } if store == "Shopee"
        ));
        second.await.unwrap();
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.opener().total(), 2);
    }
}
