//! Background reclamation of expired entries.

use crate::store::ExpiringStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Handle to a running sweep task.
///
/// Dropping the handle also signals shutdown, so a forgotten handle cannot
/// leave an orphaned forever-loop behind.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl SweeperHandle {
    /// Signal the sweep task to stop after its current pass.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawn the periodic sweep task for `store`.
///
/// Every `interval` the task removes entries past expiry, comparing against
/// a single clock snapshot per pass. A pass cannot fail, so the loop runs
/// for the life of the process unless stopped through the returned handle.
/// If the runtime stalls the task, entries simply linger past expiry until
/// it resumes.
///
/// # Panics
/// Panics if called outside a tokio runtime.
pub fn spawn(store: Arc<ExpiringStore>, interval: Duration) -> SweeperHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; wait a full interval instead.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.sweep(Instant::now());
                    if removed > 0 {
                        tracing::debug!(removed, remaining = store.len(), "expiry sweep");
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::debug!("sweeper stopped");
                        break;
                    }
                }
            }
        }
    });

    SweeperHandle { shutdown_tx }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reclaims_expired_entries_on_cadence() {
        let store = Arc::new(ExpiringStore::new());
        store.put("gone", "x", Duration::ZERO);
        store.put("kept", "y", Duration::from_secs(60));

        let handle = spawn(Arc::clone(&store), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(store.get("gone").is_none());
        assert_eq!(store.get("kept").as_deref(), Some("y"));
        handle.shutdown();
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let store = Arc::new(ExpiringStore::new());
        let handle = spawn(Arc::clone(&store), Duration::from_millis(10));

        handle.shutdown();
        tokio::time::sleep(Duration::from_millis(40)).await;

        // The stopped task no longer reclaims this expired entry.
        store.put("late", "x", Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.get("late").as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_task() {
        let store = Arc::new(ExpiringStore::new());
        drop(spawn(Arc::clone(&store), Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(40)).await;

        store.put("late", "x", Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.get("late").as_deref(), Some("x"));
    }
}
