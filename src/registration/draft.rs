//! Draft persistence for the registration form.
//!
//! Every edit schedules a fire-and-forget save. Saves are best effort: a
//! failing store is logged and otherwise ignored, and a missing or corrupt
//! draft loads as an empty form. `clear()` is the final write of a session.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::store::{KeyValueStore, decode_record, keys};

use super::model::RestaurantApplication;

/// Loads, saves and clears the persisted registration draft.
pub struct DraftManager {
    store: Arc<dyn KeyValueStore>,
    key: String,
    /// Generation handed to the most recent `save`.
    issued: AtomicU64,
    /// Highest generation written. Held while touching the key.
    written: Arc<tokio::sync::Mutex<u64>>,
    cleared: Arc<AtomicBool>,
    pending: Mutex<JoinSet<()>>,
}

impl DraftManager {
    /// Manager for the standard `registration_draft` key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, keys::REGISTRATION_DRAFT)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            issued: AtomicU64::new(0),
            written: Arc::new(tokio::sync::Mutex::new(0)),
            cleared: Arc::new(AtomicBool::new(false)),
            pending: Mutex::new(JoinSet::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored draft, or an empty form if there is none or it can't
    /// be read or parsed.
    pub async fn load(&self) -> RestaurantApplication {
        match self.store.get(&self.key).await {
            Ok(Some(raw)) => match decode_record::<RestaurantApplication>(&raw) {
                Ok(app) => {
                    info!(key = %self.key, "Loaded registration draft");
                    app
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Discarding malformed registration draft");
                    RestaurantApplication::default()
                }
            },
            Ok(None) => {
                debug!(key = %self.key, "No registration draft stored");
                RestaurantApplication::default()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read registration draft");
                RestaurantApplication::default()
            }
        }
    }

    /// Schedule a write of `snapshot`. Returns immediately.
    ///
    /// A save that lands after a newer one has been written is skipped, and
    /// nothing is written once `clear()` has started.
    pub fn save(&self, snapshot: &RestaurantApplication) {
        if self.cleared.load(Ordering::SeqCst) {
            debug!(key = %self.key, "Draft already cleared, skipping save");
            return;
        }

        let value = match serde_json::to_string(snapshot) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Failed to serialize registration draft");
                return;
            }
        };

        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let written = Arc::clone(&self.written);
        let cleared = Arc::clone(&self.cleared);

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            let mut last = written.lock().await;
            if cleared.load(Ordering::SeqCst) || generation < *last {
                debug!(key = %key, generation, "Skipping superseded draft save");
                return;
            }
            match store.set(&key, &value).await {
                Ok(()) => *last = generation,
                Err(e) => warn!(key = %key, error = %e, "Failed to save registration draft"),
            }
        });
    }

    /// Wait for every save scheduled so far to finish.
    pub async fn flush(&self) {
        let mut in_flight = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pending)
        };
        while let Some(res) = in_flight.join_next().await {
            if let Err(e) = res {
                warn!(error = %e, "Draft save task failed");
            }
        }
    }

    /// Remove the stored draft. No save issued by this manager can land
    /// afterwards.
    pub async fn clear(&self) {
        self.cleared.store(true, Ordering::SeqCst);
        self.flush().await;

        let _guard = self.written.lock().await;
        match self.store.remove(&self.key).await {
            Ok(()) => info!(key = %self.key, "Registration draft cleared"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to clear registration draft"),
        }
    }
}

impl Drop for DraftManager {
    fn drop(&mut self) {
        // In-flight saves may still finish after the session is gone.
        self.pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .detach_all();
    }
}
