//! Application tracking.
//!
//! There is no tracking backend yet: any non-empty id resolves to the same
//! demonstration record. Looked-up ids are kept in a short history.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{KeyValueStore, keys};

/// How many ids the tracking history keeps.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStep {
    pub name: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedApplication {
    pub id: String,
    pub restaurant_name: String,
    pub status: ApplicationStatus,
    pub submitted_date: NaiveDate,
    pub last_update: NaiveDate,
    pub steps: Vec<ApplicationStep>,
}

/// Completed-step count for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage; 0 when there are no steps.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

impl TrackedApplication {
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.steps.iter().filter(|s| s.completed).count(),
            total: self.steps.len(),
        }
    }

    /// The demonstration record returned for every lookup.
    pub fn sample() -> Self {
        let step = |name: &str, date: Option<NaiveDate>| ApplicationStep {
            name: name.to_string(),
            completed: date.is_some(),
            date,
        };
        Self {
            id: "KD2024001".to_string(),
            restaurant_name: "Sample Restaurant".to_string(),
            status: ApplicationStatus::UnderReview,
            submitted_date: ymd(2024, 1, 15),
            last_update: ymd(2024, 1, 18),
            steps: vec![
                step("Application Submitted", Some(ymd(2024, 1, 15))),
                step("Document Verification", Some(ymd(2024, 1, 16))),
                step("Quality Review", None),
                step("Contract Preparation", None),
                step("Account Setup", None),
            ],
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Resolves tracking ids and remembers recent lookups.
pub struct TrackingService {
    store: Arc<dyn KeyValueStore>,
}

impl TrackingService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Look up an application by tracking id. Blank ids resolve to nothing.
    pub async fn lookup(&self, tracking_id: &str) -> Option<TrackedApplication> {
        let id = tracking_id.trim();
        if id.is_empty() {
            return None;
        }
        debug!(tracking_id = %id, "Tracking application");
        self.remember(id).await;
        Some(TrackedApplication::sample())
    }

    /// Recently tracked ids, most recent first.
    pub async fn history(&self) -> Vec<String> {
        match self.store.get(keys::TRACKING_HISTORY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed tracking history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read tracking history");
                Vec::new()
            }
        }
    }

    async fn remember(&self, id: &str) {
        let mut history = self.history().await;
        history.retain(|existing| existing != id);
        history.insert(0, id.to_string());
        history.truncate(HISTORY_LIMIT);

        let value = match serde_json::to_string(&history) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Failed to serialize tracking history");
                return;
            }
        };
        if let Err(e) = self.store.set(keys::TRACKING_HISTORY, &value).await {
            warn!(error = %e, "Failed to save tracking history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn blank_id_finds_nothing() {
        let svc = TrackingService::new(Arc::new(MemoryStore::new()));
        assert!(svc.lookup("").await.is_none());
        assert!(svc.lookup("   ").await.is_none());
        assert!(svc.history().await.is_empty());
    }

    #[tokio::test]
    async fn any_id_returns_sample() {
        let svc = TrackingService::new(Arc::new(MemoryStore::new()));
        let app = svc.lookup("whatever").await.unwrap();
        assert_eq!(app.id, "KD2024001");
        assert_eq!(app.status, ApplicationStatus::UnderReview);
        assert_eq!(app.status.label(), "Under Review");
    }

    #[test]
    fn sample_progress() {
        let progress = TrackedApplication::sample().progress();
        assert_eq!(progress, Progress { completed: 2, total: 5 });
        assert_eq!(progress.percent(), 40);
        assert_eq!(Progress { completed: 0, total: 0 }.percent(), 0);
    }

    #[tokio::test]
    async fn history_is_recent_first_and_deduplicated() {
        let svc = TrackingService::new(Arc::new(MemoryStore::new()));
        svc.lookup("A").await;
        svc.lookup("B").await;
        svc.lookup(" A ").await;
        assert_eq!(svc.history().await, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let svc = TrackingService::new(Arc::new(MemoryStore::new()));
        for i in 0..(HISTORY_LIMIT + 5) {
            svc.lookup(&format!("KD{i}")).await;
        }
        let history = svc.history().await;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0], format!("KD{}", HISTORY_LIMIT + 4));
    }

    #[tokio::test]
    async fn lookup_survives_store_failure() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        store.fail_reads(true);
        let svc = TrackingService::new(store);
        assert!(svc.lookup("KD2024001").await.is_some());
    }

    #[test]
    fn sample_serializes_dates_as_iso() {
        let json = serde_json::to_value(TrackedApplication::sample()).unwrap();
        assert_eq!(json["submittedDate"], "2024-01-15");
        assert_eq!(json["status"], "under_review");
        assert!(json["steps"][2].get("date").is_none());
    }
}
