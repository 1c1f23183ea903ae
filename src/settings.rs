//! User preferences: language, theme, notifications, auto-save.
//!
//! Loaded once at startup from the `user_preferences` key (or defaults) and
//! passed around explicitly as a `SettingsContext`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::store::{KeyValueStore, decode_record, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "العربية",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Persisted user preferences.
///
/// Members missing from a stored record take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub language: Language,
    pub theme: Theme,
    pub notifications: bool,
    pub auto_save: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::En,
            theme: Theme::Light,
            notifications: true,
            auto_save: true,
        }
    }
}

/// Shared handle to the current preferences and their store.
pub struct SettingsContext {
    store: Arc<dyn KeyValueStore>,
    settings: RwLock<AppSettings>,
}

impl SettingsContext {
    /// Read preferences from the store, falling back to defaults when they
    /// are absent, unreadable or malformed.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let settings = match store.get(keys::USER_PREFERENCES).await {
            Ok(Some(raw)) => decode_record(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed user preferences");
                AppSettings::default()
            }),
            Ok(None) => AppSettings::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load user preferences");
                AppSettings::default()
            }
        };

        Self {
            store,
            settings: RwLock::new(settings),
        }
    }

    pub async fn current(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    /// Apply `f` to the preferences and persist the result.
    ///
    /// The in-memory value only changes once the store accepts the write.
    pub async fn update<F>(&self, f: F) -> Result<AppSettings, StoreError>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut settings = self.settings.write().await;
        let mut updated = settings.clone();
        f(&mut updated);

        let value = serde_json::to_string(&updated)?;
        self.store.set(keys::USER_PREFERENCES, &value).await?;
        *settings = updated.clone();
        info!(
            language = updated.language.code(),
            theme = ?updated.theme,
            notifications = updated.notifications,
            auto_save = updated.auto_save,
            "Settings saved"
        );
        Ok(updated)
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<AppSettings, StoreError> {
        self.update(|s| s.theme = theme).await
    }

    pub async fn toggle_theme(&self) -> Result<AppSettings, StoreError> {
        self.update(|s| s.theme = s.theme.toggled()).await
    }
}
