//! `KeyValueStore` trait: the single async persistence seam.
//!
//! Everything the app persists (registration draft, preferences, tracking
//! history) is a string value under a fixed string key.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Fixed keys used by the app.
pub mod keys {
    /// In-progress registration form, JSON.
    pub const REGISTRATION_DRAFT: &str = "registration_draft";
    /// `AppSettings` JSON blob.
    pub const USER_PREFERENCES: &str = "user_preferences";
    /// JSON array of recently tracked application ids.
    pub const TRACKING_HISTORY: &str = "tracking_history";
}

/// Decode a stored JSON object into `T`.
///
/// Only a top-level object is accepted. Derived `Deserialize` impls would
/// otherwise also fill a struct positionally from an array.
pub fn decode_record<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(StoreError::Serialization(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Backend-agnostic key-value store.
///
/// Implementations must serialize writes to the same key, so that the last
/// completed `set`/`remove` is the value later observed by `get`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite the value under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
