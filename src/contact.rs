//! Contact-support form and static support details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::registration::validation::{is_present, is_valid_email};

/// Static support contact details.
pub mod support {
    pub const PHONE: &str = "+96893207302";
    pub const EMAIL: &str = "mubasher.tariq@khedmahdelivery.com";
    pub const ADDRESS: &str = "Khedmah Delivery Headquarters";
}

/// Why a contact form was not sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactFormError {
    #[error("Please fill in all fields")]
    Incomplete,

    #[error("Please enter a valid email address")]
    InvalidEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    New,
    Read,
    Replied,
}

/// A sent support message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

/// Editable contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactFormError> {
        if !is_present(&self.name) || !is_present(&self.email) || !is_present(&self.message) {
            return Err(ContactFormError::Incomplete);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ContactFormError::InvalidEmail);
        }
        Ok(())
    }

    /// Validate and send. On success the form is reset for the next message.
    pub fn send(&mut self) -> Result<ContactMessage, ContactFormError> {
        self.validate()?;

        let form = std::mem::take(self);
        let sent = ContactMessage {
            id: Uuid::new_v4(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            message: form.message.trim().to_string(),
            timestamp: Utc::now(),
            status: MessageStatus::New,
        };
        info!(id = %sent.id, email = %sent.email, "Support message sent");
        Ok(sent)
    }
}
