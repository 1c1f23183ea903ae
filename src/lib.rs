//! Partner onboarding: restaurant registration wizard core.

pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod registration;
pub mod settings;
pub mod store;
pub mod tracking;
