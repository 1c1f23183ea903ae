//! Submission pipeline: full validation, the simulated remote write, and
//! the success/failure bookkeeping around it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::SubmissionError;

use super::draft::DraftManager;
use super::host::{Notice, Notifier, TerminalSignal, WizardHost};
use super::model::RestaurantApplication;
use super::state::WizardState;
use super::validation::{Scope, ValidationResult, validate};

/// Remote endpoint that accepts a completed application.
#[async_trait]
pub trait ApplicationSubmitter: Send + Sync {
    async fn submit(&self, application: &RestaurantApplication) -> Result<(), SubmissionError>;
}

/// Stand-in for the partner API: waits a fixed latency, then succeeds or
/// fails at the configured rate. No network is touched.
pub struct SimulatedSubmitter {
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedSubmitter {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    /// Always succeeds after `latency`.
    pub fn reliable(latency: Duration) -> Self {
        Self::new(latency, 0.0)
    }

    /// Always fails after `latency`.
    pub fn failing(latency: Duration) -> Self {
        Self::new(latency, 1.0)
    }
}

#[async_trait]
impl ApplicationSubmitter for SimulatedSubmitter {
    async fn submit(&self, application: &RestaurantApplication) -> Result<(), SubmissionError> {
        let roll: f64 = rand::random();
        tokio::time::sleep(self.latency).await;

        if roll < self.failure_rate {
            return Err(SubmissionError::Unavailable(
                "simulated partner API failure".to_string(),
            ));
        }

        info!(
            restaurant = %application.restaurant_name,
            email = %application.email,
            "Registration submitted"
        );
        Ok(())
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Full validation failed; errors were published, nothing was sent.
    Invalid(ValidationResult),
    /// Another submission is still in flight.
    AlreadyInFlight,
    /// Sent, draft cleared, host signalled.
    Submitted,
    /// The remote call failed. Draft and step are untouched; retry is allowed.
    Failed(SubmissionError),
}

/// Runs a submission against the wizard state channel.
pub struct SubmissionPipeline {
    submitter: Arc<dyn ApplicationSubmitter>,
    draft: Arc<DraftManager>,
    notifier: Arc<dyn Notifier>,
    host: Arc<dyn WizardHost>,
}

impl SubmissionPipeline {
    pub fn new(
        submitter: Arc<dyn ApplicationSubmitter>,
        draft: Arc<DraftManager>,
        notifier: Arc<dyn Notifier>,
        host: Arc<dyn WizardHost>,
    ) -> Self {
        Self {
            submitter,
            draft,
            notifier,
            host,
        }
    }

    /// Validate and submit `application`.
    ///
    /// `state` is the wizard's published state; `is_submitting` and
    /// `errors` are updated through it so observers see each transition.
    pub async fn run(
        &self,
        application: &RestaurantApplication,
        state: &watch::Sender<WizardState>,
    ) -> SubmissionOutcome {
        let validation = validate(application, Scope::All);
        if !validation.is_valid() {
            info!(
                failing = validation.errors.len(),
                "Submission blocked by validation"
            );
            let messages = validation.messages();
            state.send_modify(|s| s.errors = messages);
            return SubmissionOutcome::Invalid(validation);
        }

        let claimed = state.send_if_modified(|s| {
            if s.is_submitting {
                return false;
            }
            s.is_submitting = true;
            s.errors.clear();
            true
        });
        if !claimed {
            warn!("Submission already in flight, ignoring");
            return SubmissionOutcome::AlreadyInFlight;
        }

        match self.submitter.submit(application).await {
            Ok(()) => {
                self.draft.clear().await;
                state.send_modify(|s| s.is_submitting = false);
                self.notifier.notify(Notice::submitted());
                self.host
                    .on_terminal(TerminalSignal::Submitted(application.clone()));
                SubmissionOutcome::Submitted
            }
            Err(e) => {
                warn!(error = %e, "Registration submission failed");
                state.send_modify(|s| s.is_submitting = false);
                self.notifier.notify(Notice::submission_failed());
                SubmissionOutcome::Failed(e)
            }
        }
    }
}
