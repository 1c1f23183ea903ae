//! `RegistrationWizard` owns one registration session: form data, step
//! progression, draft persistence and submission.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::store::KeyValueStore;

use super::draft::DraftManager;
use super::host::{Notifier, TerminalSignal, WizardHost};
use super::model::{RegistrationField, RestaurantApplication, ReviewSummary};
use super::state::{WizardState, WizardStep};
use super::submission::{ApplicationSubmitter, SubmissionOutcome, SubmissionPipeline};
use super::validation::{Scope, ValidationResult, validate};

/// External collaborators a wizard session needs.
pub struct WizardDeps {
    pub store: Arc<dyn KeyValueStore>,
    pub submitter: Arc<dyn ApplicationSubmitter>,
    pub host: Arc<dyn WizardHost>,
    pub notifier: Arc<dyn Notifier>,
    /// Persist a draft after every edit. Mirrors the user's auto-save setting
    /// (on by default). When off, edits are never saved, not even the first
    /// one, and a restart loses them. A successful submission still clears
    /// any stored draft.
    pub auto_save: bool,
}

/// Result of a `next()` or `back()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Moved forward to the given step.
    Advanced(WizardStep),
    /// Step validation failed; stayed put with errors published.
    Blocked(ValidationResult),
    /// Moved back to the given step.
    Retreated(WizardStep),
    /// Backed out of the first step; the host has been told.
    Exited,
    /// `next()` on the review step ran the submission pipeline.
    Submission(SubmissionOutcome),
}

/// One registration session.
pub struct RegistrationWizard {
    application: RestaurantApplication,
    state: watch::Sender<WizardState>,
    draft: Arc<DraftManager>,
    pipeline: SubmissionPipeline,
    host: Arc<dyn WizardHost>,
    auto_save: bool,
}

impl RegistrationWizard {
    /// Start a session, restoring any saved draft.
    pub async fn mount(deps: WizardDeps) -> Self {
        let draft = Arc::new(DraftManager::new(deps.store));
        let application = draft.load().await;
        let (state, _) = watch::channel(WizardState::default());
        let pipeline = SubmissionPipeline::new(
            deps.submitter,
            Arc::clone(&draft),
            deps.notifier,
            Arc::clone(&deps.host),
        );

        info!(
            restored = !application.is_blank(),
            auto_save = deps.auto_save,
            "Registration wizard mounted"
        );

        Self {
            application,
            state,
            draft,
            pipeline,
            host: deps.host,
            auto_save: deps.auto_save,
        }
    }

    /// Current form data.
    pub fn application(&self) -> &RestaurantApplication {
        &self.application
    }

    /// Snapshot of the step, errors and submission flag.
    pub fn state(&self) -> WizardState {
        self.state.borrow().clone()
    }

    /// Watch state changes (step moves, errors, `is_submitting`).
    pub fn subscribe(&self) -> watch::Receiver<WizardState> {
        self.state.subscribe()
    }

    pub fn current_step(&self) -> WizardStep {
        self.state.borrow().current_step
    }

    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::from_application(&self.application)
    }

    /// Overwrite one field. Applied immediately; the draft save runs in the
    /// background.
    pub fn update_field(&mut self, field: RegistrationField, value: impl Into<String>) {
        self.application.set(field, value);
        if self.auto_save {
            self.draft.save(&self.application);
        }
    }

    /// Wait until every draft save issued so far has settled.
    pub async fn flush_draft(&self) {
        self.draft.flush().await;
    }

    /// Advance one step if the current step validates; on the review step,
    /// submit instead.
    pub async fn next(&mut self) -> StepOutcome {
        let step = self.current_step();

        let Some(next) = step.next() else {
            let outcome = self.pipeline.run(&self.application, &self.state).await;
            return StepOutcome::Submission(outcome);
        };

        let validation = validate(&self.application, Scope::Step(step));
        if !validation.is_valid() {
            debug!(step = %step, failing = validation.errors.len(), "Step validation failed");
            let messages = validation.messages();
            self.state.send_modify(|s| s.errors = messages);
            return StepOutcome::Blocked(validation);
        }

        self.state.send_modify(|s| s.enter(next));
        debug!(from = %step, to = %next, "Wizard advanced");
        StepOutcome::Advanced(next)
    }

    /// Go back one step, or exit the wizard from the first step. Form data is
    /// kept either way.
    pub fn back(&mut self) -> StepOutcome {
        let step = self.current_step();
        match step.previous() {
            Some(previous) => {
                self.state.send_modify(|s| s.enter(previous));
                debug!(from = %step, to = %previous, "Wizard went back");
                StepOutcome::Retreated(previous)
            }
            None => {
                self.state.send_modify(|s| s.errors.clear());
                info!("Registration wizard exited from first step");
                self.host.on_terminal(TerminalSignal::Exited);
                StepOutcome::Exited
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::registration::host::{ChannelHost, HostEvent};
    use crate::registration::submission::SimulatedSubmitter;
    use crate::store::MemoryStore;

    async fn wizard(store: Arc<MemoryStore>) -> (RegistrationWizard, tokio::sync::mpsc::UnboundedReceiver<HostEvent>) {
        let (host, rx) = ChannelHost::new();
        let host = Arc::new(host);
        let wizard = RegistrationWizard::mount(WizardDeps {
            store,
            submitter: Arc::new(SimulatedSubmitter::reliable(Duration::from_millis(2000))),
            host: host.clone(),
            notifier: host,
            auto_save: true,
        })
        .await;
        (wizard, rx)
    }

    fn fill_step1(w: &mut RegistrationWizard) {
        w.update_field(RegistrationField::RestaurantName, "Bella");
        w.update_field(RegistrationField::OwnerName, "Ana");
        w.update_field(RegistrationField::Email, "a@b.com");
        w.update_field(RegistrationField::Phone, "+96890000000");
    }

    #[tokio::test]
    async fn starts_on_first_step() {
        let (w, _rx) = wizard(Arc::new(MemoryStore::new())).await;
        assert_eq!(w.state(), WizardState::default());
        assert!(w.application().is_blank());
    }

    #[tokio::test]
    async fn valid_step1_advances() {
        let (mut w, _rx) = wizard(Arc::new(MemoryStore::new())).await;
        fill_step1(&mut w);

        assert_eq!(w.next().await, StepOutcome::Advanced(WizardStep::Details));
        assert_eq!(w.current_step(), WizardStep::Details);
        assert!(w.state().errors.is_empty());
    }

    #[tokio::test]
    async fn blocked_step_keeps_position_and_scopes_errors() {
        let (mut w, _rx) = wizard(Arc::new(MemoryStore::new())).await;
        fill_step1(&mut w);
        w.update_field(RegistrationField::Email, "not-an-email");

        assert!(matches!(w.next().await, StepOutcome::Blocked(_)));
        let state = w.state();
        assert_eq!(state.current_step, WizardStep::BasicInfo);
        assert_eq!(
            state.error_for(RegistrationField::Email),
            Some("Please enter a valid email address")
        );
        assert!(state.error_for(RegistrationField::RestaurantName).is_none());
        assert_eq!(state.errors.len(), 1);
    }

    #[tokio::test]
    async fn step2_errors_never_include_step1_fields() {
        let (mut w, _rx) = wizard(Arc::new(MemoryStore::new())).await;
        fill_step1(&mut w);
        w.next().await;

        // Break a step-1 field after leaving it; step 2 must not report it.
        w.update_field(RegistrationField::Phone, "");
        assert!(matches!(w.next().await, StepOutcome::Blocked(_)));
        let fields: Vec<_> = w.state().errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![RegistrationField::Address, RegistrationField::Cuisine]
        );
    }

    #[tokio::test]
    async fn back_clears_errors_and_keeps_data() {
        let (mut w, _rx) = wizard(Arc::new(MemoryStore::new())).await;
        fill_step1(&mut w);
        w.next().await;
        w.next().await;
        assert!(!w.state().errors.is_empty());

        assert_eq!(w.back(), StepOutcome::Retreated(WizardStep::BasicInfo));
        assert!(w.state().errors.is_empty());
        assert_eq!(w.application().restaurant_name, "Bella");
    }

    #[tokio::test]
    async fn back_from_first_step_exits() {
        let (mut w, mut rx) = wizard(Arc::new(MemoryStore::new())).await;
        assert_eq!(w.back(), StepOutcome::Exited);
        assert_eq!(w.current_step(), WizardStep::BasicInfo);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::Terminal(TerminalSignal::Exited)
        );
    }

    #[tokio::test]
    async fn edits_are_saved_as_draft() {
        let store = Arc::new(MemoryStore::new());
        let (mut w, _rx) = wizard(store.clone()).await;
        fill_step1(&mut w);
        w.flush_draft().await;
        drop(w);

        let (restored, _rx) = wizard(store).await;
        assert_eq!(restored.application().restaurant_name, "Bella");
        assert_eq!(restored.application().phone, "+96890000000");
        assert_eq!(restored.current_step(), WizardStep::BasicInfo);
    }

    #[tokio::test]
    async fn auto_save_off_skips_draft() {
        let store = Arc::new(MemoryStore::new());
        let (host, _rx) = ChannelHost::new();
        let host = Arc::new(host);
        let mut w = RegistrationWizard::mount(WizardDeps {
            store: store.clone(),
            submitter: Arc::new(SimulatedSubmitter::reliable(Duration::ZERO)),
            host: host.clone(),
            notifier: host,
            auto_save: false,
        })
        .await;
        fill_step1(&mut w);
        w.flush_draft().await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn subscribers_see_step_changes() {
        let (mut w, _rx) = wizard(Arc::new(MemoryStore::new())).await;
        let mut watcher = w.subscribe();
        fill_step1(&mut w);
        w.next().await;

        assert!(watcher.has_changed().unwrap());
        assert_eq!(
            watcher.borrow_and_update().current_step,
            WizardStep::Details
        );
    }
}
