//! Restaurant registration wizard.
//!
//! A three-step form (basic info, restaurant details, review) with inline
//! validation, a best-effort draft kept in the key-value store, and a
//! simulated submission. The wizard reports to its host only through the
//! `WizardHost` and `Notifier` traits.

pub mod draft;
pub mod host;
pub mod model;
pub mod state;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use draft::DraftManager;
pub use host::{ChannelHost, HostEvent, Notice, NoticeAction, Notifier, TerminalSignal, WizardHost};
pub use model::{RegistrationField, RestaurantApplication, ReviewSummary};
pub use state::{WizardState, WizardStep};
pub use submission::{
    ApplicationSubmitter, SimulatedSubmitter, SubmissionOutcome, SubmissionPipeline,
};
pub use validation::{FieldError, FieldErrorKind, Scope, ValidationResult, validate};
pub use wizard::{RegistrationWizard, StepOutcome, WizardDeps};
