//! Registration wizard state machine: tracks which step the user is on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::RegistrationField;

/// The steps of the registration wizard.
///
/// Progresses linearly: BasicInfo → Details → Review. Submission is entered
/// only from Review and is tracked by `WizardState::is_submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    Details,
    Review,
}

impl WizardStep {
    /// Number of steps in the wizard.
    pub const TOTAL: u8 = 3;

    /// 1-based position, as shown in the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Details => 2,
            Self::Review => 3,
        }
    }

    /// Heading shown above the step's inputs.
    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::Details => "Restaurant Details",
            Self::Review => "Review & Submit",
        }
    }

    /// Fields edited on this step. Review edits nothing.
    pub fn fields(&self) -> &'static [RegistrationField] {
        use RegistrationField::*;
        match self {
            Self::BasicInfo => &[RestaurantName, OwnerName, Email, Phone],
            Self::Details => &[Address, Cuisine, Description],
            Self::Review => &[],
        }
    }

    /// The following step, or `None` on the last one.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::BasicInfo => Some(Self::Details),
            Self::Details => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The preceding step, or `None` on the first one.
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            Self::BasicInfo => None,
            Self::Details => Some(Self::BasicInfo),
            Self::Review => Some(Self::Details),
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::BasicInfo
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BasicInfo => "basic_info",
            Self::Details => "details",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// Session-scoped wizard state. Never persisted; only the form is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: WizardStep,
    /// Inline messages from the most recent validation run.
    pub errors: BTreeMap<RegistrationField, String>,
    /// True only while a submission round trip is in flight.
    pub is_submitting: bool,
}

impl WizardState {
    /// Move to `step`, dropping errors that belonged to the old step.
    pub fn enter(&mut self, step: WizardStep) {
        self.current_step = step;
        self.errors.clear();
    }

    pub fn error_for(&self, field: RegistrationField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: [WizardStep; 3] = [WizardStep::BasicInfo, WizardStep::Details, WizardStep::Review];

    #[test]
    fn next_walks_all_steps() {
        let mut current = WizardStep::default();
        let mut seen = vec![current];
        while let Some(next) = current.next() {
            seen.push(next);
            current = next;
        }
        assert_eq!(
            seen,
            vec![WizardStep::BasicInfo, WizardStep::Details, WizardStep::Review]
        );
        assert!(current.is_last());
    }

    #[test]
    fn previous_is_inverse_of_next() {
        for step in STEPS {
            if let Some(next) = step.next() {
                assert_eq!(next.previous(), Some(step));
            }
        }
        assert_eq!(WizardStep::BasicInfo.previous(), None);
    }

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(WizardStep::BasicInfo.number(), 1);
        assert_eq!(WizardStep::Review.number(), WizardStep::TOTAL);
        assert_eq!(STEPS.map(|s| s.number()), [1, 2, 3]);
    }

    #[test]
    fn display_matches_serde() {
        for step in STEPS {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }

    #[test]
    fn enter_clears_errors() {
        let mut state = WizardState::default();
        state
            .errors
            .insert(RegistrationField::Email, "Email is required".into());
        assert_eq!(
            state.error_for(RegistrationField::Email),
            Some("Email is required")
        );

        state.enter(WizardStep::Details);
        assert_eq!(state.current_step, WizardStep::Details);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn default_state() {
        let state = WizardState::default();
        assert_eq!(state.current_step, WizardStep::BasicInfo);
        assert!(state.errors.is_empty());
        assert!(!state.is_submitting);
    }
}
