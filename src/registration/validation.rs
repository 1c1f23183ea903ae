//! Field validation rules shared by step gating and submission.
//!
//! There is exactly one rule set. `Scope` only selects which fields it runs
//! over, so a step can never accept input that submission would reject.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::model::{RegistrationField, RestaurantApplication};
use super::state::WizardStep;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").unwrap());

/// Why a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field is empty after trimming.
    MissingField,
    /// Present but malformed (email, phone).
    InvalidFormat,
}

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

/// Outcome of a validation run. Derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: BTreeMap<RegistrationField, FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Field → message map, as shown inline under each input.
    pub fn messages(&self) -> BTreeMap<RegistrationField, String> {
        self.errors
            .iter()
            .map(|(field, err)| (*field, err.message.clone()))
            .collect()
    }
}

/// Which fields a validation run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every field (submission).
    All,
    /// Only the fields edited on one step (step gating).
    Step(WizardStep),
}

impl Scope {
    pub fn fields(&self) -> &'static [RegistrationField] {
        match self {
            Self::All => &RegistrationField::ALL,
            Self::Step(step) => step.fields(),
        }
    }
}

/// Check `value` against the `local@domain.tld` shape.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Check a phone number: optional `+`, then 1–16 digits with a non-zero
/// first digit. Whitespace anywhere is ignored.
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

/// Non-empty after trimming.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Validate a single field's value.
pub fn check_field(field: RegistrationField, value: &str) -> Option<FieldError> {
    use RegistrationField::*;

    if !field.is_required() {
        return None;
    }

    if !is_present(value) {
        let message = match field {
            RestaurantName => "Restaurant name is required",
            OwnerName => "Owner name is required",
            Email => "Email is required",
            Phone => "Phone number is required",
            Address => "Address is required",
            Cuisine => "Cuisine type is required",
            Description => unreachable!("description is optional"),
        };
        return Some(FieldError {
            kind: FieldErrorKind::MissingField,
            message: message.to_string(),
        });
    }

    let malformed = match field {
        Email if !is_valid_email(value) => Some("Please enter a valid email address"),
        Phone if !is_valid_phone(value) => Some("Please enter a valid phone number"),
        _ => None,
    };

    malformed.map(|message| FieldError {
        kind: FieldErrorKind::InvalidFormat,
        message: message.to_string(),
    })
}

/// Validate `app` over the fields selected by `scope`.
pub fn validate(app: &RestaurantApplication, scope: Scope) -> ValidationResult {
    let errors = scope
        .fields()
        .iter()
        .filter_map(|field| check_field(*field, app.get(*field)).map(|err| (*field, err)))
        .collect();
    ValidationResult { errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_app() -> RestaurantApplication {
        RestaurantApplication {
            restaurant_name: "Bella".into(),
            owner_name: "Ana".into(),
            email: "a@b.com".into(),
            phone: "+96890000000".into(),
            address: "Way 123, Muscat".into(),
            cuisine: "Italian".into(),
            description: String::new(),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.om"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email(" a@b.com"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("+96890000000"));
        assert!(is_valid_phone("968 9000 0000"));
        assert!(is_valid_phone("7"));
        assert!(is_valid_phone("+1234567890123456"));
        assert!(!is_valid_phone("+12345678901234567"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("+"));
        assert!(!is_valid_phone("555-1234"));
    }

    #[test]
    fn whitespace_only_is_missing() {
        let err = check_field(RegistrationField::Address, "   \t").unwrap();
        assert_eq!(err.kind, FieldErrorKind::MissingField);
        assert_eq!(err.message, "Address is required");
    }

    #[test]
    fn description_never_fails() {
        assert!(check_field(RegistrationField::Description, "").is_none());
        assert!(check_field(RegistrationField::Description, "   ").is_none());
    }

    #[test]
    fn full_form_valid() {
        let result = validate(&valid_app(), Scope::All);
        assert!(result.is_valid());
        assert!(result.messages().is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let result = validate(&RestaurantApplication::default(), Scope::All);
        assert!(!result.is_valid());
        let fields: Vec<_> = result.errors.keys().copied().collect();
        assert_eq!(
            fields,
            RegistrationField::ALL
                .into_iter()
                .filter(|f| f.is_required())
                .collect::<Vec<_>>()
        );
        assert!(
            result
                .errors
                .values()
                .all(|e| e.kind == FieldErrorKind::MissingField)
        );
    }

    #[test]
    fn step_scope_only_reports_its_fields() {
        let mut app = RestaurantApplication::default();
        app.email = "not-an-email".into();

        let step1 = validate(&app, Scope::Step(WizardStep::BasicInfo));
        assert_eq!(
            step1.errors[&RegistrationField::Email].kind,
            FieldErrorKind::InvalidFormat
        );
        assert!(step1.errors.contains_key(&RegistrationField::RestaurantName));
        assert!(!step1.errors.contains_key(&RegistrationField::Address));

        let step2 = validate(&app, Scope::Step(WizardStep::Details));
        let fields: Vec<_> = step2.errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![RegistrationField::Address, RegistrationField::Cuisine]
        );

        assert!(validate(&app, Scope::Step(WizardStep::Review)).is_valid());
    }

    #[test]
    fn malformed_phone_message() {
        let mut app = valid_app();
        app.phone = "0000".into();
        let result = validate(&app, Scope::All);
        assert_eq!(
            result.messages()[&RegistrationField::Phone],
            "Please enter a valid phone number"
        );
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let mut app = RestaurantApplication::default();
        app.phone = "abc".into();
        let a = validate(&app, Scope::All);
        let b = validate(&app, Scope::All);
        assert_eq!(a, b);
        assert_eq!(
            a.errors.keys().collect::<Vec<_>>(),
            b.errors.keys().collect::<Vec<_>>()
        );
    }
}
