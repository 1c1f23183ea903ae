//! Restaurant application form data.

use serde::{Deserialize, Serialize};

/// One of the seven registration form fields.
///
/// Ordering follows the form layout, so maps keyed by field iterate in the
/// order the fields are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationField {
    RestaurantName,
    OwnerName,
    Email,
    Phone,
    Address,
    Cuisine,
    Description,
}

impl RegistrationField {
    /// All fields in form order.
    pub const ALL: [RegistrationField; 7] = [
        Self::RestaurantName,
        Self::OwnerName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::Cuisine,
        Self::Description,
    ];

    /// The camelCase key used in error maps and the persisted draft.
    pub fn key(&self) -> &'static str {
        match self {
            Self::RestaurantName => "restaurantName",
            Self::OwnerName => "ownerName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Cuisine => "cuisine",
            Self::Description => "description",
        }
    }

    /// Human-readable label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestaurantName => "Restaurant Name",
            Self::OwnerName => "Owner/Manager Name",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Address => "Restaurant Address",
            Self::Cuisine => "Cuisine Type",
            Self::Description => "Restaurant Description",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Description)
    }

    /// Parse a field from its key. Accepts the camelCase key or snake_case.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.key().to_ascii_lowercase() == normalized)
    }
}

impl std::fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The registration form state.
///
/// All seven members are always present; edits overwrite, never remove.
/// Missing members in a stored draft deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantApplication {
    pub restaurant_name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cuisine: String,
    pub description: String,
}

impl RestaurantApplication {
    /// Current value of `field`.
    pub fn get(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::RestaurantName => &self.restaurant_name,
            RegistrationField::OwnerName => &self.owner_name,
            RegistrationField::Email => &self.email,
            RegistrationField::Phone => &self.phone,
            RegistrationField::Address => &self.address,
            RegistrationField::Cuisine => &self.cuisine,
            RegistrationField::Description => &self.description,
        }
    }

    /// Overwrite `field` with `value`.
    pub fn set(&mut self, field: RegistrationField, value: impl Into<String>) {
        let slot = match field {
            RegistrationField::RestaurantName => &mut self.restaurant_name,
            RegistrationField::OwnerName => &mut self.owner_name,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Phone => &mut self.phone,
            RegistrationField::Address => &mut self.address,
            RegistrationField::Cuisine => &mut self.cuisine,
            RegistrationField::Description => &mut self.description,
        };
        *slot = value.into();
    }

    /// Whether every field is empty (a fresh form).
    pub fn is_blank(&self) -> bool {
        RegistrationField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// Read-only summary rendered on the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub sections: Vec<(&'static str, Vec<String>)>,
}

impl ReviewSummary {
    pub fn from_application(app: &RestaurantApplication) -> Self {
        Self {
            sections: vec![
                ("Restaurant Name", vec![app.restaurant_name.clone()]),
                ("Owner", vec![app.owner_name.clone()]),
                ("Contact", vec![app.email.clone(), app.phone.clone()]),
                ("Address", vec![app.address.clone()]),
                ("Cuisine", vec![app.cuisine.clone()]),
            ],
        }
    }
}

impl std::fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (title, lines) in &self.sections {
            writeln!(f, "{title}:")?;
            for line in lines {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_all_fields_empty() {
        let app = RestaurantApplication::default();
        assert!(app.is_blank());
        let json = serde_json::to_value(&app).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        for field in RegistrationField::ALL {
            assert_eq!(obj[field.key()], "", "{field} should serialize as empty string");
        }
    }

    #[test]
    fn set_and_get_every_field() {
        let mut app = RestaurantApplication::default();
        for (i, field) in RegistrationField::ALL.into_iter().enumerate() {
            app.set(field, format!("value-{i}"));
        }
        for (i, field) in RegistrationField::ALL.into_iter().enumerate() {
            assert_eq!(app.get(field), format!("value-{i}"));
        }
        assert!(!app.is_blank());
    }

    #[test]
    fn partial_draft_fills_missing_with_empty() {
        let app: RestaurantApplication =
            serde_json::from_str(r#"{"restaurantName":"Bella","email":"a@b.com"}"#).unwrap();
        assert_eq!(app.restaurant_name, "Bella");
        assert_eq!(app.email, "a@b.com");
        assert_eq!(app.owner_name, "");
        assert_eq!(app.description, "");
    }

    #[test]
    fn non_string_member_is_rejected() {
        let parsed = serde_json::from_str::<RestaurantApplication>(r#"{"phone": 968}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn field_keys_match_serde_names() {
        for field in RegistrationField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn field_from_key_accepts_both_cases() {
        assert_eq!(
            RegistrationField::from_key("restaurantName"),
            Some(RegistrationField::RestaurantName)
        );
        assert_eq!(
            RegistrationField::from_key("owner_name"),
            Some(RegistrationField::OwnerName)
        );
        assert_eq!(RegistrationField::from_key("EMAIL"), Some(RegistrationField::Email));
        assert_eq!(RegistrationField::from_key("website"), None);
    }

    #[test]
    fn only_description_is_optional() {
        let optional: Vec<_> = RegistrationField::ALL
            .into_iter()
            .filter(|f| !f.is_required())
            .collect();
        assert_eq!(optional, vec![RegistrationField::Description]);
    }

    #[test]
    fn review_summary_lists_contact_lines() {
        let app = RestaurantApplication {
            restaurant_name: "Bella".into(),
            owner_name: "Ana".into(),
            email: "a@b.com".into(),
            phone: "+96890000000".into(),
            address: "Muscat".into(),
            cuisine: "Italian".into(),
            description: String::new(),
        };
        let summary = ReviewSummary::from_application(&app);
        let rendered = summary.to_string();
        assert!(rendered.contains("Contact:\n  a@b.com\n  +96890000000\n"));
        assert!(rendered.contains("Cuisine:\n  Italian"));
        assert_eq!(summary.sections.len(), 5);
    }
}
