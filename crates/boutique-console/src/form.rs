use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::model::{Admin, BoutiqueUser, Franchise, Product};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Strips everything but digits; what the backend stores for phone numbers.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trimmed, lower-cased; what the backend stores for emails.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw.trim())
}

/// A phone is valid when exactly 10 digits remain after stripping
/// whitespace and punctuation.
pub fn is_valid_phone(raw: &str) -> bool {
    normalize_phone(raw).len() == 10
}

fn flag_str(active: bool) -> String {
    if active { "1" } else { "0" }.to_string()
}

/// Accumulated `(field, message)` validation errors. Submission is blocked
/// client-side while this is non-empty; nothing reaches the network.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, String)> {
        self.entries.iter()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "no errors");
        }
        let joined: Vec<String> = self
            .entries
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, "is required");
        false
    } else {
        true
    }
}

fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if require(errors, field, value) && !is_valid_email(value) {
        errors.push(field, "is not a valid email address");
    }
}

fn check_phone(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if require(errors, field, value) && !is_valid_phone(value) {
        errors.push(field, "must contain exactly 10 digits");
    }
}

fn check_positive(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if !require(errors, field, value) {
        return;
    }
    match value.trim().replace(',', ".").parse::<f64>() {
        Ok(amount) if amount > 0.0 => {}
        Ok(_) => errors.push(field, "must be greater than zero"),
        Err(_) => errors.push(field, "is not a number"),
    }
}

fn decimal_str(value: &str) -> String {
    value.trim().replace(',', ".")
}

/// Editable franchise fields, decoupled from the wire representation.
#[derive(Debug, Default, Clone)]
pub struct FranchiseForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub commune_id: String,
    pub active: bool,
}

/// Exactly the shape the backend expects on create/update.
#[derive(Debug, Serialize, PartialEq)]
pub struct FranchisePayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub commune_id: String,
    pub active: String,
}

impl FranchiseForm {
    pub fn from_remote(franchise: &Franchise) -> Self {
        let commune_id = franchise
            .commune_id
            .clone()
            .or_else(|| franchise.commune.as_ref().map(|c| c.id.clone()))
            .unwrap_or_default();
        Self {
            name: franchise.name.clone(),
            email: franchise.email.clone().unwrap_or_default(),
            phone: franchise.phone.clone().unwrap_or_default(),
            address: franchise.address.clone().unwrap_or_default(),
            commune_id,
            active: franchise.active.unwrap_or(true),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "name", &self.name);
        check_email(&mut errors, "email", &self.email);
        check_phone(&mut errors, "phone", &self.phone);
        require(&mut errors, "address", &self.address);
        require(&mut errors, "commune", &self.commune_id);
        errors
    }

    pub fn to_payload(&self) -> FranchisePayload {
        FranchisePayload {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: normalize_phone(&self.phone),
            address: self.address.trim().to_string(),
            commune_id: self.commune_id.trim().to_string(),
            active: flag_str(self.active),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct AdminForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub active: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AdminPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub active: String,
}

impl AdminForm {
    pub fn from_remote(admin: &Admin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone().unwrap_or_default(),
            phone: admin.phone.clone().unwrap_or_default(),
            active: admin.active.unwrap_or(true),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "name", &self.name);
        check_email(&mut errors, "email", &self.email);
        check_phone(&mut errors, "phone", &self.phone);
        errors
    }

    pub fn to_payload(&self) -> AdminPayload {
        AdminPayload {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: normalize_phone(&self.phone),
            active: flag_str(self.active),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct BoutiqueUserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub boutique_id: String,
    pub active: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BoutiqueUserPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub boutique_id: String,
    pub active: String,
}

impl BoutiqueUserForm {
    pub fn from_remote(user: &BoutiqueUser) -> Self {
        let boutique_id = user
            .boutique_id
            .clone()
            .or_else(|| user.boutique.as_ref().map(|b| b.id.clone()))
            .unwrap_or_default();
        Self {
            name: user.name.clone(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            boutique_id,
            active: user.active.unwrap_or(true),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "name", &self.name);
        check_email(&mut errors, "email", &self.email);
        check_phone(&mut errors, "phone", &self.phone);
        require(&mut errors, "boutique", &self.boutique_id);
        errors
    }

    pub fn to_payload(&self) -> BoutiqueUserPayload {
        BoutiqueUserPayload {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: normalize_phone(&self.phone),
            boutique_id: self.boutique_id.trim().to_string(),
            active: flag_str(self.active),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub weight: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProductPayload {
    pub name: String,
    pub price: String,
    pub weight: String,
    pub description: String,
    pub active: String,
}

impl ProductForm {
    pub fn from_remote(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.map(|p| p.to_string()).unwrap_or_default(),
            weight: product.weight.map(|w| w.to_string()).unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            active: product.active.unwrap_or(true),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        require(&mut errors, "name", &self.name);
        check_positive(&mut errors, "price", &self.price);
        check_positive(&mut errors, "weight", &self.weight);
        errors
    }

    pub fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            name: self.name.trim().to_string(),
            price: decimal_str(&self.price),
            weight: decimal_str(&self.weight),
            description: self.description.trim().to_string(),
            active: flag_str(self.active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commune;

    fn valid_franchise_form() -> FranchiseForm {
        FranchiseForm {
            name: "Atelier Nord".to_string(),
            email: "Contact@Atelier-Nord.FR".to_string(),
            phone: "06 12 34 56 78".to_string(),
            address: "12 rue des Arts".to_string(),
            commune_id: "59".to_string(),
            active: true,
        }
    }

    #[test]
    fn phone_accepts_exactly_ten_digits_after_stripping() {
        assert!(is_valid_phone("0612345678"));
        assert!(is_valid_phone("06 12 34 56 78"));
        assert!(is_valid_phone("06-12-34-56-78"));
        assert!(!is_valid_phone("061234567"));
        assert!(!is_valid_phone("06123456789"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("  Admin@Example.COM  "));
        assert!(!is_valid_email("admin@example"));
        assert!(!is_valid_email("admin example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn blank_required_fields_accumulate_one_error_each() {
        let errors = FranchiseForm::default().validate();
        assert_eq!(errors.len(), 5);
        for field in ["name", "email", "phone", "address", "commune"] {
            assert_eq!(errors.for_field(field), Some("is required"), "{}", field);
        }
    }

    #[test]
    fn malformed_fields_block_submission() {
        let mut form = valid_franchise_form();
        form.phone = "061234567".to_string();
        form.email = "not-an-email".to_string();
        let errors = form.validate();
        assert_eq!(
            errors.for_field("phone"),
            Some("must contain exactly 10 digits")
        );
        assert_eq!(
            errors.for_field("email"),
            Some("is not a valid email address")
        );
    }

    #[test]
    fn payload_uses_backend_representations() {
        let payload = valid_franchise_form().to_payload();
        assert_eq!(payload.email, "contact@atelier-nord.fr");
        assert_eq!(payload.phone, "0612345678");
        assert_eq!(payload.active, "1");

        let mut form = valid_franchise_form();
        form.active = false;
        assert_eq!(form.to_payload().active, "0");
    }

    #[test]
    fn franchise_form_resolves_nested_commune() {
        let franchise = Franchise {
            id: "1".to_string(),
            name: "Atelier Nord".to_string(),
            email: None,
            phone: None,
            address: None,
            active: None,
            commune_id: None,
            commune: Some(Commune {
                id: "59".to_string(),
                name: "Lille".to_string(),
            }),
        };
        let form = FranchiseForm::from_remote(&franchise);
        assert_eq!(form.commune_id, "59");
        // Missing flags edit as active.
        assert!(form.active);
    }

    #[test]
    fn product_amounts_must_be_positive_numbers() {
        let mut form = ProductForm {
            name: "Tote bag".to_string(),
            price: "19,90".to_string(),
            weight: "0.4".to_string(),
            description: String::new(),
            active: true,
        };
        assert!(form.validate().is_empty());
        assert_eq!(form.to_payload().price, "19.90");

        form.price = "0".to_string();
        assert_eq!(
            form.validate().for_field("price"),
            Some("must be greater than zero")
        );
        form.price = "free".to_string();
        assert_eq!(form.validate().for_field("price"), Some("is not a number"));
    }
}
