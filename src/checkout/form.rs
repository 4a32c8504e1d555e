//! Checkout form fields and the required-field guard

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field of the checkout or chat contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Phone,
    Email,
    Address,
}

impl FormField {
    /// Parse a field name as typed in the REPL
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "phone" | "mobile" => Ok(Self::Phone),
            "email" | "mail" => Ok(Self::Email),
            "address" | "addr" => Ok(Self::Address),
            other => Err(format!("Unknown form field: {}", other)),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Phone => write!(f, "phone"),
            Self::Email => write!(f, "email"),
            Self::Address => write!(f, "address"),
        }
    }
}

/// Customer contact details collected at checkout
///
/// Name, phone and address are required; email is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl CheckoutForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Phone => self.phone = value,
            FormField::Email => self.email = value,
            FormField::Address => self.address = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Email => &self.email,
            FormField::Address => &self.address,
        }
    }

    /// First required field that is blank, if any
    pub fn missing_field(&self) -> Option<FormField> {
        [FormField::Name, FormField::Phone, FormField::Address]
            .into_iter()
            .find(|field| self.get(*field).trim().is_empty())
    }

    /// Email as it appears in the order message
    pub fn email_or_na(&self) -> &str {
        if self.email.trim().is_empty() {
            "N/A"
        } else {
            &self.email
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            name: "Asha".into(),
            phone: "9876543210".into(),
            email: String::new(),
            address: "Hyderabad".into(),
        }
    }

    #[test]
    fn test_missing_field_none_when_required_present() {
        assert_eq!(filled().missing_field(), None);
    }

    #[test]
    fn test_missing_field_reports_first_blank() {
        let mut form = filled();
        form.phone = "   ".into();
        form.address.clear();
        assert_eq!(form.missing_field(), Some(FormField::Phone));
    }

    #[test]
    fn test_email_is_optional() {
        let form = filled();
        assert_eq!(form.email_or_na(), "N/A");

        let mut form = filled();
        form.set(FormField::Email, "asha@example.com");
        assert_eq!(form.email_or_na(), "asha@example.com");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = filled();
        form.reset();
        assert_eq!(form, CheckoutForm::default());
    }

    #[test]
    fn test_parse_field_aliases() {
        assert_eq!(FormField::parse_str("Mobile").unwrap(), FormField::Phone);
        assert_eq!(FormField::parse_str("addr").unwrap(), FormField::Address);
        assert!(FormField::parse_str("zip").is_err());
    }
}
