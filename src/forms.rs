//! Player-entered text: the print-request lead form and the email stub
//!
//! Nothing here talks to a network. A valid submission only produces a
//! local acknowledgment.

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Physical print request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

/// Accepted request, trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

pub const PRINT_ACKNOWLEDGMENT: &str = "The manufacturing partner will contact you in 3-5 business days.";

fn optional(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl LeadForm {
    /// Only name and email are required
    pub fn submit(&self) -> Result<PrintRequest, FormError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        Ok(PrintRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: optional(&self.phone),
            notes: optional(&self.notes),
        })
    }
}

/// Address check for the "email this file" stub
pub fn validate_email(input: &str) -> Result<String, FormError> {
    let email = input.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(FormError::InvalidEmail);
    }
    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> LeadForm {
        LeadForm {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_name_and_email() {
        assert_eq!(form("", "a@b.c").submit(), Err(FormError::MissingName));
        assert_eq!(form("Ada", "").submit(), Err(FormError::MissingEmail));
        assert_eq!(form("   ", "a@b.c").submit(), Err(FormError::MissingName));
    }

    #[test]
    fn test_lead_form_does_not_check_email_shape() {
        let req = form(" Ada ", "ada").submit().unwrap();
        assert_eq!(req.name, "Ada");
        assert_eq!(req.email, "ada");
        assert_eq!(req.phone, None);
    }

    #[test]
    fn test_optional_fields_are_kept() {
        let mut f = form("Ada", "ada@example.com");
        f.phone = "555-0100".into();
        f.notes = "  PLA, 5cm ".into();
        let req = f.submit().unwrap();
        assert_eq!(req.phone.as_deref(), Some("555-0100"));
        assert_eq!(req.notes.as_deref(), Some("PLA, 5cm"));
    }

    #[test]
    fn test_email_stub_validation() {
        assert_eq!(validate_email(""), Err(FormError::InvalidEmail));
        assert_eq!(validate_email("nobody"), Err(FormError::InvalidEmail));
        assert_eq!(validate_email(" me@example.com "), Ok("me@example.com".to_string()));
    }
}
