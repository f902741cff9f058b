//! Field format validation.

use std::sync::LazyLock;

use regex::Regex;

use taller_core::{DomainError, DomainResult};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

// Spanish NIF (8 digits + letter) or CIF (letter + 8 digits), uppercase.
static DOCUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]\d{8}|\d{8}[A-Z])$").expect("document regex"));

// Spanish 9-digit phone, leading 6/7/8/9.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6789]\d{8}$").expect("phone regex"));

/// Trim and lowercase an email before storing or comparing it.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn require_email(email: &str) -> DomainResult<String> {
    let email = normalize_email(email);
    if EMAIL_RE.is_match(&email) {
        Ok(email)
    } else {
        Err(DomainError::invalid_input("invalid email address"))
    }
}

pub fn require_company_document(document: &str) -> DomainResult<String> {
    let document = document.trim().to_uppercase();
    if DOCUMENT_RE.is_match(&document) {
        Ok(document)
    } else {
        Err(DomainError::invalid_input("document must be a valid NIF or CIF"))
    }
}

pub fn require_phone(phone: &str) -> DomainResult<String> {
    let phone = phone.trim().to_string();
    if PHONE_RE.is_match(&phone) {
        Ok(phone)
    } else {
        Err(DomainError::invalid_input("phone must be a valid 9-digit number"))
    }
}

pub fn require_non_empty(field: &'static str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(DomainError::invalid_input(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_and_format() {
        assert_eq!(require_email("  Ana@Taller.ES ").unwrap(), "ana@taller.es");
        assert!(require_email("no-at-sign").is_err());
        assert!(require_email("a @b.c").is_err());
    }

    #[test]
    fn nif_and_cif_shapes() {
        assert_eq!(require_company_document("b12345678").unwrap(), "B12345678");
        assert_eq!(require_company_document("12345678Z").unwrap(), "12345678Z");
        assert!(require_company_document("123").is_err());
        assert!(require_company_document("BB1234567").is_err());
    }

    #[test]
    fn spanish_phone_shapes() {
        assert!(require_phone("612345678").is_ok());
        assert!(require_phone("912345678").is_ok());
        assert!(require_phone("512345678").is_err());
        assert!(require_phone("61234567").is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(require_non_empty("name", "   ").is_err());
        assert_eq!(require_non_empty("name", " Ana ").unwrap(), "Ana");
    }
}
