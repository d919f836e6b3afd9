//! Validation Utilities
//!
//! Spanish identity document and phone number format checks, plus the
//! validator-to-AppError conversion used at the handler boundary.

use validator::{ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
            })
        })
        .collect();

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

/// Validate a NIF/NIE national identity document.
///
/// Accepted format: one leading digit or one of K, L, M, X, Y, Z, followed
/// by seven digits and an uppercase control letter (9 characters total).
pub fn validate_national_id_document(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();

    let valid = bytes.len() == 9
        && (bytes[0].is_ascii_digit() || matches!(bytes[0], b'K' | b'L' | b'M' | b'X' | b'Y' | b'Z'))
        && bytes[1..8].iter().all(|b| b.is_ascii_digit())
        && bytes[8].is_ascii_uppercase();

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("national_id_document")
            .with_message("must be a NIF/NIE (e.g. 12345678Z or X1234567L)".into()))
    }
}

/// Validate a CIF business tax identifier.
///
/// Accepted format: one letter among ABCDEFGHJNPQRSTUVW, seven digits and
/// an uppercase control letter (9 characters total).
pub fn validate_cif(value: &str) -> Result<(), ValidationError> {
    const LEADING: &[u8] = b"ABCDEFGHJNPQRSTUVW";
    let bytes = value.as_bytes();

    let valid = bytes.len() == 9
        && LEADING.contains(&bytes[0])
        && bytes[1..8].iter().all(|b| b.is_ascii_digit())
        && bytes[8].is_ascii_uppercase();

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("cif").with_message("must be a CIF (e.g. B1234567X)".into()))
    }
}

/// Validate a nine-digit phone number.
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if value.len() == 9 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_number").with_message("must be 9 digits".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("12345678Z" ; "plain nif")]
    #[test_case("K1234567A" ; "minor nif")]
    #[test_case("X1234567L" ; "nie with x")]
    #[test_case("Z7654321B" ; "nie with z")]
    fn test_national_id_document_accepts_valid(value: &str) {
        assert!(validate_national_id_document(value).is_ok());
    }

    #[test_case("1234567Z" ; "too short")]
    #[test_case("123456789Z" ; "too long")]
    #[test_case("A1234567Z" ; "invalid leading letter")]
    #[test_case("12345678z" ; "lowercase control letter")]
    #[test_case("1234X678Z" ; "letter in digit block")]
    #[test_case("" ; "empty")]
    fn test_national_id_document_rejects_invalid(value: &str) {
        assert!(validate_national_id_document(value).is_err());
    }

    #[test_case("B1234567X" ; "company")]
    #[test_case("W7654321A" ; "foreign branch")]
    fn test_cif_accepts_valid(value: &str) {
        assert!(validate_cif(value).is_ok());
    }

    #[test_case("I1234567X" ; "excluded leading letter")]
    #[test_case("B123456X" ; "too short")]
    #[test_case("11234567X" ; "digit leading")]
    fn test_cif_rejects_invalid(value: &str) {
        assert!(validate_cif(value).is_err());
    }

    #[test]
    fn test_phone_number() {
        assert!(validate_phone_number("612345678").is_ok());
        assert!(validate_phone_number("61234567").is_err());
        assert!(validate_phone_number("6123456789").is_err());
        assert!(validate_phone_number("61234567a").is_err());
    }
}
