//! Utilidades de validación
//!
//! Funciones helper usadas por los formularios (`#[validate(custom = ...)]`)
//! antes de enviar cualquier petición al API.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Identificador de tipo de documento: minúsculas, dígitos y guiones bajos
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(with_message("not_blank", "All fields are required"));
    }
    Ok(())
}

/// Validar campos obligatorios del catálogo de documentos
pub fn validate_required_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(with_message("required", "Please fill all required fields"));
    }
    Ok(())
}

/// Validar el nombre interno de un tipo de documento
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    validate_required_field(value)?;
    if !IDENTIFIER_RE.is_match(value.trim()) {
        let mut error = with_message(
            "identifier",
            "Name must be lowercase letters, digits or underscores",
        );
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de email (básico)
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    match value.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(()),
        _ => {
            let mut error = with_message("email", "Enter a valid email address");
            error.add_param("value".into(), &value.to_string());
            Err(error)
        }
    }
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = with_message("non_negative", "Value cannot be negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar importes monetarios (usado en las reglas de precio)
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Validar un porcentaje entre 0 y 100
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut error = with_message("percentage", "Percentage must be between 0 and 100");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Validar distancias y duraciones del calculador de tarifas
pub fn validate_measure(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(with_message(
            "measure",
            "Distance and duration cannot be negative",
        ));
    }
    Ok(())
}
