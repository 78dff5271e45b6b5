//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores de la consola y su
//! traducción a mensajes visibles para el administrador.

use std::borrow::Cow;

use thiserror::Error;

/// Códigos de error del proveedor de identidad que indican un token caducado
pub const AUTH_EXPIRED_CODES: &[&str] = &["auth/id-token-expired", "auth/argument-error"];

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote API error ({status}): {message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

/// Categorías de error tal como las ve el administrador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Validation,
    Remote,
    Unknown,
}

impl AppError {
    /// Clasificar el error en una de las cuatro categorías visibles
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Authentication(_) | AppError::SessionExpired(_) => ErrorKind::Authentication,
            AppError::Validation(_) | AppError::InvalidInput(_) => ErrorKind::Validation,
            AppError::Remote { .. }
            | AppError::MalformedResponse(_)
            | AppError::Timeout(_)
            | AppError::Http(_) => ErrorKind::Remote,
            AppError::Session(_) | AppError::Config(_) | AppError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// El error obliga a cerrar la sesión local
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired(_))
    }

    /// Mensaje que se muestra en la notificación o junto al formulario
    pub fn user_message(&self) -> String {
        match self {
            AppError::Authentication(msg) => msg.clone(),
            AppError::SessionExpired(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            AppError::Validation(errors) => first_validation_message(errors),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Remote { message, .. } => message.clone(),
            AppError::MalformedResponse(_) => "Unexpected response from the server.".to_string(),
            AppError::Timeout(_) => {
                "The server did not respond in time. Please try again.".to_string()
            }
            AppError::Http(_) => "Could not reach the server. Please try again.".to_string(),
            AppError::Session(_) | AppError::Config(_) => self.to_string(),
            AppError::Unknown(_) => "An unknown error occurred.".to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else {
            AppError::Http(err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Primer mensaje legible de un conjunto de errores de validación.
/// Los campos se recorren en orden alfabético para que el mensaje sea estable.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().copied().collect();
    fields.sort_unstable();

    for field in fields {
        if let Some(error) = field_errors.get(field).and_then(|list| list.first()) {
            return match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            };
        }
    }

    "The provided data is invalid".to_string()
}

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(Cow::Borrowed(message));
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de entrada inválida
pub fn invalid_input(message: &str) -> AppError {
    AppError::InvalidInput(message.to_string())
}

/// Función helper para crear errores de respuesta mal formada
pub fn malformed(message: &str) -> AppError {
    AppError::MalformedResponse(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = validation_error("title", "All fields are required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "All fields are required");
    }

    #[test]
    fn test_remote_error_keeps_server_message() {
        let err = AppError::Remote {
            status: 500,
            code: None,
            message: "Driver not found".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.user_message(), "Driver not found");
    }

    #[test]
    fn test_unknown_error_uses_fallback() {
        let err = AppError::Unknown("boom".to_string());
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.user_message(), "An unknown error occurred.");
    }

    #[test]
    fn test_session_expired() {
        let err = AppError::SessionExpired("auth/id-token-expired".to_string());
        assert!(err.is_session_expired());
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }
}
