use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_email;

// Formulario de login
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(custom = "validate_email")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Request de login al proveedor de identidad
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

// Response del proveedor de identidad
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub id_token: String,
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// Error del proveedor de identidad: { "error": { "message": "EMAIL_NOT_FOUND" } }
#[derive(Debug, Deserialize)]
pub struct IdentityErrorBody {
    pub error: IdentityErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct IdentityErrorDetail {
    pub message: String,
}

/// Traducir el código del proveedor al mensaje del formulario de login
pub fn sign_in_error_message(code: &str) -> &'static str {
    // El proveedor puede añadir detalle tras el código: "INVALID_PASSWORD : ..."
    let code = code.split(':').next().unwrap_or(code).trim();
    match code {
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "INVALID_EMAIL" => {
            "Invalid credentials. Please try again."
        }
        "EMAIL_NOT_FOUND" => "No user found with this email.",
        "USER_DISABLED" => "This user account has been disabled.",
        _ => "Login failed. Please try again.",
    }
}
