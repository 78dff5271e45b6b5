//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración de la consola: URL del API de
//! administración, proveedor de identidad y almacenamiento de la sesión.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::errors::AppError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_SESSION_FILE: &str = ".ride_admin_session.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub identity_api_key: Option<String>,
    pub identity_base_url: String,
    pub session_file: PathBuf,
    pub default_page_size: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            identity_api_key: None,
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar la configuración desde una función de búsqueda (útil en tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("ADMIN_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = match lookup("ADMIN_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!(
                        "ADMIN_API_TIMEOUT_SECS must be a number, got '{}'",
                        raw
                    ))
                })?;
                if secs == 0 {
                    return Err(AppError::Config(
                        "ADMIN_API_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let default_page_size = match lookup("DEFAULT_PAGE_SIZE") {
            Some(raw) => {
                let size: usize = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("DEFAULT_PAGE_SIZE must be a number, got '{}'", raw))
                })?;
                if size == 0 {
                    return Err(AppError::Config(
                        "DEFAULT_PAGE_SIZE must be greater than zero".to_string(),
                    ));
                }
                size
            }
            None => defaults.default_page_size,
        };

        Ok(Self {
            api_base_url,
            request_timeout,
            identity_api_key: lookup("IDENTITY_API_KEY").filter(|key| !key.trim().is_empty()),
            identity_base_url: lookup("IDENTITY_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.identity_base_url),
            session_file: lookup("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            default_page_size,
        })
    }

    /// Clave del proveedor de identidad, obligatoria solo para login
    pub fn require_identity_key(&self) -> Result<&str, AppError> {
        self.identity_api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("IDENTITY_API_KEY must be set to log in".to_string()))
    }
}
