//! Cliente del proveedor de identidad
//!
//! Inicio de sesión email/contraseña contra el endpoint REST
//! `accounts:signInWithPassword`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{sign_in_error_message, IdentityErrorBody, SignInRequest, SignInResponse};
use crate::utils::errors::{AppError, AppResult};

/// Proveedor de identidad externo
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInResponse>;
}

pub struct IdentityClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl IdentityClient {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.identity_base_url.trim_end_matches('/').to_string(),
            api_key: config.identity_api_key.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("IDENTITY_API_KEY must be set to log in".to_string()))?;
        let url = format!("{}/accounts:signInWithPassword", self.base_url);
        let request = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let body: SignInResponse = response.json().await?;
            info!("🔑 Credenciales aceptadas por el proveedor de identidad");
            return Ok(body);
        }

        let status = response.status();
        let code = response
            .json::<IdentityErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_default();
        warn!("🔑 Inicio de sesión rechazado ({}): {}", status.as_u16(), code);

        Err(AppError::Authentication(sign_in_error_message(&code).to_string()))
    }
}
