//! Cliente HTTP del API de administración
//!
//! Todas las peticiones llevan el token bearer de la sesión guardada. Las
//! respuestas se esperan como `{ "data": ... }`; cualquier otra forma se
//! trata como respuesta mal formada. Un error de token caducado cierra la
//! sesión local y publica `SessionState::LoggedOut`. No hay reintentos.

use std::borrow::Cow;
use std::sync::Arc;

use http::{Method, StatusCode};
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::cache::SessionHandle;
use crate::config::EnvironmentConfig;
use crate::dto::envelope::{ApiEnvelope, ApiErrorBody};
use crate::utils::errors::{AppError, AppResult, AUTH_EXPIRED_CODES};

const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Cliente del API REST de administración
#[derive(Clone)]
pub struct AdminApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionHandle>,
}

impl AdminApiClient {
    pub fn new(config: &EnvironmentConfig, session: Arc<SessionHandle>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Codificar un segmento de ruta (ids)
    pub fn segment(value: &str) -> Cow<'_, str> {
        urlencoding::encode(value)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(self.request(Method::GET, path), None).await
    }

    /// GET con un token explícito (verificación de rol durante el login,
    /// antes de que exista una sesión guardada)
    pub async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> AppResult<T> {
        self.execute(self.request(Method::GET, path), Some(token)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body), None).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body), None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(self.request(Method::DELETE, path), None).await
    }

    /// DELETE cuyo cuerpo de respuesta no interesa (solo el código de estado)
    pub async fn delete_ignoring_body(&self, path: &str) -> AppResult<()> {
        let _: Value = self.execute_raw(self.request(Method::DELETE, path), None).await?;
        Ok(())
    }

    /// POST cuyo cuerpo de respuesta no interesa (solo el código de estado)
    pub async fn post_ignoring_body<B>(&self, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        let _: Value = self
            .execute_raw(self.request(Method::POST, path).json(body), None)
            .await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> AppResult<T> {
        let body = self.execute_raw(request, token).await?;
        let envelope: ApiEnvelope = serde_json::from_value(body)?;
        let data = envelope.into_data()?;
        serde_json::from_value(data).map_err(AppError::from)
    }

    /// Enviar la petición y devolver el cuerpo JSON de una respuesta 2xx
    async fn execute_raw(&self, request: RequestBuilder, token: Option<&str>) -> AppResult<Value> {
        // interceptor: token bearer de la sesión
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => match self.session.token().await {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
        };

        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!("➡️ {} {}", method, url.path());

        let response = self.http.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("⬅️ {} {} -> {}", method, url.path(), status.as_u16());

        if !status.is_success() {
            return Err(self.remote_error(status, &bytes, token.is_some()).await);
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(AppError::from)
    }

    /// Traducir una respuesta no-2xx. Con el token de la sesión, un token
    /// caducado cierra la sesión; con un token explícito (login) es un fallo
    /// de autenticación y la sesión guardada no se toca.
    async fn remote_error(
        &self,
        status: StatusCode,
        bytes: &[u8],
        explicit_token: bool,
    ) -> AppError {
        let body: ApiErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
        let code = body.code().map(str::to_string);

        let expired = status == StatusCode::UNAUTHORIZED
            || code
                .as_deref()
                .map(|c| AUTH_EXPIRED_CODES.contains(&c))
                .unwrap_or(false);

        if expired && explicit_token {
            warn!("🔑 Token recién emitido rechazado por el API ({})", status.as_u16());
            return AppError::Authentication(LOGIN_FAILED.to_string());
        }

        if expired {
            warn!("🔒 Token caducado o inválido, cerrando la sesión");
            if let Err(e) = self.session.end().await {
                error!("❌ No se pudo limpiar la sesión: {}", e);
            }
            return AppError::SessionExpired(
                code.unwrap_or_else(|| status.as_u16().to_string()),
            );
        }

        let message = body
            .message()
            .map(str::to_string)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        AppError::Remote {
            status: status.as_u16(),
            code,
            message,
        }
    }
}
