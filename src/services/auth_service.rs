//! Servicio de autenticación
//!
//! Login contra el proveedor de identidad + verificación de rol en el API,
//! restauración de la sesión guardada al arrancar y logout.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::cache::SessionHandle;
use crate::clients::IdentityProvider;
use crate::dto::auth_dto::LoginForm;
use crate::models::{AdminProfile, AdminRole};
use crate::services::admin_api::AdminApi;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{is_token_expired, read_claims};

pub const NOT_AN_ADMIN: &str = "Enter a valid Admin Credentials";

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    admin: Arc<dyn AdminApi>,
    session: Arc<SessionHandle>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        admin: Arc<dyn AdminApi>,
        session: Arc<SessionHandle>,
    ) -> Self {
        Self {
            identity,
            admin,
            session,
        }
    }

    /// Iniciar sesión. Solo se guarda la sesión si la cuenta tiene rol admin.
    pub async fn login(&self, form: &LoginForm) -> AppResult<AdminProfile> {
        form.validate()?;
        let email = form.email.trim();

        let signed_in = self.identity.sign_in(email, &form.password).await?;
        let account = self.admin.fetch_account(&signed_in.id_token).await?;

        if !account.is_admin() {
            warn!("🚫 {} no tiene rol de administrador", email);
            return Err(AppError::Authentication(NOT_AN_ADMIN.to_string()));
        }

        let profile = AdminProfile {
            token: signed_in.id_token,
            id: signed_in.local_id,
            name: signed_in
                .display_name
                .or(account.name)
                .unwrap_or_default(),
            email: signed_in
                .email
                .or(account.email)
                .unwrap_or_else(|| email.to_string()),
            role: AdminRole::Admin,
            created_at: signed_in.created_at,
            photo: signed_in.photo_url,
        };

        self.session.establish(profile.clone()).await?;
        Ok(profile)
    }

    /// Comprobar si existe una sesión guardada y sigue vigente
    pub async fn restore(&self) -> AppResult<Option<AdminProfile>> {
        self.restore_at(Utc::now().timestamp()).await
    }

    pub async fn restore_at(&self, now: i64) -> AppResult<Option<AdminProfile>> {
        let profile = match self.session.current().await? {
            Some(profile) => profile,
            None => return Ok(None),
        };

        let valid = match read_claims(&profile.token) {
            Ok(claims) => !is_token_expired(&claims, now),
            Err(e) => {
                warn!("⚠️ Sesión guardada con token ilegible: {}", e);
                false
            }
        };

        if !valid {
            info!("⌛ La sesión guardada ha caducado");
            self.session.end().await?;
            return Ok(None);
        }

        self.session.mark_restored(profile.clone());
        Ok(Some(profile))
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.session.end().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemorySessionStore, SessionState};
    use crate::dto::auth_dto::SignInResponse;
    use crate::models::AdminAccount;
    use async_trait::async_trait;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeIdentity {
        token: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_in(&self, _email: &str, password: &str) -> AppResult<SignInResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password != "secret" {
                return Err(AppError::Authentication(
                    "Invalid credentials. Please try again.".to_string(),
                ));
            }
            Ok(SignInResponse {
                id_token: self.token.clone(),
                local_id: "uid-1".to_string(),
                email: Some("admin@charged.ca".to_string()),
                display_name: Some("Admin".to_string()),
                photo_url: None,
                created_at: None,
            })
        }
    }

    struct FakeAdmin {
        user_type: &'static str,
    }

    #[async_trait]
    impl AdminApi for FakeAdmin {
        async fn fetch_account(&self, _token: &str) -> AppResult<AdminAccount> {
            Ok(AdminAccount {
                user_type: self.user_type.to_string(),
                name: None,
                email: None,
            })
        }
    }

    fn token(exp: i64) -> String {
        let claims = crate::utils::jwt::IdentityClaims {
            sub: "uid-1".to_string(),
            exp,
            iat: None,
            email: None,
            name: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test")).unwrap()
    }

    fn service(
        user_type: &'static str,
        exp: i64,
    ) -> (AuthService, Arc<SessionHandle>, Arc<FakeIdentity>) {
        let session = Arc::new(SessionHandle::new(Arc::new(MemorySessionStore::new())));
        let identity = Arc::new(FakeIdentity {
            token: token(exp),
            calls: AtomicUsize::new(0),
        });
        let service = AuthService::new(
            identity.clone(),
            Arc::new(FakeAdmin { user_type }),
            session.clone(),
        );
        (service, session, identity)
    }

    fn form(password: &str) -> LoginForm {
        LoginForm {
            email: "admin@charged.ca".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_admin() {
        let (service, session, _) = service("admin", 4_000_000_000);
        let profile = service.login(&form("secret")).await.unwrap();

        assert_eq!(profile.name, "Admin");
        assert_eq!(session.current().await.unwrap(), Some(profile.clone()));
        assert_eq!(session.state(), SessionState::Authenticated(profile));
    }

    #[tokio::test]
    async fn test_non_admin_is_rejected() {
        let (service, session, _) = service("rider", 4_000_000_000);
        let err = service.login(&form("secret")).await.unwrap_err();

        assert_eq!(err.user_message(), NOT_AN_ADMIN);
        assert_eq!(session.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_password_skips_provider() {
        let (service, _, identity) = service("admin", 4_000_000_000);
        assert!(service.login(&form("")).await.is_err());
        assert_eq!(identity.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restore_discards_expired_token() {
        let (service, session, _) = service("admin", 1_000);
        service.login(&form("secret")).await.unwrap();

        assert_eq!(service.restore_at(2_000).await.unwrap(), None);
        assert_eq!(session.current().await.unwrap(), None);
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_restore_keeps_valid_token() {
        let (service, _, _) = service("admin", 5_000);
        let profile = service.login(&form("secret")).await.unwrap();
        assert_eq!(service.restore_at(2_000).await.unwrap(), Some(profile));

        service.logout().await.unwrap();
        assert_eq!(service.restore_at(2_000).await.unwrap(), None);
    }
}
