//! Almacenamiento de la sesión del administrador
//!
//! El perfil autenticado (con su token) es el único estado que sobrevive a un
//! reinicio. Se guarda bajo una clave fija, en un fichero JSON o en memoria.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::models::AdminProfile;
use crate::utils::errors::{AppError, AppResult};

/// Clave fija bajo la que se guarda el perfil
pub const SESSION_KEY: &str = "charged_admin_user";

/// Operaciones de almacenamiento de sesión
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> AppResult<Option<AdminProfile>>;
    async fn save(&self, profile: &AdminProfile) -> AppResult<()>;
    async fn clear(&self) -> AppResult<()>;
}

/// Sesión en memoria (tests y ejecuciones sin persistencia)
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, AdminProfile>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: AdminProfile) -> Self {
        let mut entries = HashMap::new();
        entries.insert(SESSION_KEY.to_string(), profile);
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStore {
    async fn load(&self) -> AppResult<Option<AdminProfile>> {
        Ok(self.entries.read().await.get(SESSION_KEY).cloned())
    }

    async fn save(&self, profile: &AdminProfile) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(SESSION_KEY.to_string(), profile.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.remove(SESSION_KEY);
        Ok(())
    }
}

/// Sesión persistida en un fichero JSON `{ "charged_admin_user": {...} }`
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_entries(&self) -> AppResult<HashMap<String, AdminProfile>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Session(format!(
                    "{} is not a valid session file: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(AppError::Session(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl SessionStorage for FileSessionStore {
    async fn load(&self) -> AppResult<Option<AdminProfile>> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(SESSION_KEY))
    }

    async fn save(&self, profile: &AdminProfile) -> AppResult<()> {
        let mut entries = HashMap::new();
        entries.insert(SESSION_KEY, profile);
        let bytes = serde_json::to_vec_pretty(&entries)
            .map_err(|e| AppError::Session(format!("cannot serialize session: {}", e)))?;

        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            AppError::Session(format!("cannot write {}: {}", self.path.display(), e))
        })?;
        debug!("💾 Sesión guardada en {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Session(format!(
                "cannot remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Estado de autenticación observable por el front end
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Authenticated(AdminProfile),
    LoggedOut,
}

/// Sesión compartida: almacenamiento + canal de eventos de login/logout
pub struct SessionHandle {
    storage: Arc<dyn SessionStorage>,
    events: watch::Sender<SessionState>,
}

impl SessionHandle {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = watch::channel(SessionState::LoggedOut);
        Self { storage, events }
    }

    /// Suscribirse a los cambios de sesión (el "redirect a login" del front end)
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.events.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.events.borrow().clone()
    }

    /// Token bearer de la sesión actual, si existe
    pub async fn token(&self) -> Option<String> {
        match self.storage.load().await {
            Ok(profile) => profile.map(|p| p.token),
            Err(e) => {
                warn!("⚠️ No se pudo leer la sesión: {}", e);
                None
            }
        }
    }

    pub async fn current(&self) -> AppResult<Option<AdminProfile>> {
        self.storage.load().await
    }

    pub async fn establish(&self, profile: AdminProfile) -> AppResult<()> {
        self.storage.save(&profile).await?;
        info!("✅ Sesión iniciada para {}", profile.email);
        self.events.send_replace(SessionState::Authenticated(profile));
        Ok(())
    }

    /// Marcar como autenticado sin volver a escribir el almacenamiento
    pub fn mark_restored(&self, profile: AdminProfile) {
        self.events.send_replace(SessionState::Authenticated(profile));
    }

    pub async fn end(&self) -> AppResult<()> {
        let result = self.storage.clear().await;
        self.events.send_replace(SessionState::LoggedOut);
        info!("👋 Sesión cerrada");
        result
    }
}
