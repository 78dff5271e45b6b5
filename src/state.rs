//! Estado compartido de la aplicación
//!
//! Se construye una sola vez en la raíz y entrega a cada controlador solo las
//! capacidades del API que necesita.

use std::sync::Arc;

use crate::cache::{FileSessionStore, SessionHandle, SessionStorage};
use crate::clients::{AdminApiClient, IdentityClient};
use crate::config::environment::EnvironmentConfig;
use crate::controllers::{
    DashboardController, DocumentTypesController, DriversController, PricingController,
    RewardsController, RidersController,
};
use crate::services::AuthService;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub session: Arc<SessionHandle>,
    pub api: Arc<AdminApiClient>,
}

impl AppState {
    /// Estado con la sesión persistida en `config.session_file`
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let storage = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: EnvironmentConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> AppResult<Self> {
        let session = Arc::new(SessionHandle::new(storage));
        let api = Arc::new(AdminApiClient::new(&config, Arc::clone(&session))?);
        Ok(Self {
            config,
            session,
            api,
        })
    }

    pub fn auth_service(&self) -> AppResult<AuthService> {
        let identity = Arc::new(IdentityClient::new(&self.config)?);
        Ok(AuthService::new(
            identity,
            self.api.clone(),
            Arc::clone(&self.session),
        ))
    }

    pub fn drivers(&self) -> DriversController {
        DriversController::new(
            self.api.clone(),
            self.api.clone(),
            self.api.clone(),
            self.config.default_page_size,
        )
    }

    pub fn riders(&self) -> RidersController {
        RidersController::new(
            self.api.clone(),
            self.api.clone(),
            self.api.clone(),
            self.config.default_page_size,
        )
    }

    pub fn rewards(&self) -> RewardsController {
        RewardsController::new(self.api.clone(), self.config.default_page_size)
    }

    pub fn document_types(&self) -> DocumentTypesController {
        DocumentTypesController::new(self.api.clone(), self.config.default_page_size)
    }

    pub fn pricing(&self) -> PricingController {
        PricingController::new(self.api.clone())
    }

    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(self.api.clone(), self.api.clone())
    }
}
