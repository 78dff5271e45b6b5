//! Services module
//!
//! Este módulo contiene las capacidades del API de administración (un trait
//! por recurso) y el servicio de autenticación.

pub mod admin_api;
pub mod auth_service;

pub use admin_api::{
    AdminApi, DashboardApi, DocumentTypeApi, DriverApi, PricingApi, RewardApi, RideApi, RiderApi,
    UserApi,
};
pub use auth_service::AuthService;
