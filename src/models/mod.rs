//! Modelos de datos
//!
//! Registros tal como los devuelve el API de administración. Todos son
//! propiedad del servidor; la consola solo guarda copias transitorias.

pub mod dashboard;
pub mod document;
pub mod driver;
pub mod id;
pub mod pricing;
pub mod reward;
pub mod ride;
pub mod rider;
pub mod user;

pub use dashboard::{DashboardStats, DashboardView};
pub use document::{DocumentStatus, DocumentType, DocumentTypeDefinition, DriverDocument, UserType};
pub use driver::{Driver, DriverFilters, VehicleType};
pub use id::EntityId;
pub use pricing::{FareBreakdown, PricingField, RideTypePricingRule};
pub use reward::Reward;
pub use ride::{Ride, RideStatus};
pub use rider::{RewardPointEntry, Rider};
pub use user::{AdminAccount, AdminProfile, AdminRole};

/// Entidad con identidad estable dentro de una colección
pub trait Resource: Clone {
    fn key(&self) -> &EntityId;
}
