//! Clients - Clientes HTTP de servicios externos
//!
//! Este módulo contiene el cliente del API de administración y el del
//! proveedor de identidad.

pub mod api_client;
pub mod identity_client;

pub use api_client::AdminApiClient;
pub use identity_client::{IdentityClient, IdentityProvider};
