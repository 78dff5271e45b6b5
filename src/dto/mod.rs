//! DTOs
//!
//! Formularios validados en el cliente y cuerpos de petición / respuesta
//! del API de administración.

pub mod auth_dto;
pub mod document_dto;
pub mod driver_dto;
pub mod envelope;
pub mod pricing_dto;
pub mod reward_dto;
