//! Consola de administración de la plataforma de viajes
//!
//! Cliente tipado del API de administración y el Resource List Controller
//! (store, proyección, mutaciones y detalle) aplicado a conductores,
//! pasajeros, recompensas, tipos de documento y reglas de precio.

pub mod cache;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
