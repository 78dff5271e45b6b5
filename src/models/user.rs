//! Modelo del administrador autenticado
//!
//! Es el único estado que sobrevive entre ejecuciones (ver `cache::session_store`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Support,
}

/// Perfil del administrador con su token del proveedor de identidad
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub token: String,
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Cuenta devuelta por `GET /admin`
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccount {
    pub user_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AdminAccount {
    pub fn is_admin(&self) -> bool {
        self.user_type == "admin"
    }
}
