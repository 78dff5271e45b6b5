//! Modelo de Rider y libro de puntos de recompensa

use serde::{Deserialize, Serialize};

use crate::controllers::projection::Searchable;
use crate::models::{EntityId, Resource};

/// Pasajero
///
/// El saldo de puntos no viene en el registro: se calcula sumando el libro.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rider {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(rename = "totalRides", alias = "total_rides", default)]
    pub total_rides: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "lastRideDate", default)]
    pub last_ride_date: Option<String>,
}

impl Resource for Rider {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Searchable for Rider {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }
}

/// Entrada del libro de puntos (positivo = ganado, negativo = consumido)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardPointEntry {
    pub id: EntityId,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reward: Option<String>,
    #[serde(default)]
    pub ride_id: Option<EntityId>,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub redeem_by: Option<EntityId>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Resource for RewardPointEntry {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

/// Cuerpo de `GET /admin/rewardpoints/{userId}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewardPointsPayload {
    #[serde(default)]
    pub rewards: Option<Vec<RewardPointEntry>>,
}

/// Saldo de puntos: suma de todas las entradas
pub fn total_points(entries: &[RewardPointEntry]) -> i64 {
    entries.iter().map(|entry| entry.amount).sum()
}
