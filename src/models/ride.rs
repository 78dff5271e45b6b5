//! Modelo de Ride (solo lectura)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EntityId, Resource};

/// Estado de un viaje
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RideStatus {
    Pending,
    InProgress,
    Completed,
    #[serde(alias = "cancelled")]
    Canceled,
}

/// Registro histórico de un viaje
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ride {
    pub id: EntityId,
    #[serde(default)]
    pub rider_id: Option<EntityId>,
    #[serde(default)]
    pub driver_id: Option<EntityId>,
    #[serde(default)]
    pub ride_type_id: Option<EntityId>,
    pub status: RideStatus,
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub dropoff_address: String,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub duration_minutes: f64,
    #[serde(default)]
    pub base_fare: Decimal,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub arrived_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for Ride {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

/// Conteo de viajes completados y cancelados
pub fn count_by_status(rides: &[Ride]) -> (usize, usize) {
    rides.iter().fold((0, 0), |(completed, canceled), ride| match ride.status {
        RideStatus::Completed => (completed + 1, canceled),
        RideStatus::Canceled => (completed, canceled + 1),
        _ => (completed, canceled),
    })
}
