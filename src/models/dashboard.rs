//! Estadísticas del dashboard

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ride::Ride;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideTypeCount {
    pub name: String,
    pub count: Decimal,
}

/// Métricas agregadas de `GET /admin/dashboardstats`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub ride_count: Decimal,
    pub active_drivers: Decimal,
    pub total_revenue: Decimal,
    pub platform_commission: Decimal,
    #[serde(default)]
    pub ride_type_counts: Vec<RideTypeCount>,
}

/// Vista del dashboard: métricas + viajes recientes
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent_rides: Vec<Ride>,
}
