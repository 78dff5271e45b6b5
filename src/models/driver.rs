//! Modelo de Driver
//!
//! Conductor tal como lo devuelve `GET /admin/getdrivers`, con su vehículo
//! y los documentos que se cargan bajo demanda en el detalle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::controllers::projection::{FilterSet, Searchable};
use crate::models::document::{DocumentStatus, DriverDocument};
use crate::models::{EntityId, Resource};

/// Clase de vehículo / tipo de viaje
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Electric,
    Regular,
    Suv,
}

impl VehicleType {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Electric => "Electric Vehicle",
            VehicleType::Regular => "Standard Vehicle",
            VehicleType::Suv => "SUV Vehicle",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleType::Electric => "electric",
            VehicleType::Regular => "regular",
            VehicleType::Suv => "suv",
        };
        f.write_str(name)
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electric" => Ok(VehicleType::Electric),
            "regular" => Ok(VehicleType::Regular),
            "suv" => Ok(VehicleType::Suv),
            other => Err(format!("unknown vehicle type '{}'", other)),
        }
    }
}

/// Datos del vehículo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleDetails {
    pub make: String,
    pub model: String,
    pub color: String,
    pub year: i32,
}

/// Conductor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: EntityId,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(rename = "car_type", default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_rides: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(rename = "vehicleDetails", default)]
    pub vehicle_details: Option<VehicleDetails>,
    #[serde(default)]
    pub documents: Vec<DriverDocument>,
}

impl Driver {
    /// Documentos pendientes de revisión
    pub fn pending_documents(&self) -> usize {
        self.documents
            .iter()
            .filter(|doc| doc.status == DocumentStatus::Pending)
            .count()
    }

    /// Ningún documento está en un estado distinto de verificado / no presentado
    pub fn all_documents_verified(&self) -> bool {
        self.documents.iter().all(DriverDocument::is_settled)
    }

    /// Fecha de la última actualización de documentos
    pub fn last_document_update(&self) -> Option<DateTime<Utc>> {
        self.documents.iter().filter_map(|doc| doc.updated_at).max()
    }
}

impl Resource for Driver {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Searchable for Driver {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()];
        if let Some(plate) = &self.license_plate {
            fields.push(plate.as_str());
        }
        fields
    }
}

/// Filtros categóricos de la lista de conductores (`None` = todos)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverFilters {
    pub vehicle_type: Option<VehicleType>,
    pub active: Option<bool>,
}

impl FilterSet<Driver> for DriverFilters {
    fn matches(&self, driver: &Driver) -> bool {
        if let Some(vehicle_type) = self.vehicle_type {
            if driver.vehicle_type != Some(vehicle_type) {
                return false;
            }
        }
        if let Some(active) = self.active {
            if driver.is_active != active {
                return false;
            }
        }
        true
    }
}
