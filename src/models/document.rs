//! Modelo de documentos de conductor y catálogo de tipos de documento

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::controllers::projection::Searchable;
use crate::models::{EntityId, Resource};

/// Tipo de documento que un conductor debe presentar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    DriverLicense,
    VehicleInsurance,
    VehiclePermit,
    BackgroundCheck,
    WorkEligibility,
    DriverAbstract,
    VehicleDetails,
}

impl DocumentType {
    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::DriverLicense => "Driver's License",
            DocumentType::VehicleInsurance => "Vehicle Insurance",
            DocumentType::VehiclePermit => "Vehicle Permit",
            DocumentType::BackgroundCheck => "Background Check",
            DocumentType::WorkEligibility => "Work Eligibility",
            DocumentType::DriverAbstract => "Driver Abstract",
            DocumentType::VehicleDetails => "Vehicle Details",
        }
    }
}

/// Estado de revisión de un documento
///
/// Cualquier estado puede seguir a cualquier otro: la revisión es manual y el
/// administrador puede corregir una decisión anterior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DocumentStatus {
    NotSubmitted,
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::NotSubmitted => "notSubmitted",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Verified => "verified",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notsubmitted" | "not_submitted" | "not-submitted" => Ok(DocumentStatus::NotSubmitted),
            "pending" => Ok(DocumentStatus::Pending),
            "verified" => Ok(DocumentStatus::Verified),
            "rejected" => Ok(DocumentStatus::Rejected),
            "expired" => Ok(DocumentStatus::Expired),
            other => Err(format!("unknown document status '{}'", other)),
        }
    }
}

/// Documento presentado por un conductor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverDocument {
    pub id: EntityId,
    pub document_type: DocumentType,
    pub status: DocumentStatus,
    pub user_id: EntityId,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

impl DriverDocument {
    /// Un documento rechazado debe llevar un motivo no vacío
    pub fn is_consistent(&self) -> bool {
        self.status != DocumentStatus::Rejected
            || self
                .rejection_reason
                .as_deref()
                .is_some_and(|reason| !reason.trim().is_empty())
    }

    /// Cuenta como "en orden" para el botón de todos verificados
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            DocumentStatus::Verified | DocumentStatus::NotSubmitted
        )
    }
}

impl Resource for DriverDocument {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

/// A quién aplica un tipo de documento del catálogo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Driver,
    Rider,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Driver => "driver",
            UserType::Rider => "rider",
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driver" => Ok(UserType::Driver),
            "rider" => Ok(UserType::Rider),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

/// Entrada del catálogo de tipos de documento
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentTypeDefinition {
    pub id: EntityId,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_required: bool,
    pub user_type: UserType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for DocumentTypeDefinition {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Searchable for DocumentTypeDefinition {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.user_type.as_str()]
    }
}
