use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::models::document::{DocumentStatus, UserType};
use crate::utils::validation::{validate_identifier, validate_required_field};

// Formulario de revisión de un documento de conductor
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_rejection_reason"))]
pub struct DocumentReviewForm {
    pub status: DocumentStatus,
    pub rejection_reason: String,
    pub notes: String,
}

impl Default for DocumentReviewForm {
    fn default() -> Self {
        Self {
            status: DocumentStatus::Pending,
            rejection_reason: String::new(),
            notes: String::new(),
        }
    }
}

/// Un rechazo sin motivo no se envía
fn validate_rejection_reason(form: &DocumentReviewForm) -> Result<(), ValidationError> {
    if form.status == DocumentStatus::Rejected && form.rejection_reason.trim().is_empty() {
        let mut error = ValidationError::new("rejection_reason");
        error.message = Some("A rejection reason is required".into());
        return Err(error);
    }
    Ok(())
}

// Body de PUT /admin/verifydriverdoc/{driverId}/{documentId}
#[derive(Debug, Serialize, PartialEq)]
pub struct DocumentReviewPayload {
    pub status: DocumentStatus,
    pub rejection_reason: String,
    pub notes: String,
}

impl From<&DocumentReviewForm> for DocumentReviewPayload {
    fn from(form: &DocumentReviewForm) -> Self {
        Self {
            status: form.status,
            rejection_reason: form.rejection_reason.trim().to_string(),
            notes: form.notes.trim().to_string(),
        }
    }
}

// Formulario de alta / edición del catálogo de documentos
#[derive(Debug, Clone, Default, Serialize, Validate, PartialEq)]
pub struct DocumentTypeForm {
    #[validate(custom = "validate_identifier")]
    pub name: String,
    #[validate(custom = "validate_required_field")]
    pub display_name: String,
    pub description: String,
    pub is_required: bool,
    pub user_type: UserType,
}

impl From<&crate::models::DocumentTypeDefinition> for DocumentTypeForm {
    fn from(definition: &crate::models::DocumentTypeDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            display_name: definition.display_name.clone(),
            description: definition.description.clone(),
            is_required: definition.is_required,
            user_type: definition.user_type,
        }
    }
}
