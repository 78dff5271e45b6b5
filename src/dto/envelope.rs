use serde::Deserialize;
use serde_json::Value;

use crate::utils::errors::{malformed, AppResult};

// Respuesta genérica del API: { "data": ..., "message": ... }
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    /// Extraer `data`; sin `data` la respuesta se trata como mal formada
    pub fn into_data(self) -> AppResult<Value> {
        match self.data {
            Some(Value::Null) | None => Err(malformed("response body has no `data` field")),
            Some(value) => Ok(value),
        }
    }
}

// Respuesta de error: { "message": ..., "error": { "code": ... } }
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.code.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or_else(|| self.error.as_ref().and_then(|e| e.message.as_deref()))
    }
}

/// Algunos endpoints de actualización devuelven `data: [registro]`
pub fn first_record(value: Value) -> AppResult<Value> {
    match value {
        Value::Array(mut items) => {
            if items.is_empty() {
                Err(malformed("expected one updated record, got an empty list"))
            } else {
                Ok(items.swap_remove(0))
            }
        }
        other => Ok(other),
    }
}
