//! Mutation Dispatcher
//!
//! Único camino por el que la consola cambia estado en el servidor. Cada
//! acción valida en local, envía una sola petición, espera la respuesta
//! completa y deja una notificación de éxito o fallo. La reconciliación del
//! store la hace el controlador con el valor devuelto.

use std::collections::VecDeque;
use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// Notificación transitoria para el administrador
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Cola de notificaciones pendientes de mostrar
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.queue.push_back(notification);
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.push(Severity::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.push(Severity::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> Uuid {
        self.push(Severity::Info, message)
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Vaciar la cola en orden de llegada
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}

/// Estado de un formulario (diálogo) de entrada
#[derive(Debug, Clone, Default)]
pub struct FormState<P> {
    values: P,
    open: bool,
    submitting: bool,
    error: Option<String>,
}

impl<P: Default> FormState<P> {
    pub fn new() -> Self {
        Self {
            values: P::default(),
            open: false,
            submitting: false,
            error: None,
        }
    }

    /// Abrir el formulario con valores iniciales
    pub fn open_with(&mut self, values: P) {
        self.values = values;
        self.open = true;
        self.error = None;
    }

    pub fn open(&mut self) {
        self.open_with(P::default());
    }

    /// Cerrar y limpiar
    pub fn close(&mut self) {
        self.values = P::default();
        self.open = false;
        self.submitting = false;
        self.error = None;
    }
}

impl<P> FormState<P> {
    pub fn values(&self) -> &P {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut P {
        &mut self.values
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Mientras es `true` el botón de enviar debe estar deshabilitado
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Error en línea junto al formulario
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Despachador de mutaciones de un controlador
#[derive(Debug, Default)]
pub struct MutationDispatcher {
    notifications: Notifications,
}

impl MutationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    fn report_failure(&mut self, action: &str, error: &AppError) {
        warn!("❌ Fallo en '{}': {}", action, error);
        self.notifications
            .error(format!("Failed to {}: {}", action, error.user_message()));
    }

    /// Acción sin formulario (borrar, activar/desactivar, ...)
    pub async fn dispatch<R, Fut, M>(
        &mut self,
        action: &str,
        request: Fut,
        success: M,
    ) -> AppResult<R>
    where
        Fut: Future<Output = AppResult<R>>,
        M: FnOnce(&R) -> String,
    {
        info!("🚀 {}", action);
        match request.await {
            Ok(value) => {
                self.notifications.success(success(&value));
                Ok(value)
            }
            Err(e) => {
                self.report_failure(action, &e);
                Err(e)
            }
        }
    }

    /// Enviar un formulario.
    ///
    /// Si la validación local falla no se hace ninguna petición. Ante un
    /// fallo el formulario queda abierto con sus valores y un error en línea;
    /// ante un éxito se cierra y se limpia.
    pub async fn submit<P, R, S, Fut, M>(
        &mut self,
        action: &str,
        form: &mut FormState<P>,
        send: S,
        success: M,
    ) -> AppResult<R>
    where
        P: Validate + Default,
        S: FnOnce(&P) -> Fut,
        Fut: Future<Output = AppResult<R>>,
        M: FnOnce(&R) -> String,
    {
        if let Err(errors) = form.values.validate() {
            let error = AppError::from(errors);
            form.error = Some(error.user_message());
            return Err(error);
        }

        form.error = None;
        form.submitting = true;
        let request = send(&form.values);
        let result = self.dispatch(action, request, success).await;
        form.submitting = false;

        match result {
            Ok(value) => {
                form.close();
                Ok(value)
            }
            Err(e) => {
                form.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
