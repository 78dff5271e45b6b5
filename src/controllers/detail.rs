//! Detail Loader
//!
//! Vista de detalle transitoria de la entidad seleccionada, separada del
//! Resource Store. Cada selección incrementa un contador de generación; los
//! resultados que llegan con un ticket de una generación anterior se descartan.

use tracing::debug;

use crate::models::EntityId;
use crate::utils::errors::AppError;

/// Ticket de una carga de detalle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    generation: u64,
    id: EntityId,
}

impl DetailTicket {
    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Debug)]
pub struct DetailLoader<V> {
    generation: u64,
    selected: Option<EntityId>,
    view: Option<V>,
    loading: bool,
    error: Option<String>,
    dirty: bool,
}

impl<V> Default for DetailLoader<V> {
    fn default() -> Self {
        Self {
            generation: 0,
            selected: None,
            view: None,
            loading: false,
            error: None,
            dirty: false,
        }
    }
}

impl<V> DetailLoader<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seleccionar `id` con una vista inicial; invalida cualquier carga anterior
    pub fn begin(&mut self, id: EntityId, seed: V) -> DetailTicket {
        self.generation += 1;
        self.selected = Some(id.clone());
        self.view = Some(seed);
        self.loading = true;
        self.error = None;
        self.dirty = false;
        DetailTicket {
            generation: self.generation,
            id,
        }
    }

    /// Ticket de la selección actual, para recargas parciales del detalle abierto
    pub fn current_ticket(&self) -> Option<DetailTicket> {
        self.selected.as_ref().map(|id| DetailTicket {
            generation: self.generation,
            id: id.clone(),
        })
    }

    pub fn is_current(&self, ticket: &DetailTicket) -> bool {
        ticket.generation == self.generation && self.selected.as_ref() == Some(&ticket.id)
    }

    /// Fusionar un resultado en la vista si el ticket sigue vigente
    pub fn apply<F>(&mut self, ticket: &DetailTicket, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        if !self.is_current(ticket) {
            debug!("🗑️ Resultado obsoleto descartado para {}", ticket.id);
            return false;
        }
        match self.view.as_mut() {
            Some(view) => {
                f(view);
                true
            }
            None => false,
        }
    }

    pub fn finish(&mut self, ticket: &DetailTicket) {
        if self.is_current(ticket) {
            self.loading = false;
        }
    }

    pub fn fail(&mut self, ticket: &DetailTicket, error: &AppError) {
        if self.is_current(ticket) {
            self.loading = false;
            self.error = Some(error.user_message());
        }
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Modificar la vista tras una edición ya confirmada por el servidor.
    /// Marca la vista para devolverla al store al cerrar.
    pub fn edit<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        match self.view.as_mut() {
            Some(view) => {
                f(view);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cerrar el detalle. Devuelve la vista solo si tiene ediciones
    /// confirmadas que hay que llevar al store.
    pub fn close(&mut self) -> Option<V> {
        self.generation += 1;
        self.selected = None;
        self.loading = false;
        self.error = None;
        let view = self.view.take();
        let dirty = std::mem::take(&mut self.dirty);
        view.filter(|_| dirty)
    }
}
