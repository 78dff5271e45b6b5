//! Controlador del catálogo de tipos de documento
//!
//! Reconciliación: alta y edición hacen upsert de la entrada devuelta,
//! el borrado la quita del store.

use std::sync::Arc;

use crate::controllers::dispatcher::{FormState, MutationDispatcher};
use crate::controllers::projection::{ListView, NoFilters, PageView};
use crate::controllers::resource_store::ResourceStore;
use crate::dto::document_dto::DocumentTypeForm;
use crate::models::{DocumentTypeDefinition, EntityId};
use crate::services::DocumentTypeApi;
use crate::utils::errors::{invalid_input, AppResult};

pub struct DocumentTypesController {
    api: Arc<dyn DocumentTypeApi>,
    store: ResourceStore<DocumentTypeDefinition>,
    list: ListView<NoFilters>,
    dispatcher: MutationDispatcher,
    form: FormState<DocumentTypeForm>,
    editing: Option<EntityId>,
}

impl DocumentTypesController {
    pub fn new(api: Arc<dyn DocumentTypeApi>, page_size: usize) -> Self {
        Self {
            api,
            store: ResourceStore::new(),
            list: ListView::new(page_size),
            dispatcher: MutationDispatcher::new(),
            form: FormState::new(),
            editing: None,
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.store.load(self.api.list_document_types()).await
    }

    pub fn store(&self) -> &ResourceStore<DocumentTypeDefinition> {
        &self.store
    }

    pub fn list_mut(&mut self) -> &mut ListView<NoFilters> {
        &mut self.list
    }

    pub fn page(&self) -> PageView<'_, DocumentTypeDefinition> {
        self.list.view(self.store.items())
    }

    pub fn dispatcher_mut(&mut self) -> &mut MutationDispatcher {
        &mut self.dispatcher
    }

    pub fn form(&self) -> &FormState<DocumentTypeForm> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState<DocumentTypeForm> {
        &mut self.form
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form.open();
    }

    pub fn open_edit(&mut self, id: &EntityId) -> AppResult<()> {
        let definition = self
            .store
            .get(id)
            .ok_or_else(|| invalid_input("Document type not found"))?;
        self.form.open_with(DocumentTypeForm::from(definition));
        self.editing = Some(id.clone());
        Ok(())
    }

    /// Guardar el formulario: alta o edición según cómo se abrió
    pub async fn save(&mut self) -> AppResult<DocumentTypeDefinition> {
        let api = Arc::clone(&self.api);
        let editing = self.editing.clone();
        let action = if editing.is_some() {
            "update document type"
        } else {
            "create document type"
        };

        let saved = self
            .dispatcher
            .submit(
                action,
                &mut self.form,
                move |values| {
                    let form = values.clone();
                    async move {
                        match editing {
                            Some(id) => api.update_document_type(&id, &form).await,
                            None => api.create_document_type(&form).await,
                        }
                    }
                },
                |saved: &DocumentTypeDefinition| {
                    format!("Document type \"{}\" saved successfully", saved.display_name)
                },
            )
            .await?;

        self.editing = None;
        self.store.upsert(saved.clone());
        Ok(saved)
    }

    pub async fn delete(&mut self, id: &EntityId) -> AppResult<()> {
        self.dispatcher
            .dispatch(
                "delete document type",
                self.api.delete_document_type(id),
                |_| "Document type deleted successfully".to_string(),
            )
            .await?;
        self.store.remove_one(id);
        Ok(())
    }
}
