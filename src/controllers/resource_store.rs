//! Resource Store
//!
//! Copia local de una colección del API. Solo la modifican `load`, la
//! reconciliación tras una mutación confirmada y `remove_one`.
//! Nunca contiene dos entidades con la misma identidad.

use std::collections::HashMap;
use std::future::Future;

use tracing::{debug, warn};

use crate::models::{EntityId, Resource};
use crate::utils::errors::AppResult;

#[derive(Debug, Clone)]
pub struct ResourceStore<T> {
    items: Vec<T>,
    loading: bool,
    loaded: bool,
    error: Option<String>,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
        }
    }
}

impl<T: Resource> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Se ha completado al menos una carga correcta
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Mensaje del último fallo de carga, para la pantalla de error + reintentar
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    /// Cargar la colección completa y reemplazar el contenido.
    ///
    /// Si la carga falla se conserva el contenido anterior y se registra el
    /// error. Se puede llamar de nuevo como reintento.
    pub async fn load<Fut>(&mut self, fetch: Fut) -> AppResult<()>
    where
        Fut: Future<Output = AppResult<Vec<T>>>,
    {
        self.loading = true;
        let result = fetch.await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.replace(items);
                self.error = None;
                self.loaded = true;
                debug!("📦 Colección cargada: {} elementos", self.items.len());
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Fallo al cargar la colección: {}", e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Reemplazar el contenido; ante ids repetidos gana el último valor
    /// en la posición del primero
    pub fn replace(&mut self, items: Vec<T>) {
        let mut positions: HashMap<EntityId, usize> = HashMap::with_capacity(items.len());
        let mut unique: Vec<T> = Vec::with_capacity(items.len());

        for item in items {
            match positions.get(item.key()) {
                Some(&index) => unique[index] = item,
                None => {
                    positions.insert(item.key().clone(), unique.len());
                    unique.push(item);
                }
            }
        }

        self.items = unique;
    }

    /// Sustituir la entidad `id` por la versión confirmada por el servidor.
    /// Si no estaba en la colección se añade al final. Devuelve si existía.
    pub fn reconcile_one(&mut self, id: &EntityId, updated: T) -> bool {
        if updated.key() != id {
            warn!("⚠️ El servidor devolvió {} para la entidad {}", updated.key(), id);
            self.items.retain(|item| item.key() != updated.key());
        }

        match self.items.iter().position(|item| item.key() == id) {
            Some(index) => {
                self.items[index] = updated;
                true
            }
            None => {
                self.items.push(updated);
                false
            }
        }
    }

    /// Insertar o sustituir según la identidad de la propia entidad
    pub fn upsert(&mut self, entity: T) -> bool {
        let id = entity.key().clone();
        self.reconcile_one(&id, entity)
    }

    /// Quitar una entidad tras un borrado confirmado
    pub fn remove_one(&mut self, id: &EntityId) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == id)?;
        Some(self.items.remove(index))
    }

    /// Modificar en sitio una entidad ya presente
    pub fn update_with<F>(&mut self, id: &EntityId, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|item| item.key() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: EntityId,
        label: String,
    }

    impl Resource for Item {
        fn key(&self) -> &EntityId {
            &self.id
        }
    }

    fn item(id: i64, label: &str) -> Item {
        Item {
            id: EntityId::from(id),
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_replaces_and_dedupes() {
        let mut store = ResourceStore::new();
        store
            .load(async { Ok(vec![item(1, "a"), item(2, "b"), item(1, "c")]) })
            .await
            .unwrap();

        assert_eq!(store.items(), &[item(1, "c"), item(2, "b")]);
        assert!(store.is_loaded());
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_contents() {
        let mut store = ResourceStore::new();
        store.load(async { Ok(vec![item(1, "a")]) }).await.unwrap();

        let result = store
            .load(async { Err(AppError::Timeout("10s".to_string())) })
            .await;
        assert!(result.is_err());
        assert_eq!(store.items(), &[item(1, "a")]);
        assert_eq!(
            store.error(),
            Some("The server did not respond in time. Please try again.")
        );

        // reintento
        store.load(async { Ok(vec![item(1, "a"), item(2, "b")]) }).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_reconcile_touches_only_target() {
        let mut store = ResourceStore::new();
        store.replace(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

        assert!(store.reconcile_one(&EntityId::from(2), item(2, "updated")));
        assert_eq!(
            store.items(),
            &[item(1, "a"), item(2, "updated"), item(3, "c")]
        );
        assert_eq!(store.items().iter().filter(|i| i.id == EntityId::from(2)).count(), 1);
    }

    #[test]
    fn test_reconcile_missing_entity_appends() {
        let mut store = ResourceStore::new();
        store.replace(vec![item(1, "a")]);
        assert!(!store.upsert(item(9, "new")));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&EntityId::from(9)), Some(&item(9, "new")));
    }

    #[test]
    fn test_remove_and_update() {
        let mut store = ResourceStore::new();
        store.replace(vec![item(1, "a"), item(2, "b")]);

        assert_eq!(store.remove_one(&EntityId::from(1)), Some(item(1, "a")));
        assert_eq!(store.remove_one(&EntityId::from(1)), None);

        assert!(store.update_with(&EntityId::from(2), |i| i.label = "z".to_string()));
        assert!(!store.update_with(&EntityId::from(7), |i| i.label = "x".to_string()));
        assert_eq!(store.items(), &[item(2, "z")]);
    }
}
