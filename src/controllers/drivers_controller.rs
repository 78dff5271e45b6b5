//! Controlador de conductores
//!
//! Lista con búsqueda y filtros por tipo de vehículo / estado, detalle con
//! documentos y viajes cargados en paralelo, revisión de documentos,
//! activación y borrado.
//!
//! Reconciliación: activar/desactivar y revisar documentos parchean en local.
//! Si el detalle está abierto el parche va a la vista de detalle y se lleva
//! al store al cerrarla; el borrado quita la entidad del store.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info};

use crate::controllers::detail::{DetailLoader, DetailTicket};
use crate::controllers::dispatcher::{FormState, MutationDispatcher};
use crate::controllers::projection::{ListView, PageView};
use crate::controllers::resource_store::ResourceStore;
use crate::dto::document_dto::{DocumentReviewForm, DocumentReviewPayload};
use crate::models::{Driver, DriverDocument, DriverFilters, EntityId, Ride};
use crate::services::{DriverApi, RideApi, UserApi};
use crate::utils::errors::{invalid_input, AppResult};

/// Vista de detalle de un conductor
#[derive(Debug, Clone, PartialEq)]
pub struct DriverDetail {
    pub driver: Driver,
    pub documents: Vec<DriverDocument>,
    pub rides: Vec<Ride>,
}

/// Resultado de las cargas del detalle
pub struct DriverDetailParts {
    pub documents: AppResult<Vec<DriverDocument>>,
    pub rides: AppResult<Vec<Ride>>,
}

pub struct DriversController {
    drivers: Arc<dyn DriverApi>,
    rides: Arc<dyn RideApi>,
    users: Arc<dyn UserApi>,
    store: ResourceStore<Driver>,
    list: ListView<DriverFilters>,
    dispatcher: MutationDispatcher,
    detail: DetailLoader<DriverDetail>,
    review: FormState<DocumentReviewForm>,
    reviewing: Option<EntityId>,
}

impl DriversController {
    pub fn new(
        drivers: Arc<dyn DriverApi>,
        rides: Arc<dyn RideApi>,
        users: Arc<dyn UserApi>,
        page_size: usize,
    ) -> Self {
        Self {
            drivers,
            rides,
            users,
            store: ResourceStore::new(),
            list: ListView::new(page_size),
            dispatcher: MutationDispatcher::new(),
            detail: DetailLoader::new(),
            review: FormState::new(),
            reviewing: None,
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.store.load(self.drivers.list_drivers()).await
    }

    pub fn store(&self) -> &ResourceStore<Driver> {
        &self.store
    }

    pub fn list(&self) -> &ListView<DriverFilters> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<DriverFilters> {
        &mut self.list
    }

    pub fn page(&self) -> PageView<'_, Driver> {
        self.list.view(self.store.items())
    }

    pub fn dispatcher_mut(&mut self) -> &mut MutationDispatcher {
        &mut self.dispatcher
    }

    pub fn detail(&self) -> &DetailLoader<DriverDetail> {
        &self.detail
    }

    pub fn review_form(&self) -> &FormState<DocumentReviewForm> {
        &self.review
    }

    pub fn review_form_mut(&mut self) -> &mut FormState<DocumentReviewForm> {
        &mut self.review
    }

    /// Seleccionar un conductor. Devuelve el ticket y la carga (documentos y
    /// viajes en paralelo) que el front end resuelve cuando quiera; el
    /// resultado se entrega con [`apply_detail`](Self::apply_detail).
    pub fn begin_detail(
        &mut self,
        id: &EntityId,
    ) -> AppResult<(DetailTicket, BoxFuture<'static, DriverDetailParts>)> {
        let driver = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| invalid_input("Driver not found"))?;

        let seed = DriverDetail {
            documents: driver.documents.clone(),
            driver,
            rides: Vec::new(),
        };
        let ticket = self.detail.begin(id.clone(), seed);

        let drivers = Arc::clone(&self.drivers);
        let ride_api = Arc::clone(&self.rides);
        let id = id.clone();
        let fetch = async move {
            let (documents, rides) =
                futures::join!(drivers.driver_documents(&id), ride_api.rides_for_user(&id));
            DriverDetailParts { documents, rides }
        }
        .boxed();

        Ok((ticket, fetch))
    }

    /// Fusionar el resultado de una carga; se descarta si la selección cambió
    pub fn apply_detail(
        &mut self,
        ticket: &DetailTicket,
        parts: DriverDetailParts,
    ) -> AppResult<()> {
        // resultado de una selección ya superada: ni datos ni errores
        if !self.detail.is_current(ticket) {
            debug!("🗑️ Detalle obsoleto descartado para {}", ticket.id());
            return Ok(());
        }

        let mut first_error = None;

        match parts.documents {
            Ok(documents) => {
                self.detail.apply(ticket, |view| {
                    view.driver.documents = documents.clone();
                    view.documents = documents;
                });
            }
            Err(e) => first_error = Some(e),
        }

        match parts.rides {
            Ok(rides) => {
                self.detail.apply(ticket, |view| view.rides = rides);
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => {
                self.detail.fail(ticket, &e);
                Err(e)
            }
            None => {
                self.detail.finish(ticket);
                Ok(())
            }
        }
    }

    pub async fn open_detail(&mut self, id: &EntityId) -> AppResult<()> {
        let (ticket, fetch) = self.begin_detail(id)?;
        let parts = fetch.await;
        self.apply_detail(&ticket, parts)
    }

    /// Cerrar el detalle; las ediciones confirmadas se llevan al store
    pub fn close_detail(&mut self) {
        self.review.close();
        self.reviewing = None;
        if let Some(view) = self.detail.close() {
            let id = view.driver.id.clone();
            self.store.reconcile_one(&id, view.driver);
        }
    }

    /// Activar o desactivar un conductor
    pub async fn set_active(&mut self, id: &EntityId, is_active: bool) -> AppResult<()> {
        let updated = self
            .dispatcher
            .dispatch(
                "update driver status",
                self.drivers.set_driver_active(id, is_active),
                |_| {
                    if is_active {
                        "Driver activated".to_string()
                    } else {
                        "Driver deactivated".to_string()
                    }
                },
            )
            .await?;

        let is_active = updated.is_active;
        if self.detail.selected() == Some(id) {
            self.detail.edit(|view| view.driver.is_active = is_active);
        } else {
            self.store.update_with(id, |driver| driver.is_active = is_active);
        }
        Ok(())
    }

    /// Abrir el formulario de revisión de un documento del detalle abierto
    pub fn open_review(&mut self, document_id: &EntityId) -> AppResult<()> {
        let document = self
            .detail
            .view()
            .and_then(|view| view.documents.iter().find(|doc| &doc.id == document_id))
            .ok_or_else(|| invalid_input("Document not found"))?;

        self.review.open_with(DocumentReviewForm {
            status: document.status,
            rejection_reason: document.rejection_reason.clone().unwrap_or_default(),
            notes: document.notes.clone().unwrap_or_default(),
        });
        self.reviewing = Some(document_id.clone());
        Ok(())
    }

    /// Enviar la revisión. Un rechazo sin motivo no llega a la red.
    pub async fn submit_review(&mut self) -> AppResult<DriverDocument> {
        let driver_id = self
            .detail
            .selected()
            .cloned()
            .ok_or_else(|| invalid_input("No driver selected"))?;
        let document_id = self
            .reviewing
            .clone()
            .ok_or_else(|| invalid_input("No document selected"))?;

        let api = Arc::clone(&self.drivers);
        let updated = self
            .dispatcher
            .submit(
                "update document status",
                &mut self.review,
                move |values| {
                    let payload = DocumentReviewPayload::from(values);
                    async move { api.review_document(&driver_id, &document_id, &payload).await }
                },
                |doc: &DriverDocument| format!("Document status updated to {}", doc.status),
            )
            .await?;

        self.reviewing = None;
        let document = updated.clone();
        self.detail.edit(move |view| {
            for list in [&mut view.documents, &mut view.driver.documents] {
                match list.iter_mut().find(|doc| doc.id == document.id) {
                    Some(existing) => *existing = document.clone(),
                    None => list.push(document.clone()),
                }
            }
        });
        info!("📄 Documento {} revisado", updated.id);
        Ok(updated)
    }

    pub async fn delete_driver(&mut self, id: &EntityId) -> AppResult<()> {
        self.dispatcher
            .dispatch("delete driver", self.users.delete_user(id), |_| {
                "Driver deleted successfully".to_string()
            })
            .await?;

        if self.detail.selected() == Some(id) {
            self.detail.close();
        }
        self.store.remove_one(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::dispatcher::Severity;
    use crate::models::{DocumentStatus, VehicleType};
    use crate::utils::errors::AppError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn driver(id: i64, name: &str, vehicle: &str, active: bool) -> Driver {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "email": format!("{}@charged.ca", name.to_lowercase().replace(' ', ".")),
            "phone": format!("41655500{:02}", id),
            "car_type": vehicle,
            "is_active": active
        }))
        .unwrap()
    }

    fn document(id: i64, status: &str) -> DriverDocument {
        serde_json::from_value(json!({
            "id": id,
            "document_type": "vehicleInsurance",
            "status": status,
            "user_id": 1
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct FakeApi {
        drivers: Vec<Driver>,
        documents: Vec<DriverDocument>,
        review_calls: AtomicUsize,
        deleted: Mutex<Vec<EntityId>>,
        fail_status: bool,
    }

    #[async_trait]
    impl DriverApi for FakeApi {
        async fn list_drivers(&self) -> AppResult<Vec<Driver>> {
            Ok(self.drivers.clone())
        }

        async fn driver_documents(&self, _driver_id: &EntityId) -> AppResult<Vec<DriverDocument>> {
            Ok(self.documents.clone())
        }

        async fn review_document(
            &self,
            _driver_id: &EntityId,
            document_id: &EntityId,
            payload: &DocumentReviewPayload,
        ) -> AppResult<DriverDocument> {
            self.review_calls.fetch_add(1, Ordering::SeqCst);
            let mut doc = self
                .documents
                .iter()
                .find(|d| &d.id == document_id)
                .cloned()
                .unwrap();
            doc.status = payload.status;
            doc.rejection_reason = Some(payload.rejection_reason.clone());
            Ok(doc)
        }

        async fn set_driver_active(
            &self,
            driver_id: &EntityId,
            is_active: bool,
        ) -> AppResult<Driver> {
            if self.fail_status {
                return Err(AppError::Remote {
                    status: 500,
                    code: None,
                    message: "Status update failed".to_string(),
                });
            }
            let mut driver = self.drivers.iter().find(|d| &d.id == driver_id).cloned().unwrap();
            driver.is_active = is_active;
            Ok(driver)
        }
    }

    #[async_trait]
    impl RideApi for FakeApi {
        async fn recent_rides(&self) -> AppResult<Vec<Ride>> {
            Ok(Vec::new())
        }

        async fn rides_for_user(&self, _user_id: &EntityId) -> AppResult<Vec<Ride>> {
            Ok(vec![serde_json::from_value(json!({ "id": 77, "status": "completed" })).unwrap()])
        }
    }

    #[async_trait]
    impl UserApi for FakeApi {
        async fn delete_user(&self, user_id: &EntityId) -> AppResult<()> {
            self.deleted.lock().unwrap().push(user_id.clone());
            Ok(())
        }
    }

    fn controller(api: FakeApi) -> (DriversController, Arc<FakeApi>) {
        let api = Arc::new(api);
        let controller = DriversController::new(api.clone(), api.clone(), api.clone(), 10);
        (controller, api)
    }

    fn fleet(n: i64) -> Vec<Driver> {
        (1..=n)
            .map(|i| {
                let vehicle = if i % 3 == 0 { "suv" } else { "electric" };
                driver(i, &format!("Driver {}", i), vehicle, i % 2 == 0)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_pages_of_drivers() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(23),
            ..Default::default()
        });
        controller.load().await.unwrap();

        let page = controller.page();
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0].name, "Driver 1");
        assert_eq!(page.rows[9].name, "Driver 10");

        controller.list_mut().set_page(2);
        let page = controller.page();
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.rows[0].name, "Driver 21");
    }

    #[tokio::test]
    async fn test_filters_and_page_reset() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(23),
            ..Default::default()
        });
        controller.load().await.unwrap();
        controller.list_mut().set_page(1);

        controller.list_mut().set_filters(DriverFilters {
            vehicle_type: Some(VehicleType::Suv),
            active: Some(true),
        });
        assert_eq!(controller.list().page(), 0);

        let page = controller.page();
        // 6, 12, 18
        assert_eq!(page.total_matches, 3);
        assert!(page.rows.iter().all(|d| d.is_active && d.vehicle_type == Some(VehicleType::Suv)));
    }

    #[tokio::test]
    async fn test_toggle_in_detail_is_folded_back_on_close() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(3),
            documents: vec![document(10, "pending")],
            ..Default::default()
        });
        controller.load().await.unwrap();
        let id = EntityId::from(1);

        controller.open_detail(&id).await.unwrap();
        let detail = controller.detail().view().unwrap();
        assert_eq!(detail.documents.len(), 1);
        assert_eq!(detail.rides.len(), 1);

        controller.set_active(&id, true).await.unwrap();
        // el store no cambia mientras el detalle sigue abierto
        assert!(!controller.store().get(&id).unwrap().is_active);

        controller.close_detail();
        let stored = controller.store().get(&id).unwrap();
        assert!(stored.is_active);
        assert_eq!(stored.pending_documents(), 1);
        assert_eq!(controller.store().len(), 3);
    }

    #[tokio::test]
    async fn test_closing_untouched_detail_keeps_store() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(2),
            documents: vec![document(10, "pending")],
            ..Default::default()
        });
        controller.load().await.unwrap();
        let before = controller.store().items().to_vec();

        controller.open_detail(&EntityId::from(2)).await.unwrap();
        controller.close_detail();
        assert_eq!(controller.store().items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_stale_detail_is_discarded() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(2),
            documents: vec![document(10, "verified")],
            ..Default::default()
        });
        controller.load().await.unwrap();

        let (first, first_fetch) = controller.begin_detail(&EntityId::from(1)).unwrap();
        let (second, second_fetch) = controller.begin_detail(&EntityId::from(2)).unwrap();

        controller.apply_detail(&second, second_fetch.await).unwrap();
        controller.apply_detail(&first, first_fetch.await).unwrap();

        let view = controller.detail().view().unwrap();
        assert_eq!(view.driver.id, EntityId::from(2));
        assert!(!controller.detail().is_loading());
    }

    #[tokio::test]
    async fn test_superseded_failure_is_not_reported() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(2),
            ..Default::default()
        });
        controller.load().await.unwrap();

        let (first, _) = controller.begin_detail(&EntityId::from(1)).unwrap();
        let (second, second_fetch) = controller.begin_detail(&EntityId::from(2)).unwrap();
        controller.apply_detail(&second, second_fetch.await).unwrap();

        let failed = DriverDetailParts {
            documents: Err(AppError::Timeout("10s".to_string())),
            rides: Ok(Vec::new()),
        };
        assert!(controller.apply_detail(&first, failed).is_ok());
        assert_eq!(controller.detail().error(), None);
        assert_eq!(controller.detail().view().unwrap().driver.id, EntityId::from(2));
    }

    #[tokio::test]
    async fn test_rejection_requires_reason() {
        let (mut controller, api) = controller(FakeApi {
            drivers: fleet(1),
            documents: vec![document(10, "pending")],
            ..Default::default()
        });
        controller.load().await.unwrap();
        controller.open_detail(&EntityId::from(1)).await.unwrap();
        controller.open_review(&EntityId::from(10)).unwrap();

        controller.review_form_mut().values_mut().status = DocumentStatus::Rejected;
        let err = controller.submit_review().await.unwrap_err();
        assert_eq!(err.user_message(), "A rejection reason is required");
        assert_eq!(api.review_calls.load(Ordering::SeqCst), 0);
        assert!(controller.review_form().is_open());

        controller.review_form_mut().values_mut().rejection_reason = "Blurry photo".to_string();
        let updated = controller.submit_review().await.unwrap();
        assert_eq!(updated.status, DocumentStatus::Rejected);
        assert_eq!(api.review_calls.load(Ordering::SeqCst), 1);
        assert!(!controller.review_form().is_open());

        let view = controller.detail().view().unwrap();
        assert_eq!(view.documents[0].status, DocumentStatus::Rejected);
        assert!(view.documents[0].is_consistent());

        let notes = controller.dispatcher_mut().notifications_mut().drain();
        assert_eq!(notes.last().unwrap().message, "Document status updated to rejected");
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_store() {
        let (mut controller, _) = controller(FakeApi {
            drivers: fleet(2),
            fail_status: true,
            ..Default::default()
        });
        controller.load().await.unwrap();
        let id = EntityId::from(1);

        assert!(controller.set_active(&id, true).await.is_err());
        assert!(!controller.store().get(&id).unwrap().is_active);
        let notes = controller.dispatcher_mut().notifications_mut().drain();
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "Failed to update driver status: Status update failed");
    }

    #[tokio::test]
    async fn test_delete_removes_from_store() {
        let (mut controller, api) = controller(FakeApi {
            drivers: fleet(3),
            ..Default::default()
        });
        controller.load().await.unwrap();

        controller.delete_driver(&EntityId::from(2)).await.unwrap();
        assert_eq!(controller.store().len(), 2);
        assert!(controller.store().get(&EntityId::from(2)).is_none());
        assert_eq!(api.deleted.lock().unwrap().as_slice(), &[EntityId::from(2)]);
    }
}
