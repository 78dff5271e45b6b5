//! Controlador de pasajeros
//!
//! Reconciliación: el borrado quita la entidad del store; los ajustes de
//! puntos y el borrado de entradas del libro vuelven a pedir el libro
//! (el servidor no devuelve la entrada creada).

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::controllers::detail::{DetailLoader, DetailTicket};
use crate::controllers::dispatcher::{FormState, MutationDispatcher};
use crate::controllers::projection::{ListView, NoFilters, PageView};
use crate::controllers::resource_store::ResourceStore;
use crate::dto::reward_dto::{AdjustmentDirection, ChangeRewardPointsBody, RewardAdjustmentForm};
use crate::models::ride::count_by_status;
use crate::models::rider::total_points;
use crate::models::{EntityId, RewardPointEntry, Ride, Rider};
use crate::services::{RideApi, RiderApi, UserApi};
use crate::utils::errors::{invalid_input, AppResult};

/// Vista de detalle de un pasajero: viajes + libro de puntos
#[derive(Debug, Clone, PartialEq)]
pub struct RiderDetail {
    pub rider: Rider,
    pub rides: Vec<Ride>,
    pub ledger: Vec<RewardPointEntry>,
}

impl RiderDetail {
    pub fn total_points(&self) -> i64 {
        total_points(&self.ledger)
    }

    /// (completados, cancelados)
    pub fn ride_counts(&self) -> (usize, usize) {
        count_by_status(&self.rides)
    }
}

pub struct RiderDetailParts {
    pub rides: AppResult<Vec<Ride>>,
    pub ledger: AppResult<Vec<RewardPointEntry>>,
}

pub struct RidersController {
    riders: Arc<dyn RiderApi>,
    rides: Arc<dyn RideApi>,
    users: Arc<dyn UserApi>,
    store: ResourceStore<Rider>,
    list: ListView<NoFilters>,
    dispatcher: MutationDispatcher,
    detail: DetailLoader<RiderDetail>,
    adjustment: FormState<RewardAdjustmentForm>,
}

impl RidersController {
    pub fn new(
        riders: Arc<dyn RiderApi>,
        rides: Arc<dyn RideApi>,
        users: Arc<dyn UserApi>,
        page_size: usize,
    ) -> Self {
        Self {
            riders,
            rides,
            users,
            store: ResourceStore::new(),
            list: ListView::new(page_size),
            dispatcher: MutationDispatcher::new(),
            detail: DetailLoader::new(),
            adjustment: FormState::new(),
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.store.load(self.riders.list_riders()).await
    }

    pub fn store(&self) -> &ResourceStore<Rider> {
        &self.store
    }

    pub fn list_mut(&mut self) -> &mut ListView<NoFilters> {
        &mut self.list
    }

    pub fn page(&self) -> PageView<'_, Rider> {
        self.list.view(self.store.items())
    }

    pub fn dispatcher_mut(&mut self) -> &mut MutationDispatcher {
        &mut self.dispatcher
    }

    pub fn detail(&self) -> &DetailLoader<RiderDetail> {
        &self.detail
    }

    pub fn adjustment_form(&self) -> &FormState<RewardAdjustmentForm> {
        &self.adjustment
    }

    pub fn adjustment_form_mut(&mut self) -> &mut FormState<RewardAdjustmentForm> {
        &mut self.adjustment
    }

    pub fn begin_detail(
        &mut self,
        id: &EntityId,
    ) -> AppResult<(DetailTicket, BoxFuture<'static, RiderDetailParts>)> {
        let rider = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| invalid_input("Rider not found"))?;

        let ticket = self.detail.begin(
            id.clone(),
            RiderDetail {
                rider,
                rides: Vec::new(),
                ledger: Vec::new(),
            },
        );

        let riders = Arc::clone(&self.riders);
        let ride_api = Arc::clone(&self.rides);
        let id = id.clone();
        let fetch = async move {
            let (rides, ledger) =
                futures::join!(ride_api.rides_for_user(&id), riders.reward_points(&id));
            RiderDetailParts { rides, ledger }
        }
        .boxed();

        Ok((ticket, fetch))
    }

    pub fn apply_detail(
        &mut self,
        ticket: &DetailTicket,
        parts: RiderDetailParts,
    ) -> AppResult<()> {
        if !self.detail.is_current(ticket) {
            debug!("🗑️ Detalle obsoleto descartado para {}", ticket.id());
            return Ok(());
        }

        let mut failure = None;

        match parts.rides {
            Ok(rides) => {
                self.detail.apply(ticket, |view| view.rides = rides);
            }
            Err(e) => failure = Some(e),
        }
        match parts.ledger {
            Ok(ledger) => {
                self.detail.apply(ticket, |view| view.ledger = ledger);
            }
            Err(e) => failure = failure.or(Some(e)),
        }

        if let Some(e) = failure {
            self.detail.fail(ticket, &e);
            return Err(e);
        }
        self.detail.finish(ticket);
        Ok(())
    }

    pub async fn open_detail(&mut self, id: &EntityId) -> AppResult<()> {
        let (ticket, fetch) = self.begin_detail(id)?;
        let parts = fetch.await;
        self.apply_detail(&ticket, parts)
    }

    pub fn close_detail(&mut self) {
        self.adjustment.close();
        self.detail.close();
    }

    pub fn open_adjustment(&mut self, direction: AdjustmentDirection) {
        self.adjustment.open_with(RewardAdjustmentForm {
            direction,
            ..Default::default()
        });
    }

    /// Ajustar el saldo del pasajero abierto. El signo se normaliza a partir
    /// del sentido elegido; después se vuelve a pedir el libro.
    pub async fn submit_adjustment(&mut self) -> AppResult<()> {
        let rider_id = self
            .detail
            .selected()
            .cloned()
            .ok_or_else(|| invalid_input("No rider selected"))?;

        let api = Arc::clone(&self.riders);
        let target = rider_id.clone();
        self.dispatcher
            .submit(
                "adjust reward points",
                &mut self.adjustment,
                move |values| {
                    let body = ChangeRewardPointsBody::from(values);
                    async move { api.change_reward_points(&target, &body).await }
                },
                |_| "Reward points updated successfully".to_string(),
            )
            .await?;

        self.refresh_ledger().await
    }

    pub async fn delete_ledger_entry(&mut self, entry_id: &EntityId) -> AppResult<()> {
        let rider_id = self
            .detail
            .selected()
            .cloned()
            .ok_or_else(|| invalid_input("No rider selected"))?;

        self.dispatcher
            .dispatch(
                "delete reward points",
                self.riders.delete_reward_point(&rider_id, entry_id),
                |_| "Reward point entry deleted".to_string(),
            )
            .await?;

        self.refresh_ledger().await
    }

    /// Volver a pedir el libro del detalle abierto
    async fn refresh_ledger(&mut self) -> AppResult<()> {
        let ticket = match self.detail.current_ticket() {
            Some(ticket) => ticket,
            None => return Ok(()),
        };

        match self.riders.reward_points(ticket.id()).await {
            Ok(ledger) => {
                self.detail.apply(&ticket, |view| view.ledger = ledger);
                Ok(())
            }
            Err(e) => {
                self.detail.fail(&ticket, &e);
                Err(e)
            }
        }
    }

    pub async fn delete_rider(&mut self, id: &EntityId) -> AppResult<()> {
        self.dispatcher
            .dispatch("delete rider", self.users.delete_user(id), |_| {
                "Rider deleted successfully".to_string()
            })
            .await?;

        if self.detail.selected() == Some(id) {
            self.close_detail();
        }
        self.store.remove_one(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        riders: Vec<Rider>,
        ledger: Mutex<Vec<RewardPointEntry>>,
        posted: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl RiderApi for FakeApi {
        async fn list_riders(&self) -> AppResult<Vec<Rider>> {
            Ok(self.riders.clone())
        }

        async fn reward_points(&self, _user_id: &EntityId) -> AppResult<Vec<RewardPointEntry>> {
            Ok(self.ledger.lock().unwrap().clone())
        }

        async fn change_reward_points(
            &self,
            user_id: &EntityId,
            body: &ChangeRewardPointsBody,
        ) -> AppResult<()> {
            self.posted.lock().unwrap().push(body.amount);
            let mut ledger = self.ledger.lock().unwrap();
            let id = EntityId::from(ledger.len() as i64 + 100);
            ledger.push(RewardPointEntry {
                id,
                amount: body.amount,
                description: body.description.clone(),
                reward: None,
                ride_id: None,
                user_id: Some(user_id.clone()),
                redeem_by: None,
                created_at: None,
                updated_at: None,
            });
            Ok(())
        }

        async fn delete_reward_point(
            &self,
            _user_id: &EntityId,
            entry_id: &EntityId,
        ) -> AppResult<()> {
            self.ledger.lock().unwrap().retain(|e| &e.id != entry_id);
            Ok(())
        }
    }

    #[async_trait]
    impl RideApi for FakeApi {
        async fn recent_rides(&self) -> AppResult<Vec<Ride>> {
            Ok(Vec::new())
        }

        async fn rides_for_user(&self, _user_id: &EntityId) -> AppResult<Vec<Ride>> {
            Ok(serde_json::from_value(json!([
                { "id": 1, "status": "completed" },
                { "id": 2, "status": "cancelled" },
                { "id": 3, "status": "completed" }
            ]))
            .unwrap())
        }
    }

    #[async_trait]
    impl UserApi for FakeApi {
        async fn delete_user(&self, _user_id: &EntityId) -> AppResult<()> {
            Err(AppError::Remote {
                status: 403,
                code: None,
                message: "Rider has active rides".to_string(),
            })
        }
    }

    fn riders() -> Vec<Rider> {
        serde_json::from_value(json!([
            { "id": 1, "name": "John Smith", "email": "john@mail.com", "phone": "111" },
            { "id": 2, "name": "Jane Doe", "email": "jd@mail.com", "phone": "222" },
            { "id": 3, "name": "Mary Major", "email": "mary@mail.com", "phone": "333" }
        ]))
        .unwrap()
    }

    fn controller() -> (RidersController, Arc<FakeApi>) {
        let api = Arc::new(FakeApi {
            riders: riders(),
            ledger: Mutex::new(vec![RewardPointEntry {
                id: EntityId::from(1),
                amount: 500,
                description: "Signup bonus".to_string(),
                reward: None,
                ride_id: None,
                user_id: None,
                redeem_by: None,
                created_at: None,
                updated_at: None,
            }]),
            ..Default::default()
        });
        (RidersController::new(api.clone(), api.clone(), api.clone(), 10), api)
    }

    #[tokio::test]
    async fn test_search_jane() {
        let (mut controller, _) = controller();
        controller.load().await.unwrap();
        controller.list_mut().set_query("jane");

        let page = controller.page();
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.rows[0].name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_detail_totals() {
        let (mut controller, _) = controller();
        controller.load().await.unwrap();
        controller.open_detail(&EntityId::from(2)).await.unwrap();

        let view = controller.detail().view().unwrap();
        assert_eq!(view.total_points(), 500);
        assert_eq!(view.ride_counts(), (2, 1));
    }

    #[tokio::test]
    async fn test_consume_posts_negative_amount() {
        let (mut controller, api) = controller();
        controller.load().await.unwrap();
        controller.open_detail(&EntityId::from(2)).await.unwrap();

        controller.open_adjustment(AdjustmentDirection::Decrement);
        controller.adjustment_form_mut().values_mut().magnitude = 50;
        controller.adjustment_form_mut().values_mut().description = "Free coffee".to_string();
        controller.submit_adjustment().await.unwrap();

        assert_eq!(api.posted.lock().unwrap().as_slice(), &[-50]);
        assert!(!controller.adjustment_form().is_open());
        assert_eq!(controller.detail().view().unwrap().total_points(), 450);
    }

    #[tokio::test]
    async fn test_zero_magnitude_is_not_sent() {
        let (mut controller, api) = controller();
        controller.load().await.unwrap();
        controller.open_detail(&EntityId::from(1)).await.unwrap();

        controller.open_adjustment(AdjustmentDirection::Increment);
        assert!(controller.submit_adjustment().await.is_err());
        assert!(api.posted.lock().unwrap().is_empty());
        assert_eq!(
            controller.adjustment_form().error(),
            Some("Enter a positive number of points")
        );
    }

    #[tokio::test]
    async fn test_delete_entry_refetches_ledger() {
        let (mut controller, _) = controller();
        controller.load().await.unwrap();
        controller.open_detail(&EntityId::from(1)).await.unwrap();

        controller.delete_ledger_entry(&EntityId::from(1)).await.unwrap();
        assert_eq!(controller.detail().view().unwrap().total_points(), 0);
    }

    #[tokio::test]
    async fn test_superseded_failure_is_not_reported() {
        let (mut controller, _) = controller();
        controller.load().await.unwrap();

        let (first, _) = controller.begin_detail(&EntityId::from(1)).unwrap();
        let (second, second_fetch) = controller.begin_detail(&EntityId::from(2)).unwrap();
        controller.apply_detail(&second, second_fetch.await).unwrap();

        let failed = RiderDetailParts {
            rides: Err(AppError::Timeout("10s".to_string())),
            ledger: Ok(Vec::new()),
        };
        assert!(controller.apply_detail(&first, failed).is_ok());
        assert_eq!(controller.detail().error(), None);
        assert_eq!(controller.detail().view().unwrap().rider.id, EntityId::from(2));
        assert_eq!(controller.detail().view().unwrap().total_points(), 500);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_rider() {
        let (mut controller, _) = controller();
        controller.load().await.unwrap();

        let err = controller.delete_rider(&EntityId::from(3)).await.unwrap_err();
        assert_eq!(err.user_message(), "Rider has active rides");
        assert_eq!(controller.store().len(), 3);
    }
}
