//! Controlador de reglas de precio y calculador de tarifas
//!
//! Las ediciones de campos se guardan en un borrador por regla; el store
//! solo cambia cuando el servidor confirma el PUT (reconciliación con la
//! regla devuelta).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use validator::Validate;

use crate::controllers::dispatcher::MutationDispatcher;
use crate::controllers::resource_store::ResourceStore;
use crate::dto::pricing_dto::{FareRequest, UpdateRideTypeRequest};
use crate::models::{EntityId, FareBreakdown, PricingField, RideTypePricingRule};
use crate::services::PricingApi;
use crate::utils::errors::{invalid_input, AppError, AppResult};

const SAVE_ACTION: &str = "update pricing rules";

pub struct PricingController {
    api: Arc<dyn PricingApi>,
    store: ResourceStore<RideTypePricingRule>,
    drafts: HashMap<EntityId, RideTypePricingRule>,
    saving: HashSet<EntityId>,
    dispatcher: MutationDispatcher,
}

impl PricingController {
    pub fn new(api: Arc<dyn PricingApi>) -> Self {
        Self {
            api,
            store: ResourceStore::new(),
            drafts: HashMap::new(),
            saving: HashSet::new(),
            dispatcher: MutationDispatcher::new(),
        }
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.store.load(self.api.list_ride_types()).await?;
        self.drafts.clear();
        Ok(())
    }

    pub fn store(&self) -> &ResourceStore<RideTypePricingRule> {
        &self.store
    }

    pub fn dispatcher_mut(&mut self) -> &mut MutationDispatcher {
        &mut self.dispatcher
    }

    /// Regla tal como se muestra: el borrador si existe, si no la del store
    pub fn rule(&self, id: &EntityId) -> Option<&RideTypePricingRule> {
        self.drafts.get(id).or_else(|| self.store.get(id))
    }

    /// Buscar una regla por id o por nombre (`electric`, `regular`, `suv`)
    pub fn find(&self, key: &str) -> Option<&RideTypePricingRule> {
        self.store
            .items()
            .iter()
            .find(|rule| rule.id.as_str() == key || rule.name.eq_ignore_ascii_case(key))
            .and_then(|rule| self.rule(&rule.id))
    }

    pub fn rules(&self) -> Vec<&RideTypePricingRule> {
        self.store
            .items()
            .iter()
            .filter_map(|rule| self.rule(&rule.id))
            .collect()
    }

    pub fn has_changes(&self, id: &EntityId) -> bool {
        self.drafts.contains_key(id)
    }

    pub fn is_saving(&self, id: &EntityId) -> bool {
        self.saving.contains(id)
    }

    /// Edición local de un campo; un valor no numérico queda en 0
    pub fn edit_field(&mut self, id: &EntityId, field: PricingField, raw: &str) -> AppResult<()> {
        if !self.drafts.contains_key(id) {
            let stored = self
                .store
                .get(id)
                .cloned()
                .ok_or_else(|| invalid_input("Pricing rule not found"))?;
            self.drafts.insert(id.clone(), stored);
        }
        if let Some(draft) = self.drafts.get_mut(id) {
            draft.set_field(field, raw);
        }
        Ok(())
    }

    pub fn discard_changes(&mut self, id: &EntityId) {
        self.drafts.remove(id);
    }

    /// Guardar la regla: PUT y, si el servidor confirma, parche local
    pub async fn save(&mut self, id: &EntityId) -> AppResult<RideTypePricingRule> {
        let rule = self
            .rule(id)
            .cloned()
            .ok_or_else(|| invalid_input("Pricing rule not found"))?;

        let request = UpdateRideTypeRequest::from(&rule);
        if let Err(errors) = request.validate() {
            let error = AppError::from(errors);
            self.dispatcher.notifications_mut().error(format!(
                "Failed to {}: {}",
                SAVE_ACTION,
                error.user_message()
            ));
            return Err(error);
        }

        self.saving.insert(id.clone());
        let result = self
            .dispatcher
            .dispatch(SAVE_ACTION, self.api.update_ride_type(id, &request), |_| {
                format!("Successfully updated {} pricing rules", rule.name)
            })
            .await;
        self.saving.remove(id);

        let updated = result?;
        self.drafts.remove(id);
        self.store.reconcile_one(id, updated.clone());
        Ok(updated)
    }

    /// Calculador de tarifas sobre la regla mostrada
    pub fn fare(&self, id: &EntityId, request: &FareRequest) -> AppResult<FareBreakdown> {
        request.validate()?;
        let rule = self
            .rule(id)
            .ok_or_else(|| invalid_input("Pricing rule not found"))?;
        rule.fare_for(request.distance_km, request.duration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::dispatcher::Severity;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeApi {
        puts: AtomicUsize,
        fail: AtomicBool,
    }

    fn rules() -> Vec<RideTypePricingRule> {
        serde_json::from_value(json!([
            {
                "id": 1, "name": "electric", "base_price": "3.00", "price_per_km": "1.20",
                "price_per_minute": "0.25", "min_fare": "5.00", "cancel_fee": "2.00",
                "refund_distance_in_m": 500, "minimum_billable_distance": "2",
                "commission_percentage": "15"
            },
            {
                "id": 2, "name": "suv", "base_price": "5.00", "price_per_km": "2.00",
                "price_per_minute": "0.40", "min_fare": "8.00", "cancel_fee": "4.00",
                "refund_distance_in_m": 500, "minimum_billable_distance": "1",
                "commission_percentage": "20"
            }
        ]))
        .unwrap()
    }

    #[async_trait]
    impl PricingApi for FakeApi {
        async fn list_ride_types(&self) -> AppResult<Vec<RideTypePricingRule>> {
            Ok(rules())
        }

        async fn update_ride_type(
            &self,
            id: &EntityId,
            body: &UpdateRideTypeRequest,
        ) -> AppResult<RideTypePricingRule> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Remote {
                    status: 500,
                    code: None,
                    message: "Internal error".to_string(),
                });
            }
            let mut rule = rules().into_iter().find(|r| &r.id == id).unwrap();
            rule.base_price = body.base_price;
            rule.price_per_km = body.price_per_km;
            Ok(rule)
        }
    }

    async fn controller() -> (PricingController, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::default());
        let mut controller = PricingController::new(api.clone());
        controller.load().await.unwrap();
        (controller, api)
    }

    #[tokio::test]
    async fn test_edits_stay_local_until_saved() {
        let (mut controller, _) = controller().await;
        let id = EntityId::from(1);

        controller.edit_field(&id, PricingField::BasePrice, "4.50").unwrap();
        assert_eq!(controller.rule(&id).unwrap().base_price, Decimal::from_str("4.50").unwrap());
        assert_eq!(
            controller.store().get(&id).unwrap().base_price,
            Decimal::from_str("3.00").unwrap()
        );

        controller.edit_field(&id, PricingField::PricePerKm, "abc").unwrap();
        assert_eq!(controller.rule(&id).unwrap().price_per_km, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_save_reconciles_only_that_rule() {
        let (mut controller, _) = controller().await;
        let id = EntityId::from(1);
        let other_before = controller.store().get(&EntityId::from(2)).cloned();

        controller.edit_field(&id, PricingField::BasePrice, "4.50").unwrap();
        let saved = controller.save(&id).await.unwrap();

        assert_eq!(controller.store().get(&id), Some(&saved));
        assert_eq!(controller.store().get(&EntityId::from(2)).cloned(), other_before);
        assert!(!controller.has_changes(&id));
        assert!(!controller.is_saving(&id));

        let notes = controller.dispatcher_mut().notifications_mut().drain();
        assert_eq!(notes[0].message, "Successfully updated electric pricing rules");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let (mut controller, api) = controller().await;
        api.fail.store(true, Ordering::SeqCst);
        let id = EntityId::from(2);

        controller.edit_field(&id, PricingField::BasePrice, "9").unwrap();
        assert!(controller.save(&id).await.is_err());
        assert!(controller.has_changes(&id));
        assert_eq!(
            controller.store().get(&id).unwrap().base_price,
            Decimal::from_str("5.00").unwrap()
        );

        let notes = controller.dispatcher_mut().notifications_mut().drain();
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "Failed to update pricing rules: Internal error");
    }

    #[tokio::test]
    async fn test_invalid_commission_is_not_sent() {
        let (mut controller, api) = controller().await;
        let id = EntityId::from(1);
        controller.edit_field(&id, PricingField::CommissionPercentage, "150").unwrap();

        assert!(controller.save(&id).await.is_err());
        assert_eq!(api.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fare_calculator() {
        let (controller, _) = controller().await;
        let rule = controller.find("Electric").unwrap().id.clone();

        let fare = controller
            .fare(
                &rule,
                &FareRequest {
                    distance_km: Decimal::from(5),
                    duration_minutes: Decimal::from(15),
                },
            )
            .unwrap();
        assert_eq!(fare.total_fare, Decimal::from_str("10.35").unwrap());
        assert_eq!(fare.points_awarded, 10);

        let negative = FareRequest {
            distance_km: Decimal::from(-1),
            duration_minutes: Decimal::ZERO,
        };
        assert!(controller.fare(&rule, &negative).is_err());

        let huge = FareRequest {
            distance_km: Decimal::MAX,
            duration_minutes: Decimal::from(15),
        };
        let err = controller.fare(&rule, &huge).unwrap_err();
        assert_eq!(err.user_message(), "Distance or duration is too large");
    }
}
