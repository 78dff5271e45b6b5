//! Capacidades del API de administración
//!
//! Un trait estrecho por capacidad. Los controladores reciben solo el que
//! necesitan (`Arc<dyn DriverApi>`, ...) y los tests los sustituyen por
//! implementaciones en memoria. `AdminApiClient` los implementa todos.

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::AdminApiClient;
use crate::dto::document_dto::{DocumentReviewPayload, DocumentTypeForm};
use crate::dto::driver_dto::DriverStatusPayload;
use crate::dto::envelope::first_record;
use crate::dto::pricing_dto::UpdateRideTypeRequest;
use crate::dto::reward_dto::{ChangeRewardPointsBody, CreateRewardBody};
use crate::models::rider::RewardPointsPayload;
use crate::models::{
    AdminAccount, DashboardStats, DocumentTypeDefinition, Driver, DriverDocument, EntityId,
    Reward, RewardPointEntry, Ride, RideTypePricingRule, Rider,
};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /admin` con el token recién emitido por el proveedor de identidad
    async fn fetch_account(&self, token: &str) -> AppResult<AdminAccount>;
}

#[async_trait]
pub trait DriverApi: Send + Sync {
    async fn list_drivers(&self) -> AppResult<Vec<Driver>>;
    async fn driver_documents(&self, driver_id: &EntityId) -> AppResult<Vec<DriverDocument>>;
    async fn review_document(
        &self,
        driver_id: &EntityId,
        document_id: &EntityId,
        payload: &DocumentReviewPayload,
    ) -> AppResult<DriverDocument>;
    async fn set_driver_active(&self, driver_id: &EntityId, is_active: bool) -> AppResult<Driver>;
}

#[async_trait]
pub trait DocumentTypeApi: Send + Sync {
    async fn list_document_types(&self) -> AppResult<Vec<DocumentTypeDefinition>>;
    async fn create_document_type(
        &self,
        form: &DocumentTypeForm,
    ) -> AppResult<DocumentTypeDefinition>;
    async fn update_document_type(
        &self,
        id: &EntityId,
        form: &DocumentTypeForm,
    ) -> AppResult<DocumentTypeDefinition>;
    async fn delete_document_type(&self, id: &EntityId) -> AppResult<()>;
}

#[async_trait]
pub trait RiderApi: Send + Sync {
    async fn list_riders(&self) -> AppResult<Vec<Rider>>;
    async fn reward_points(&self, user_id: &EntityId) -> AppResult<Vec<RewardPointEntry>>;
    async fn change_reward_points(
        &self,
        user_id: &EntityId,
        body: &ChangeRewardPointsBody,
    ) -> AppResult<()>;
    async fn delete_reward_point(&self, user_id: &EntityId, entry_id: &EntityId) -> AppResult<()>;
}

#[async_trait]
pub trait RewardApi: Send + Sync {
    async fn list_rewards(&self) -> AppResult<Vec<Reward>>;
    async fn create_reward(&self, body: &CreateRewardBody) -> AppResult<Reward>;
    async fn delete_reward(&self, id: &EntityId) -> AppResult<()>;
}

#[async_trait]
pub trait PricingApi: Send + Sync {
    async fn list_ride_types(&self) -> AppResult<Vec<RideTypePricingRule>>;
    async fn update_ride_type(
        &self,
        id: &EntityId,
        body: &UpdateRideTypeRequest,
    ) -> AppResult<RideTypePricingRule>;
}

#[async_trait]
pub trait RideApi: Send + Sync {
    async fn recent_rides(&self) -> AppResult<Vec<Ride>>;
    async fn rides_for_user(&self, user_id: &EntityId) -> AppResult<Vec<Ride>>;
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_stats(&self) -> AppResult<DashboardStats>;
}

#[async_trait]
pub trait UserApi: Send + Sync {
    /// Borra un conductor o un pasajero
    async fn delete_user(&self, user_id: &EntityId) -> AppResult<()>;
}

fn seg(id: &EntityId) -> String {
    AdminApiClient::segment(id.as_str()).into_owned()
}

/// Decodificar un registro que el servidor puede devolver suelto o como `[registro]`
fn single<T: serde::de::DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(first_record(value)?).map_err(AppError::from)
}

#[async_trait]
impl AdminApi for AdminApiClient {
    async fn fetch_account(&self, token: &str) -> AppResult<AdminAccount> {
        self.get_with_token("/admin", token).await
    }
}

#[async_trait]
impl DriverApi for AdminApiClient {
    async fn list_drivers(&self) -> AppResult<Vec<Driver>> {
        self.get("/admin/getdrivers").await
    }

    async fn driver_documents(&self, driver_id: &EntityId) -> AppResult<Vec<DriverDocument>> {
        self.get(&format!("/admin/getdriverdocs/{}", seg(driver_id))).await
    }

    async fn review_document(
        &self,
        driver_id: &EntityId,
        document_id: &EntityId,
        payload: &DocumentReviewPayload,
    ) -> AppResult<DriverDocument> {
        let path = format!("/admin/verifydriverdoc/{}/{}", seg(driver_id), seg(document_id));
        let value: Value = self.put(&path, payload).await?;
        single(value)
    }

    async fn set_driver_active(&self, driver_id: &EntityId, is_active: bool) -> AppResult<Driver> {
        let path = format!("/admin/updatestatus/{}", seg(driver_id));
        let value: Value = self.put(&path, &DriverStatusPayload { is_active }).await?;
        single(value)
    }
}

#[async_trait]
impl DocumentTypeApi for AdminApiClient {
    async fn list_document_types(&self) -> AppResult<Vec<DocumentTypeDefinition>> {
        self.get("/admin/documenttypes").await
    }

    async fn create_document_type(
        &self,
        form: &DocumentTypeForm,
    ) -> AppResult<DocumentTypeDefinition> {
        let value: Value = self.post("/admin/documenttypes", form).await?;
        single(value)
    }

    async fn update_document_type(
        &self,
        id: &EntityId,
        form: &DocumentTypeForm,
    ) -> AppResult<DocumentTypeDefinition> {
        let value: Value = self
            .put(&format!("/admin/documenttypes/{}", seg(id)), form)
            .await?;
        single(value)
    }

    async fn delete_document_type(&self, id: &EntityId) -> AppResult<()> {
        self.delete_ignoring_body(&format!("/admin/documenttypes/{}", seg(id)))
            .await
    }
}

#[async_trait]
impl RiderApi for AdminApiClient {
    async fn list_riders(&self) -> AppResult<Vec<Rider>> {
        self.get("/admin/getriders").await
    }

    async fn reward_points(&self, user_id: &EntityId) -> AppResult<Vec<RewardPointEntry>> {
        let payload: RewardPointsPayload = self
            .get(&format!("/admin/rewardpoints/{}", seg(user_id)))
            .await?;
        Ok(payload.rewards.unwrap_or_default())
    }

    async fn change_reward_points(
        &self,
        user_id: &EntityId,
        body: &ChangeRewardPointsBody,
    ) -> AppResult<()> {
        // el servidor no devuelve la entrada creada; basta con el código de estado
        self.post_ignoring_body(&format!("/admin/rewardpoints/{}", seg(user_id)), body)
            .await
    }

    async fn delete_reward_point(&self, user_id: &EntityId, entry_id: &EntityId) -> AppResult<()> {
        self.delete_ignoring_body(&format!(
            "/admin/rewardpoints/{}/{}",
            seg(user_id),
            seg(entry_id)
        ))
        .await
    }
}

#[async_trait]
impl RewardApi for AdminApiClient {
    async fn list_rewards(&self) -> AppResult<Vec<Reward>> {
        self.get("/admin/rewards").await
    }

    async fn create_reward(&self, body: &CreateRewardBody) -> AppResult<Reward> {
        let value: Value = self.post("/admin/rewards", body).await?;
        single(value)
    }

    async fn delete_reward(&self, id: &EntityId) -> AppResult<()> {
        self.delete_ignoring_body(&format!("/admin/rewards/{}", seg(id)))
            .await
    }
}

#[async_trait]
impl PricingApi for AdminApiClient {
    async fn list_ride_types(&self) -> AppResult<Vec<RideTypePricingRule>> {
        self.get("/ride/ridetype").await
    }

    async fn update_ride_type(
        &self,
        id: &EntityId,
        body: &UpdateRideTypeRequest,
    ) -> AppResult<RideTypePricingRule> {
        let value: Value = self.put(&format!("/ride/ridetype/{}", seg(id)), body).await?;
        single(value)
    }
}

#[async_trait]
impl RideApi for AdminApiClient {
    async fn recent_rides(&self) -> AppResult<Vec<Ride>> {
        self.get("/ride").await
    }

    async fn rides_for_user(&self, user_id: &EntityId) -> AppResult<Vec<Ride>> {
        match self
            .get(&format!("/admin/ride/userrides/{}", seg(user_id)))
            .await
        {
            // el API responde 404 cuando el usuario no tiene viajes
            Err(AppError::Remote { status: 404, .. }) => Ok(Vec::new()),
            other => other,
        }
    }
}

#[async_trait]
impl DashboardApi for AdminApiClient {
    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        self.get("/admin/dashboardstats").await
    }
}

#[async_trait]
impl UserApi for AdminApiClient {
    async fn delete_user(&self, user_id: &EntityId) -> AppResult<()> {
        self.delete_ignoring_body(&format!("/admin/deleteusers/{}", seg(user_id)))
            .await
    }
}
