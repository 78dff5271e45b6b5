//! Controlador del dashboard: métricas agregadas + viajes recientes

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::DashboardView;
use crate::services::{DashboardApi, RideApi};
use crate::utils::errors::AppResult;

pub struct DashboardController {
    dashboard: Arc<dyn DashboardApi>,
    rides: Arc<dyn RideApi>,
    view: Option<DashboardView>,
    loading: bool,
    error: Option<String>,
}

impl DashboardController {
    pub fn new(dashboard: Arc<dyn DashboardApi>, rides: Arc<dyn RideApi>) -> Self {
        Self {
            dashboard,
            rides,
            view: None,
            loading: false,
            error: None,
        }
    }

    /// Cargar métricas y viajes recientes a la vez. Si algo falla se
    /// conserva la vista anterior.
    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result =
            futures::try_join!(self.dashboard.dashboard_stats(), self.rides.recent_rides());
        self.loading = false;

        match result {
            Ok((stats, recent_rides)) => {
                debug!("📊 Dashboard cargado: {} viajes recientes", recent_rides.len());
                self.view = Some(DashboardView { stats, recent_rides });
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Fallo al cargar el dashboard: {}", e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DashboardStats, EntityId, Ride};
    use crate::utils::errors::AppError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeApi {
        rides_down: AtomicBool,
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
            Ok(serde_json::from_value(json!({
                "rideCount": "42",
                "activeDrivers": "7",
                "totalRevenue": "1034.50",
                "platformCommission": "155.18"
            }))
            .unwrap())
        }
    }

    #[async_trait]
    impl RideApi for FakeApi {
        async fn recent_rides(&self) -> AppResult<Vec<Ride>> {
            if self.rides_down.load(Ordering::SeqCst) {
                return Err(AppError::Timeout("10s".to_string()));
            }
            Ok(serde_json::from_value(json!([{ "id": 1, "status": "completed" }])).unwrap())
        }

        async fn rides_for_user(&self, _user_id: &EntityId) -> AppResult<Vec<Ride>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_load_and_failed_reload() {
        let api = Arc::new(FakeApi::default());
        let mut controller = DashboardController::new(api.clone(), api.clone());

        controller.load().await.unwrap();
        let view = controller.view().unwrap();
        assert_eq!(view.stats.ride_count, Decimal::from(42));
        assert_eq!(view.recent_rides.len(), 1);

        api.rides_down.store(true, Ordering::SeqCst);
        assert!(controller.load().await.is_err());
        assert!(controller.view().is_some());
        assert_eq!(
            controller.error(),
            Some("The server did not respond in time. Please try again.")
        );
    }
}
