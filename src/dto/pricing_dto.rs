use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::models::pricing::RideTypePricingRule;
use crate::utils::validation::{validate_amount, validate_measure, validate_percentage};

// Body de PUT /ride/ridetype/{id}
#[derive(Debug, Clone, Serialize, Validate, PartialEq)]
pub struct UpdateRideTypeRequest {
    pub name: String,
    #[validate(custom = "validate_amount")]
    pub base_price: Decimal,
    #[validate(custom = "validate_amount")]
    pub price_per_km: Decimal,
    #[validate(custom = "validate_amount")]
    pub price_per_minute: Decimal,
    #[validate(custom = "validate_amount")]
    pub min_fare: Decimal,
    #[validate(custom = "validate_amount")]
    pub cancel_fee: Decimal,
    #[validate(range(min = 0, message = "Value cannot be negative"))]
    pub refund_distance_in_m: i64,
    #[validate(custom = "validate_amount")]
    pub minimum_billable_distance: Decimal,
    #[validate(custom = "validate_percentage")]
    pub commission_percentage: Decimal,
}

impl From<&RideTypePricingRule> for UpdateRideTypeRequest {
    fn from(rule: &RideTypePricingRule) -> Self {
        Self {
            name: rule.name.clone(),
            base_price: rule.base_price,
            price_per_km: rule.price_per_km,
            price_per_minute: rule.price_per_minute,
            min_fare: rule.min_fare,
            cancel_fee: rule.cancel_fee,
            refund_distance_in_m: rule.refund_distance_in_m,
            minimum_billable_distance: rule.minimum_billable_distance,
            commission_percentage: rule.commission_percentage,
        }
    }
}

// Parámetros del calculador de tarifas
#[derive(Debug, Clone, Validate)]
pub struct FareRequest {
    #[validate(custom = "validate_measure")]
    pub distance_km: Decimal,
    #[validate(custom = "validate_measure")]
    pub duration_minutes: Decimal,
}
