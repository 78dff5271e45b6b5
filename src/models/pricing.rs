//! Reglas de precio por tipo de viaje y calculador de tarifas
//!
//! Una regla por clase de vehículo (electric / regular / suv). Los importes
//! llegan del API como strings y se manejan como `Decimal`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EntityId, Resource};
use crate::utils::errors::{invalid_input, AppResult};

/// Regla de precio de un tipo de viaje
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideTypePricingRule {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Decimal,
    pub price_per_km: Decimal,
    pub price_per_minute: Decimal,
    #[serde(default)]
    pub min_fare: Decimal,
    #[serde(default)]
    pub cancel_fee: Decimal,
    #[serde(default)]
    pub refund_distance_in_m: i64,
    #[serde(default)]
    pub minimum_billable_distance: Decimal,
    #[serde(default)]
    pub commission_percentage: Decimal,
    #[serde(default)]
    pub govt_tax_percentage: Decimal,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Resource for RideTypePricingRule {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

/// Campos editables de una regla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingField {
    BasePrice,
    PricePerKm,
    PricePerMinute,
    MinFare,
    CancelFee,
    RefundDistance,
    MinimumBillableDistance,
    CommissionPercentage,
}

impl FromStr for PricingField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "base_price" => Ok(PricingField::BasePrice),
            "price_per_km" => Ok(PricingField::PricePerKm),
            "price_per_minute" => Ok(PricingField::PricePerMinute),
            "min_fare" => Ok(PricingField::MinFare),
            "cancel_fee" => Ok(PricingField::CancelFee),
            "refund_distance_in_m" => Ok(PricingField::RefundDistance),
            "minimum_billable_distance" => Ok(PricingField::MinimumBillableDistance),
            "commission_percentage" => Ok(PricingField::CommissionPercentage),
            other => Err(format!("unknown pricing field '{}'", other)),
        }
    }
}

impl RideTypePricingRule {
    /// Aplicar una edición local; un valor no numérico queda en 0
    pub fn set_field(&mut self, field: PricingField, raw: &str) {
        let value = Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO);
        match field {
            PricingField::BasePrice => self.base_price = value,
            PricingField::PricePerKm => self.price_per_km = value,
            PricingField::PricePerMinute => self.price_per_minute = value,
            PricingField::MinFare => self.min_fare = value,
            PricingField::CancelFee => self.cancel_fee = value,
            PricingField::RefundDistance => {
                self.refund_distance_in_m = value.trunc().to_i64().unwrap_or(0)
            }
            PricingField::MinimumBillableDistance => self.minimum_billable_distance = value,
            PricingField::CommissionPercentage => self.commission_percentage = value,
        }
    }

    /// Calcular el desglose de una tarifa para una distancia y duración.
    /// Un desbordamiento de `Decimal` se reporta como entrada inválida.
    pub fn fare_for(
        &self,
        distance_km: Decimal,
        duration_minutes: Decimal,
    ) -> AppResult<FareBreakdown> {
        let too_large = || invalid_input("Distance or duration is too large");

        let base_fare = self.base_price;
        let billable_distance = distance_km
            .checked_sub(self.minimum_billable_distance)
            .ok_or_else(too_large)?
            .max(Decimal::ZERO);
        let distance_fare = billable_distance
            .checked_mul(self.price_per_km)
            .ok_or_else(too_large)?;
        let duration_fare = duration_minutes
            .checked_mul(self.price_per_minute)
            .ok_or_else(too_large)?;
        let total_fare = base_fare
            .checked_add(distance_fare)
            .and_then(|fare| fare.checked_add(duration_fare))
            .ok_or_else(too_large)?;
        let commission_amount = total_fare
            .checked_mul(self.commission_percentage)
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(too_large)?;
        let driver_earnings = total_fare
            .checked_sub(commission_amount)
            .ok_or_else(too_large)?;

        Ok(FareBreakdown {
            base_fare,
            distance_fare,
            duration_fare,
            total_fare,
            commission_amount,
            driver_earnings,
            commission_percentage: self.commission_percentage,
            points_awarded: total_fare.floor().to_i64().unwrap_or(0),
        })
    }
}

/// Desglose de una tarifa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareBreakdown {
    pub base_fare: Decimal,
    pub distance_fare: Decimal,
    pub duration_fare: Decimal,
    pub total_fare: Decimal,
    pub commission_amount: Decimal,
    pub driver_earnings: Decimal,
    pub commission_percentage: Decimal,
    pub points_awarded: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn electric_rule() -> RideTypePricingRule {
        serde_json::from_str(
            r#"{
                "id": 1,
                "name": "electric",
                "base_price": "3.00",
                "price_per_km": "1.20",
                "price_per_minute": "0.25",
                "min_fare": "5.00",
                "cancel_fee": "4.00",
                "refund_distance_in_m": 500,
                "minimum_billable_distance": "2",
                "commission_percentage": "15",
                "govt_tax_percentage": "13",
                "icon": "electric",
                "is_active": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fare_breakdown() {
        let fare = electric_rule().fare_for(dec("5"), dec("15")).unwrap();
        assert_eq!(fare.base_fare, dec("3.00"));
        assert_eq!(fare.distance_fare, dec("3.60"));
        assert_eq!(fare.duration_fare, dec("3.75"));
        assert_eq!(fare.total_fare, dec("10.35"));
        assert_eq!(fare.commission_amount, dec("1.5525"));
        assert_eq!(fare.driver_earnings, dec("8.7975"));
        assert_eq!(fare.points_awarded, 10);
    }

    #[test]
    fn test_short_ride_has_no_distance_fare() {
        let fare = electric_rule().fare_for(dec("1.5"), dec("0")).unwrap();
        assert_eq!(fare.distance_fare, Decimal::ZERO);
        assert_eq!(fare.total_fare, dec("3.00"));
    }

    #[test]
    fn test_huge_distance_is_rejected() {
        let err = electric_rule().fare_for(Decimal::MAX, Decimal::ONE).unwrap_err();
        assert_eq!(err.user_message(), "Distance or duration is too large");

        let err = electric_rule().fare_for(Decimal::ZERO, Decimal::MAX).unwrap_err();
        assert_eq!(err.user_message(), "Distance or duration is too large");
    }

    #[test]
    fn test_set_field() {
        let mut rule = electric_rule();
        rule.set_field(PricingField::PricePerKm, "1.75");
        assert_eq!(rule.price_per_km, dec("1.75"));

        rule.set_field(PricingField::BasePrice, "abc");
        assert_eq!(rule.base_price, Decimal::ZERO);

        rule.set_field(PricingField::RefundDistance, "750.9");
        assert_eq!(rule.refund_distance_in_m, 750);
    }

    #[test]
    fn test_pricing_field_from_str() {
        assert_eq!("cancel_fee".parse::<PricingField>(), Ok(PricingField::CancelFee));
        assert!("surge".parse::<PricingField>().is_err());
    }
}
