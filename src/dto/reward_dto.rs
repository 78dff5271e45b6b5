use std::str::FromStr;

use serde::Serialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

// Formulario de alta de recompensa
#[derive(Debug, Clone, Default, Validate, PartialEq)]
pub struct RewardForm {
    #[validate(custom = "validate_not_blank")]
    pub title: String,
    #[validate(custom = "validate_not_blank")]
    pub description: String,
    #[validate(range(min = 1, message = "All fields are required"))]
    pub point_required: i64,
}

// Body de POST /admin/rewards
#[derive(Debug, Serialize, PartialEq)]
pub struct CreateRewardBody {
    pub title: String,
    pub description: String,
    pub point_required: i64,
}

impl From<&RewardForm> for CreateRewardBody {
    fn from(form: &RewardForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            point_required: form.point_required,
        }
    }
}

/// Sentido del ajuste de puntos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustmentDirection {
    #[default]
    Increment,
    Decrement,
}

impl FromStr for AdjustmentDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "increment" => Ok(AdjustmentDirection::Increment),
            "consume" | "decrement" => Ok(AdjustmentDirection::Decrement),
            other => Err(format!("unknown adjustment '{}', expected add or consume", other)),
        }
    }
}

// Formulario de ajuste de puntos: magnitud sin signo + sentido
#[derive(Debug, Clone, Default, Validate, PartialEq)]
pub struct RewardAdjustmentForm {
    pub direction: AdjustmentDirection,
    #[validate(range(min = 1, message = "Enter a positive number of points"))]
    pub magnitude: i64,
    pub description: String,
}

// Body de POST /admin/rewardpoints/{userId}
#[derive(Debug, Serialize, PartialEq)]
pub struct ChangeRewardPointsBody {
    pub amount: i64,
    pub description: String,
}

impl From<&RewardAdjustmentForm> for ChangeRewardPointsBody {
    /// Normaliza el signo: consumir siempre resta, añadir siempre suma
    fn from(form: &RewardAdjustmentForm) -> Self {
        let magnitude = form.magnitude.abs();
        let amount = match form.direction {
            AdjustmentDirection::Increment => magnitude,
            AdjustmentDirection::Decrement => -magnitude,
        };
        Self {
            amount,
            description: form.description.trim().to_string(),
        }
    }
}
