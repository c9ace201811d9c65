//! Service catalog payloads.

use super::coerce::{lenient_decimal, lenient_text};
use crate::models::ServiceFields;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ServiceRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(required(message = "Service name is required."))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[validate(required(message = "Service cost is required."))]
    pub cost: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

impl ServiceRequest {
    pub fn into_fields(self) -> Result<ServiceFields, AppError> {
        self.validate()?;

        let (Some(name), Some(cost)) = (self.name, self.cost) else {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Service name and cost are required."
            )));
        };
        if cost < Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Service cost cannot be negative."
            )));
        }

        Ok(ServiceFields {
            name,
            category: self.category,
            cost,
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceCreatedResponse {
    pub id: i64,
    pub name: String,
    pub cost: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_cost_is_rejected() {
        let req: ServiceRequest = serde_json::from_value(json!({"name": "Haircut"})).unwrap();
        let err = req.into_fields().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn blank_name_is_rejected() {
        let req: ServiceRequest =
            serde_json::from_value(json!({"name": "  ", "cost": 250})).unwrap();
        assert!(req.into_fields().is_err());
    }

    #[test]
    fn string_cost_is_accepted() {
        let req: ServiceRequest =
            serde_json::from_value(json!({"name": "Facial", "cost": "799.50"})).unwrap();
        let fields = req.into_fields().unwrap();
        assert_eq!(fields.cost, Decimal::new(79950, 2));
        assert_eq!(fields.category, None);
    }

    #[test]
    fn negative_cost_is_rejected() {
        let req: ServiceRequest =
            serde_json::from_value(json!({"name": "Refund", "cost": -5})).unwrap();
        assert!(matches!(req.into_fields(), Err(AppError::BadRequest(_))));
    }
}
