//! Catalog service model for billing-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Billable service offered by the business.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub cost: Decimal,
    pub description: Option<String>,
}

/// Field values for creating or replacing a service.
#[derive(Debug, Clone)]
pub struct ServiceFields {
    pub name: String,
    pub category: Option<String>,
    pub cost: Decimal,
    pub description: Option<String>,
}
