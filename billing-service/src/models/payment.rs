//! Payment model for billing-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How a payment was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Unknown,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Upi => "UPI",
            PaymentType::Card => "Card",
            PaymentType::Unknown => "Unknown",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => PaymentType::Cash,
            "upi" => PaymentType::Upi,
            "card" => PaymentType::Card,
            _ => PaymentType::Unknown,
        }
    }
}

/// Recorded payment against a bill.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub bill_id: i64,
    pub amount_paid: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_type: String,
}

/// Payment to record alongside a bill write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub amount_paid: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_type: PaymentType,
}
