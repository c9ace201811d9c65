//! Bill header and line item models for billing-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Point-in-time payment classification of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillStatus {
    Paid,
    Unpaid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "PAID",
            BillStatus::Unpaid => "UNPAID",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "PAID" => BillStatus::Paid,
            _ => BillStatus::Unpaid,
        }
    }
}

/// Customer details captured on the bill header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Bill row joined with its aggregated payments.
///
/// `amount_paid` and `pending_amount` are computed by the query, never
/// read from a stored column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillSummary {
    pub id: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub bill_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: String,
    pub amount_paid: Decimal,
    pub pending_amount: Decimal,
}

/// Line item as stored, with the current service name for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    pub service_id: i64,
    pub service_name: Option<String>,
    pub quantity: i32,
    pub price_at_sale: Decimal,
    pub discount_percent: Decimal,
    pub gst_percent: Decimal,
}

/// Header values to write for a new or replaced bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillHeader {
    pub customer: Customer,
    pub bill_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: BillStatus,
}

/// Line item values to write; `bill_id` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillItem {
    pub service_id: i64,
    pub quantity: i32,
    pub price_at_sale: Decimal,
    pub discount_percent: Decimal,
    pub gst_percent: Decimal,
}
