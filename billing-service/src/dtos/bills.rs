//! Bill request and response payloads.

use super::coerce::{lenient_decimal, lenient_id, lenient_text};
use crate::calculator::{discount_value_from_percent, BillTotals};
use crate::models::{BillItem, BillStatus, BillSummary, Customer, Payment};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
}

impl From<CustomerRequest> for Customer {
    fn from(req: CustomerRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
        }
    }
}

/// One selected service on a bill request.
///
/// `discount_value` is only consulted when `discount_percent` is absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillItemRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub service_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price_at_sale: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_value: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitialPaymentRequest {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, rename = "type", alias = "payment_type")]
    pub payment_type: Option<String>,
    /// Accepted from the form; there is nowhere to store it.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full bill state submitted on create and on edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillRequest {
    #[serde(default)]
    pub customer: Option<CustomerRequest>,
    #[serde(default)]
    pub items: Option<Vec<BillItemRequest>>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub gst_rate: Option<Decimal>,
    #[serde(default, rename = "initialPayment", alias = "initial_payment")]
    pub initial_payment: Option<InitialPaymentRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillWriteResponse {
    pub message: String,
    pub bill_id: i64,
    pub total_amount: Decimal,
    pub status: BillStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillSummaryResponse {
    pub id: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub bill_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: BillStatus,
    pub amount_paid: Decimal,
    pub pending_amount: Decimal,
}

impl From<BillSummary> for BillSummaryResponse {
    fn from(bill: BillSummary) -> Self {
        Self {
            id: bill.id,
            customer_name: bill.customer_name,
            customer_phone: bill.customer_phone,
            customer_email: bill.customer_email,
            customer_address: bill.customer_address,
            bill_date: bill.bill_date,
            total_amount: bill.total_amount,
            status: BillStatus::from_string(&bill.status),
            amount_paid: bill.amount_paid,
            pending_amount: bill.pending_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillItemResponse {
    pub id: i64,
    pub service_id: i64,
    /// Current catalog name; absent if the service row is gone.
    pub name: Option<String>,
    pub quantity: i32,
    pub price_at_sale: Decimal,
    pub discount_percent: Decimal,
    pub discount_value: Decimal,
    pub gst_percent: Decimal,
}

impl From<BillItem> for BillItemResponse {
    fn from(item: BillItem) -> Self {
        // Bill totals over the same lines are computed first, so this is in range.
        let discount_value = discount_value_from_percent(
            item.price_at_sale,
            item.quantity,
            item.discount_percent,
        )
        .unwrap_or_default();
        Self {
            id: item.id,
            service_id: item.service_id,
            name: item.service_name,
            quantity: item.quantity,
            price_at_sale: item.price_at_sale,
            discount_percent: item.discount_percent,
            discount_value,
            gst_percent: item.gst_percent,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub amount_paid: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_type: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            amount_paid: payment.amount_paid,
            payment_date: payment.payment_date,
            payment_type: payment.payment_type,
        }
    }
}

/// Printable breakdown, rounded to two places.
#[derive(Debug, Serialize, Deserialize)]
pub struct BillTotalsResponse {
    pub sub_total: Decimal,
    pub total_discount: Decimal,
    pub total_after_discount: Decimal,
    pub gst_amount: Decimal,
    pub grand_total: Decimal,
}

impl From<BillTotals> for BillTotalsResponse {
    fn from(totals: BillTotals) -> Self {
        let totals = totals.rounded();
        Self {
            sub_total: totals.sub_total,
            total_discount: totals.total_discount,
            total_after_discount: totals.total_after_discount,
            gst_amount: totals.gst_amount,
            grand_total: totals.grand_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillDetailResponse {
    #[serde(flatten)]
    pub bill: BillSummaryResponse,
    pub gst_percent: Decimal,
    pub totals: BillTotalsResponse,
    pub items: Vec<BillItemResponse>,
    pub payments: Vec<PaymentResponse>,
}
