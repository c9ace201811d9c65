//! Turns a bill request into the rows to persist.
//!
//! All validation happens here, before the store opens a transaction, so a
//! rejected request never touches the database.

use crate::calculator::{
    bill_totals, effective_gst_rate, line_gross, payment_status, resolve_discount, BillTotals,
    DiscountInput, LineAmounts,
};
use crate::dtos::{BillItemRequest, BillRequest, InitialPaymentRequest};
use crate::models::{Customer, NewBillHeader, NewBillItem, NewPayment, PaymentType};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use service_core::error::AppError;

/// A validated bill ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BillAggregate {
    pub header: NewBillHeader,
    pub items: Vec<NewBillItem>,
    pub payment: Option<NewPayment>,
    pub totals: BillTotals,
    /// Id of the bill whose rows this aggregate replaces.
    pub replace: Option<i64>,
}

impl BillAggregate {
    pub fn is_edit(&self) -> bool {
        self.replace.is_some()
    }
}

pub fn build_new(request: BillRequest, now: DateTime<Utc>) -> Result<BillAggregate, AppError> {
    build(request, now, None)
}

pub fn build_edit(
    bill_id: i64,
    request: BillRequest,
    now: DateTime<Utc>,
) -> Result<BillAggregate, AppError> {
    build(request, now, Some(bill_id))
}

fn build(
    request: BillRequest,
    now: DateTime<Utc>,
    replace: Option<i64>,
) -> Result<BillAggregate, AppError> {
    let requested = request.items.unwrap_or_default();
    if requested.is_empty() {
        return Err(bad_request("Bill must include at least one item."));
    }

    let gst_rate = effective_gst_rate(request.gst_rate.unwrap_or(Decimal::ZERO));

    let items = requested
        .iter()
        .enumerate()
        .map(|(index, item)| build_item(index, item, gst_rate))
        .collect::<Result<Vec<_>, _>>()?;

    let lines: Vec<LineAmounts> = items
        .iter()
        .map(|item| LineAmounts {
            price_at_sale: item.price_at_sale,
            quantity: item.quantity,
            discount_percent: item.discount_percent,
        })
        .collect();
    let totals = bill_totals(&lines, gst_rate)
        .ok_or_else(|| bad_request("Bill total is out of range."))?;

    let payment = request
        .initial_payment
        .and_then(|p| build_payment(p, now));
    let status = payment_status(payment.as_ref().map(|p| p.amount_paid), totals.grand_total);

    let header = NewBillHeader {
        customer: request.customer.map(Customer::from).unwrap_or_default(),
        bill_date: now,
        total_amount: totals.grand_total,
        status,
    };

    Ok(BillAggregate {
        header,
        items,
        payment,
        totals,
        replace,
    })
}

fn build_item(
    index: usize,
    item: &BillItemRequest,
    gst_rate: Decimal,
) -> Result<NewBillItem, AppError> {
    let position = index + 1;

    let service_id = item
        .service_id
        .ok_or_else(|| bad_request(format!("Item {position} is missing a service.")))?;

    let price_at_sale = item.price_at_sale.unwrap_or(Decimal::ZERO);
    if price_at_sale < Decimal::ZERO {
        return Err(bad_request(format!("Item {position} has a negative price.")));
    }

    let quantity = quantity(position, item.quantity)?;

    let input = match (item.discount_percent, item.discount_value) {
        (Some(percent), _) => DiscountInput::Percent(percent),
        (None, Some(value)) => DiscountInput::Value(value),
        (None, None) => DiscountInput::None,
    };
    if let DiscountInput::Percent(d) | DiscountInput::Value(d) = input {
        if d < Decimal::ZERO {
            return Err(bad_request(format!(
                "Item {position} has a negative discount."
            )));
        }
    }

    let out_of_range = || bad_request(format!("Item {position} amount is out of range."));
    let gross = line_gross(price_at_sale, quantity).ok_or_else(out_of_range)?;
    match input {
        DiscountInput::Percent(percent) if percent > Decimal::ONE_HUNDRED => {
            return Err(bad_request(format!(
                "Item {position} discount cannot exceed 100%."
            )));
        }
        DiscountInput::Value(value) if value > gross => {
            return Err(bad_request(format!(
                "Item {position} discount cannot exceed the item amount."
            )));
        }
        _ => {}
    }
    let discount = resolve_discount(price_at_sale, quantity, input).ok_or_else(out_of_range)?;

    Ok(NewBillItem {
        service_id,
        quantity,
        price_at_sale,
        discount_percent: discount.percent,
        gst_percent: gst_rate,
    })
}

fn quantity(position: usize, raw: Option<Decimal>) -> Result<i32, AppError> {
    let Some(qty) = raw else {
        return Ok(1);
    };
    if qty < Decimal::ONE || !qty.fract().is_zero() {
        return Err(bad_request(format!(
            "Item {position} quantity must be a whole number of at least 1."
        )));
    }
    qty.to_i32()
        .ok_or_else(|| bad_request(format!("Item {position} quantity is out of range.")))
}

/// Zero and negative amounts record nothing.
fn build_payment(payment: InitialPaymentRequest, now: DateTime<Utc>) -> Option<NewPayment> {
    let amount = payment.amount.filter(|a| *a > Decimal::ZERO)?;
    Some(NewPayment {
        amount_paid: amount,
        payment_date: now,
        payment_type: payment
            .payment_type
            .as_deref()
            .map(PaymentType::from_string)
            .unwrap_or(PaymentType::Unknown),
    })
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(message.into()))
}
