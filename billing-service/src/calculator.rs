//! Money and discount arithmetic for bills.
//!
//! Everything here is pure: no I/O, no clock. Values are carried unrounded;
//! only [`round_display`] rounds, and only for presentation.

use crate::models::BillStatus;
use rust_decimal::{Decimal, RoundingStrategy};

/// Which of the two discount views the caller supplied for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountInput {
    None,
    Percent(Decimal),
    Value(Decimal),
}

/// Both views of a line discount, kept numerically consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDiscount {
    pub percent: Decimal,
    pub value: Decimal,
}

/// The inputs of one line needed for bill aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub price_at_sale: Decimal,
    pub quantity: i32,
    pub discount_percent: Decimal,
}

impl LineAmounts {
    pub fn gross(&self) -> Option<Decimal> {
        line_gross(self.price_at_sale, self.quantity)
    }

    pub fn discount_value(&self) -> Option<Decimal> {
        discount_value_from_percent(self.price_at_sale, self.quantity, self.discount_percent)
    }
}

/// Bill-level totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillTotals {
    pub sub_total: Decimal,
    pub total_discount: Decimal,
    pub total_after_discount: Decimal,
    pub gst_amount: Decimal,
    pub grand_total: Decimal,
}

impl BillTotals {
    /// Copy with every figure rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            sub_total: round_display(self.sub_total),
            total_discount: round_display(self.total_discount),
            total_after_discount: round_display(self.total_after_discount),
            gst_amount: round_display(self.gst_amount),
            grand_total: round_display(self.grand_total),
        }
    }
}

/// Every arithmetic step below is checked; `None` means a figure left the
/// range a `Decimal` can hold.
pub fn line_gross(price_at_sale: Decimal, quantity: i32) -> Option<Decimal> {
    price_at_sale.checked_mul(Decimal::from(quantity))
}

/// `price × quantity × percent / 100`
pub fn discount_value_from_percent(
    price_at_sale: Decimal,
    quantity: i32,
    percent: Decimal,
) -> Option<Decimal> {
    line_gross(price_at_sale, quantity)?
        .checked_mul(percent)?
        .checked_div(Decimal::ONE_HUNDRED)
}

/// `value × 100 / (price × quantity)`, or zero when the line is worth nothing.
pub fn discount_percent_from_value(
    price_at_sale: Decimal,
    quantity: i32,
    value: Decimal,
) -> Option<Decimal> {
    let gross = line_gross(price_at_sale, quantity)?;
    if gross.is_zero() {
        return Some(Decimal::ZERO);
    }
    value.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(gross)
}

/// Derive the missing discount view from the one the caller supplied.
pub fn resolve_discount(
    price_at_sale: Decimal,
    quantity: i32,
    input: DiscountInput,
) -> Option<ResolvedDiscount> {
    let resolved = match input {
        DiscountInput::None => ResolvedDiscount {
            percent: Decimal::ZERO,
            value: Decimal::ZERO,
        },
        DiscountInput::Percent(percent) => ResolvedDiscount {
            percent,
            value: discount_value_from_percent(price_at_sale, quantity, percent)?,
        },
        DiscountInput::Value(value) => ResolvedDiscount {
            percent: discount_percent_from_value(price_at_sale, quantity, value)?,
            value,
        },
    };
    Some(resolved)
}

/// GST rates at or below zero contribute no tax.
pub fn effective_gst_rate(gst_rate: Decimal) -> Decimal {
    if gst_rate <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        gst_rate
    }
}

/// Aggregate lines into bill totals with a single bill-wide GST rate.
pub fn bill_totals<'a, I>(lines: I, gst_rate: Decimal) -> Option<BillTotals>
where
    I: IntoIterator<Item = &'a LineAmounts>,
{
    let mut sub_total = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;
    for line in lines {
        sub_total = sub_total.checked_add(line.gross()?)?;
        total_discount = total_discount.checked_add(line.discount_value()?)?;
    }

    let total_after_discount = sub_total.checked_sub(total_discount)?;
    let gst_amount = total_after_discount
        .checked_mul(effective_gst_rate(gst_rate))?
        .checked_div(Decimal::ONE_HUNDRED)?;

    Some(BillTotals {
        sub_total,
        total_discount,
        total_after_discount,
        gst_amount,
        grand_total: total_after_discount.checked_add(gst_amount)?,
    })
}

/// `PAID` iff the payment recorded with the write covers the grand total.
pub fn payment_status(initial_payment: Option<Decimal>, grand_total: Decimal) -> BillStatus {
    match initial_payment {
        Some(amount) if amount >= grand_total => BillStatus::Paid,
        _ => BillStatus::Unpaid,
    }
}

pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
