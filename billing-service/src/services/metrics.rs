//! Prometheus metrics for billing-service.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_counter_vec, register_histogram_vec, register_int_counter_vec,
    CounterVec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "billing_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Bill writes by operation (create/edit) and resulting status
pub static BILLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Billed grand totals by operation
pub static BILL_AMOUNT_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Error counter for alerting
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    BILLS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billing_bills_total",
                "Total bill writes by operation and payment status"
            ),
            &["operation", "status"]
        )
        .expect("Failed to register BILLS_TOTAL")
    });

    BILL_AMOUNT_TOTAL.get_or_init(|| {
        register_counter_vec!(
            opts!(
                "billing_bill_amount_total",
                "Sum of bill grand totals written"
            ),
            &["operation"]
        )
        .expect("Failed to register BILL_AMOUNT_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("billing_errors_total", "Total errors by type for alerting"),
            &["error_type", "operation"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    let _ = &*DB_QUERY_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> Result<String, anyhow::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record a committed bill write and its grand total.
pub fn record_bill_write(operation: &str, status: &str, grand_total: Decimal) {
    if let Some(counter) = BILLS_TOTAL.get() {
        counter.with_label_values(&[operation, status]).inc();
    }
    if let Some(counter) = BILL_AMOUNT_TOTAL.get() {
        // Counters only move forward; a zero bill adds nothing.
        let amount = grand_total.to_f64().unwrap_or(0.0).max(0.0);
        counter.with_label_values(&[operation]).inc_by(amount);
    }
}

/// Record an error for alerting.
pub fn record_error(error_type: &str, operation: &str) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type, operation]).inc();
    }
}
