//! Services module for billing-service.

pub mod catalog;
pub mod database;
pub mod metrics;

pub use database::{BillDetail, Database};
pub use metrics::{get_metrics, init_metrics, record_bill_write, record_error};
