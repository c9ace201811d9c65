//! Domain models for billing-service.

mod bill;
mod inventory;
mod payment;
mod service;

pub use bill::{BillItem, BillStatus, BillSummary, Customer, NewBillHeader, NewBillItem};
pub use inventory::{Product, ProductFields, Supplier, SupplierFields};
pub use payment::{NewPayment, Payment, PaymentType};
pub use service::{Service, ServiceFields};
