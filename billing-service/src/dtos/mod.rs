//! HTTP payloads for billing-service.

pub mod bills;
pub mod catalog;
pub mod coerce;
pub mod inventory;

pub use bills::{
    BillDetailResponse, BillItemRequest, BillItemResponse, BillRequest, BillSummaryResponse,
    BillTotalsResponse, BillWriteResponse, CustomerRequest, InitialPaymentRequest,
    ListBillsQuery, PaymentResponse,
};
pub use catalog::{MessageResponse, ServiceCreatedResponse, ServiceRequest};
pub use inventory::{CreatedResponse, ProductRequest, SupplierRequest};
