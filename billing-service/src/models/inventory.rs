//! Product and supplier models for billing-service.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SupplierFields {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Product joined with the name of its supplier, if any.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub supplier_id: Option<i64>,
}
