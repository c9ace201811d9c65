//! Product and supplier payloads.

use super::coerce::{lenient_decimal, lenient_id, lenient_text};
use crate::models::{ProductFields, SupplierFields};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SupplierRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(required(message = "Supplier name is required."))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
}

impl SupplierRequest {
    pub fn into_fields(self) -> Result<SupplierFields, AppError> {
        self.validate()?;
        let name = self.name.ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Supplier name is required."))
        })?;
        Ok(SupplierFields {
            name,
            phone: self.phone,
            email: self.email,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    #[validate(required(message = "Product name is required."))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub stock_quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub supplier_id: Option<i64>,
}

impl ProductRequest {
    pub fn into_fields(self) -> Result<ProductFields, AppError> {
        self.validate()?;
        let name = self.name.ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Product name is required."))
        })?;

        let stock_quantity = match self.stock_quantity {
            None => 0,
            Some(qty) if qty.fract().is_zero() && qty >= Decimal::ZERO => {
                qty.to_i32().ok_or_else(|| {
                    AppError::BadRequest(anyhow::anyhow!("Stock quantity is out of range."))
                })?
            }
            Some(_) => {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Stock quantity must be a non-negative whole number."
                )))
            }
        };

        Ok(ProductFields {
            name,
            category: self.category,
            stock_quantity,
            supplier_id: self.supplier_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn supplier_requires_name() {
        let req: SupplierRequest = serde_json::from_value(json!({"phone": "555"})).unwrap();
        assert!(req.into_fields().is_err());
    }

    #[test]
    fn product_stock_defaults_to_zero() {
        let req: ProductRequest =
            serde_json::from_value(json!({"name": "Shampoo", "supplier_id": "3"})).unwrap();
        let fields = req.into_fields().unwrap();
        assert_eq!(fields.stock_quantity, 0);
        assert_eq!(fields.supplier_id, Some(3));
    }

    #[test]
    fn fractional_stock_is_rejected() {
        let req: ProductRequest =
            serde_json::from_value(json!({"name": "Wax", "stock_quantity": 2.5})).unwrap();
        assert!(matches!(req.into_fields(), Err(AppError::BadRequest(_))));
    }
}
