//! Catalog persistence: services, suppliers and products.

use super::database::Database;
use crate::models::{Product, ProductFields, Service, ServiceFields, Supplier, SupplierFields};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};

impl Database {
    // =========================================================================
    // Service Operations
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_services"])
            .start_timer();

        let services = sqlx::query_as::<_, Service>(
            "SELECT id, name, category, cost, description FROM services ORDER BY name, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list services: {}", e)))?;

        timer.observe_duration();
        Ok(services)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_service(&self, input: &ServiceFields) -> Result<Service, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_service"])
            .start_timer();

        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (name, category, cost, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, category, cost, description
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.cost)
        .bind(&input.description)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Service '{}' already exists", input.name))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create service: {}", e)),
        })?;

        timer.observe_duration();
        info!(service_id = service.id, name = %service.name, "Service created");

        Ok(service)
    }

    /// Returns false when no service has the id.
    #[instrument(skip(self, input))]
    pub async fn update_service(&self, id: i64, input: &ServiceFields) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_service"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE services
            SET name = $2, category = $3, cost = $4, description = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.cost)
        .bind(&input.description)
        .execute(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Service '{}' already exists", input.name))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update service: {}", e)),
        })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no service has the id. A service still referenced
    /// by a bill item is a conflict.
    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_service"])
            .start_timer();

        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Service is used on existing bills and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete service: {}", e)),
            })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Supplier Operations
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_suppliers"])
            .start_timer();

        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, phone, email FROM suppliers ORDER BY name, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list suppliers: {}", e)))?;

        timer.observe_duration();
        Ok(suppliers)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_supplier(&self, input: &SupplierFields) -> Result<Supplier, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_supplier"])
            .start_timer();

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, phone, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, email
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create supplier: {}", e)))?;

        timer.observe_duration();
        info!(supplier_id = supplier.id, "Supplier created");

        Ok(supplier)
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(&self, id: i64, input: &SupplierFields) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_supplier"])
            .start_timer();

        let result = sqlx::query("UPDATE suppliers SET name = $2, phone = $3, email = $4 WHERE id = $1")
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update supplier: {}", e))
            })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    /// Products of a deleted supplier keep their rows with no supplier.
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_supplier"])
            .start_timer();

        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete supplier: {}", e))
            })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Product Operations
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_products"])
            .start_timer();

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.category, p.stock_quantity, p.supplier_id,
                   s.name AS supplier_name
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.name, p.id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))?;

        timer.observe_duration();
        Ok(products)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductFields) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_product"])
            .start_timer();

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, category, stock_quantity, supplier_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.stock_quantity)
        .bind(input.supplier_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| product_write_error("create", &input.name, e))?;

        timer.observe_duration();
        info!(product_id = id, "Product created");

        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i64, input: &ProductFields) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_product"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, category = $3, stock_quantity = $4, supplier_id = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.stock_quantity)
        .bind(input.supplier_id)
        .execute(self.pool())
        .await
        .map_err(|e| product_write_error("update", &input.name, e))?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_product"])
            .start_timer();

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete product: {}", e))
            })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }
}

fn product_write_error(action: &str, name: &str, e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(anyhow::anyhow!("Product '{}' already exists", name))
        }
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest(anyhow::anyhow!("Supplier does not exist"))
        }
        _ => AppError::DatabaseError(anyhow::anyhow!("Failed to {} product: {}", action, e)),
    }
}
