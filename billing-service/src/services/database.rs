//! Database service for billing-service.

use crate::builder::BillAggregate;
use crate::calculator::{bill_totals, BillTotals, LineAmounts};
use crate::models::{BillItem, BillSummary, Payment};
use crate::services::metrics::DB_QUERY_DURATION;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

const BILL_SUMMARY_SELECT: &str = r#"
    SELECT b.id, b.customer_name, b.customer_phone, b.customer_email, b.customer_address,
           b.bill_date, b.total_amount, b.status,
           COALESCE(p.amount_paid, 0) AS amount_paid,
           b.total_amount - COALESCE(p.amount_paid, 0) AS pending_amount
    FROM bills b
    LEFT JOIN (
        SELECT bill_id, SUM(amount_paid) AS amount_paid
        FROM payments
        GROUP BY bill_id
    ) p ON p.bill_id = b.id
"#;

/// A stored bill with its items, re-derived from the rows.
#[derive(Debug, Clone)]
pub struct BillDetail {
    pub summary: BillSummary,
    /// Rate shared by every item; zero for a bill with no items.
    pub gst_percent: Decimal,
    pub totals: BillTotals,
    pub items: Vec<BillItem>,
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "billing-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // =========================================================================
    // Bill Writes
    // =========================================================================

    /// Insert a bill with its items and optional payment in one transaction.
    #[instrument(skip(self, bill), fields(items = bill.items.len(), total = %bill.header.total_amount))]
    pub async fn create_bill(&self, bill: &BillAggregate) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_bill"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::TransactionFailed(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let bill_id = match insert_bill(&mut *tx, bill).await {
            Ok(id) => id,
            Err(e) => {
                tx.rollback().await.ok();
                warn!(error = %e, "Bill creation rolled back");
                return Err(e);
            }
        };

        tx.commit().await.map_err(|e| {
            AppError::TransactionFailed(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        info!(
            bill_id = bill_id,
            status = bill.header.status.as_str(),
            paid = bill.payment.is_some(),
            "Bill created"
        );

        Ok(bill_id)
    }

    /// Overwrite an existing bill's header and items, and its payments when
    /// the aggregate carries a new one.
    #[instrument(skip(self, bill), fields(bill_id = ?bill.replace, items = bill.items.len()))]
    pub async fn replace_bill(&self, bill: &BillAggregate) -> Result<i64, AppError> {
        let bill_id = bill.replace.ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Bill aggregate has no target id"))
        })?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["replace_bill"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::TransactionFailed(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        if let Err(e) = overwrite_bill(&mut *tx, bill_id, bill).await {
            tx.rollback().await.ok();
            warn!(bill_id = bill_id, error = %e, "Bill edit rolled back");
            return Err(e);
        }

        tx.commit().await.map_err(|e| {
            AppError::TransactionFailed(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        info!(
            bill_id = bill_id,
            status = bill.header.status.as_str(),
            payments_replaced = bill.payment.is_some(),
            "Bill replaced"
        );

        Ok(bill_id)
    }

    // =========================================================================
    // Bill Reads
    // =========================================================================

    /// List bills newest first, optionally filtered by customer name.
    #[instrument(skip(self))]
    pub async fn list_bills(&self, search: Option<&str>) -> Result<Vec<BillSummary>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_bills"])
            .start_timer();

        let query = format!(
            "{BILL_SUMMARY_SELECT} WHERE ($1::TEXT IS NULL OR b.customer_name ILIKE $1 ESCAPE '\\') \
             ORDER BY b.bill_date DESC, b.id DESC"
        );
        let bills = sqlx::query_as::<_, BillSummary>(&query)
            .bind(search.and_then(like_pattern))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list bills: {}", e)))?;

        timer.observe_duration();
        Ok(bills)
    }

    /// Fetch one bill with its items.
    #[instrument(skip(self))]
    pub async fn get_bill(&self, bill_id: i64) -> Result<Option<BillDetail>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_bill"])
            .start_timer();

        let query = format!("{BILL_SUMMARY_SELECT} WHERE b.id = $1");
        let summary = sqlx::query_as::<_, BillSummary>(&query)
            .bind(bill_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get bill: {}", e)))?;

        let Some(summary) = summary else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, BillItem>(
            r#"
            SELECT bi.id, bi.bill_id, bi.service_id, s.name AS service_name, bi.quantity,
                   bi.price_at_sale, bi.discount_percent, bi.gst_percent
            FROM bill_items bi
            LEFT JOIN services s ON s.id = bi.service_id
            WHERE bi.bill_id = $1
            ORDER BY bi.id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get bill items: {}", e)))?;

        timer.observe_duration();

        let gst_percent = items
            .first()
            .map(|item| item.gst_percent)
            .unwrap_or(Decimal::ZERO);
        let lines: Vec<LineAmounts> = items
            .iter()
            .map(|item| LineAmounts {
                price_at_sale: item.price_at_sale,
                quantity: item.quantity,
                discount_percent: item.discount_percent,
            })
            .collect();
        let totals = bill_totals(&lines, gst_percent).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Stored bill {} totals are out of range", bill_id))
        })?;

        Ok(Some(BillDetail {
            summary,
            gst_percent,
            totals,
            items,
        }))
    }

    /// Payments recorded against a bill, oldest first.
    #[instrument(skip(self))]
    pub async fn list_payments(&self, bill_id: i64) -> Result<Vec<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_payments"])
            .start_timer();

        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, bill_id, amount_paid, payment_date, payment_type
            FROM payments
            WHERE bill_id = $1
            ORDER BY payment_date, id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list payments: {}", e)))?;

        timer.observe_duration();
        Ok(payments)
    }
}

async fn insert_bill(conn: &mut PgConnection, bill: &BillAggregate) -> Result<i64, AppError> {
    let header = &bill.header;
    let bill_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO bills (customer_name, customer_phone, customer_email, customer_address, bill_date, total_amount, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&header.customer.name)
    .bind(&header.customer.phone)
    .bind(&header.customer.email)
    .bind(&header.customer.address)
    .bind(header.bill_date)
    .bind(header.total_amount)
    .bind(header.status.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| tx_failed("insert bill", e))?;

    insert_children(conn, bill_id, bill).await?;
    Ok(bill_id)
}

async fn overwrite_bill(
    conn: &mut PgConnection,
    bill_id: i64,
    bill: &BillAggregate,
) -> Result<(), AppError> {
    let header = &bill.header;
    let updated = sqlx::query(
        r#"
        UPDATE bills
        SET customer_name = $2, customer_phone = $3, customer_email = $4, customer_address = $5,
            bill_date = $6, total_amount = $7, status = $8
        WHERE id = $1
        "#,
    )
    .bind(bill_id)
    .bind(&header.customer.name)
    .bind(&header.customer.phone)
    .bind(&header.customer.email)
    .bind(&header.customer.address)
    .bind(header.bill_date)
    .bind(header.total_amount)
    .bind(header.status.as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| tx_failed("update bill", e))?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Bill not found.")));
    }

    sqlx::query("DELETE FROM bill_items WHERE bill_id = $1")
        .bind(bill_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| tx_failed("delete bill items", e))?;

    if bill.payment.is_some() {
        sqlx::query("DELETE FROM payments WHERE bill_id = $1")
            .bind(bill_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| tx_failed("delete payments", e))?;
    }

    insert_children(conn, bill_id, bill).await
}

async fn insert_children(
    conn: &mut PgConnection,
    bill_id: i64,
    bill: &BillAggregate,
) -> Result<(), AppError> {
    for item in &bill.items {
        sqlx::query(
            r#"
            INSERT INTO bill_items (bill_id, service_id, quantity, discount_percent, gst_percent, price_at_sale)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(bill_id)
        .bind(item.service_id)
        .bind(item.quantity)
        .bind(item.discount_percent)
        .bind(item.gst_percent)
        .bind(item.price_at_sale)
        .execute(&mut *conn)
        .await
        .map_err(|e| tx_failed("insert bill item", e))?;
    }

    if let Some(payment) = &bill.payment {
        sqlx::query(
            r#"
            INSERT INTO payments (bill_id, amount_paid, payment_date, payment_type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(bill_id)
        .bind(payment.amount_paid)
        .bind(payment.payment_date)
        .bind(payment.payment_type.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| tx_failed("insert payment", e))?;
    }

    Ok(())
}

fn tx_failed(step: &str, e: sqlx::Error) -> AppError {
    AppError::TransactionFailed(anyhow::anyhow!("Failed to {}: {}", step, e))
}

/// Build a case-insensitive substring pattern, treating LIKE wildcards in
/// the search text literally. Blank input means no filter.
pub fn like_pattern(search: &str) -> Option<String> {
    let search = search.trim();
    if search.is_empty() {
        return None;
    }
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_search() {
        assert_eq!(like_pattern("asha"), Some("%asha%".to_string()));
        assert_eq!(like_pattern("  Ravi K "), Some("%Ravi K%".to_string()));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), Some(r"%50\%\_off%".to_string()));
        assert_eq!(like_pattern(r"a\b"), Some(r"%a\\b%".to_string()));
    }

    #[test]
    fn blank_search_is_no_filter() {
        assert_eq!(like_pattern(""), None);
        assert_eq!(like_pattern("   "), None);
    }
}
