//! Bill lifecycle handlers.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::builder::{build_edit, build_new, BillAggregate};
use crate::dtos::{
    BillDetailResponse, BillRequest, BillSummaryResponse, BillWriteResponse, ListBillsQuery,
};
use crate::services::{record_bill_write, record_error};
use super::JsonBody;
use crate::startup::AppState;
use service_core::error::AppError;

/// List bills with paid and pending amounts.
///
/// GET /bills?search=
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<Vec<BillSummaryResponse>>, AppError> {
    let bills = state
        .db
        .list_bills(query.search.as_deref())
        .await
        .map_err(|e| failed(e, "list_bills"))?;

    Ok(Json(bills.into_iter().map(Into::into).collect()))
}

/// Fetch one bill with items and payments.
///
/// GET /bills/:id
pub async fn get_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<i64>,
) -> Result<Json<BillDetailResponse>, AppError> {
    let detail = state
        .db
        .get_bill(bill_id)
        .await
        .map_err(|e| failed(e, "get_bill"))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill not found.")))?;

    let payments = state
        .db
        .list_payments(bill_id)
        .await
        .map_err(|e| failed(e, "get_bill"))?;

    Ok(Json(BillDetailResponse {
        bill: detail.summary.into(),
        gst_percent: detail.gst_percent,
        totals: detail.totals.into(),
        items: detail.items.into_iter().map(Into::into).collect(),
        payments: payments.into_iter().map(Into::into).collect(),
    }))
}

/// POST /bills
pub async fn create_bill(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BillRequest>,
) -> Result<(StatusCode, Json<BillWriteResponse>), AppError> {
    let bill = build_new(req, Utc::now()).map_err(|e| failed(e, "create_bill"))?;
    let bill_id = state
        .db
        .create_bill(&bill)
        .await
        .map_err(|e| failed(e, "create_bill"))?;

    Ok((
        StatusCode::CREATED,
        Json(written(&bill, bill_id, "create", "Bill created successfully")),
    ))
}

/// Replace a bill with the resubmitted state.
///
/// PUT /bills/:id
pub async fn update_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<i64>,
    JsonBody(req): JsonBody<BillRequest>,
) -> Result<Json<BillWriteResponse>, AppError> {
    let bill = build_edit(bill_id, req, Utc::now()).map_err(|e| failed(e, "update_bill"))?;
    state
        .db
        .replace_bill(&bill)
        .await
        .map_err(|e| failed(e, "update_bill"))?;

    Ok(Json(written(&bill, bill_id, "edit", "Bill updated successfully")))
}

fn written(bill: &BillAggregate, bill_id: i64, operation: &str, message: &str) -> BillWriteResponse {
    record_bill_write(operation, bill.header.status.as_str(), bill.header.total_amount);
    BillWriteResponse {
        message: message.to_string(),
        bill_id,
        total_amount: bill.header.total_amount,
        status: bill.header.status,
    }
}

fn failed(e: AppError, operation: &str) -> AppError {
    record_error(e.kind(), operation);
    e
}
