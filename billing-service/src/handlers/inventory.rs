//! Supplier and product handlers under `/inventory`.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use crate::dtos::{CreatedResponse, MessageResponse, ProductRequest, SupplierRequest};
use crate::models::{Product, Supplier};
use super::JsonBody;
use crate::startup::AppState;
use service_core::error::AppError;

// ============================================================================
// Suppliers
// ============================================================================

pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    Ok(Json(state.db.list_suppliers().await?))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SupplierRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let fields = req.into_fields()?;
    let supplier = state.db.create_supplier(&fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: supplier.id,
            name: supplier.name,
        }),
    ))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<SupplierRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = req.into_fields()?;
    if !state.db.update_supplier(id, &fields).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Supplier not found.")));
    }
    Ok(Json(MessageResponse::new("Supplier updated successfully")))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_supplier(id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Supplier not found.")));
    }
    Ok(Json(MessageResponse::new("Supplier deleted successfully")))
}

// ============================================================================
// Products
// ============================================================================

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.db.list_products().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let fields = req.into_fields()?;
    let id = state.db.create_product(&fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            name: fields.name,
        }),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = req.into_fields()?;
    if !state.db.update_product(id, &fields).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Product not found.")));
    }
    Ok(Json(MessageResponse::new("Product updated successfully")))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_product(id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Product not found.")));
    }
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
