//! Service catalog handlers.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use crate::dtos::{MessageResponse, ServiceCreatedResponse, ServiceRequest};
use crate::models::Service;
use super::JsonBody;
use crate::startup::AppState;
use service_core::error::AppError;

/// GET /services
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.db.list_services().await?))
}

/// POST /services
pub async fn create_service(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ServiceRequest>,
) -> Result<(StatusCode, Json<ServiceCreatedResponse>), AppError> {
    let fields = req.into_fields()?;
    let service = state.db.create_service(&fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(ServiceCreatedResponse {
            id: service.id,
            name: service.name,
            cost: service.cost,
        }),
    ))
}

/// PUT /services/:id
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<ServiceRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = req.into_fields()?;
    if !state.db.update_service(id, &fields).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Service updated successfully")))
}

/// DELETE /services/:id
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_service(id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Service deleted successfully")))
}

fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Service not found."))
}
