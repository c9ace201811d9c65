//! HTTP handlers for billing-service.

use axum::extract::FromRequest;
use service_core::error::AppError;

pub mod bills;
pub mod health;
pub mod inventory;
pub mod services;

/// `Json` extractor whose rejections render as [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
