//! billing-service: itemized bills, payments and the service catalog.

pub mod builder;
pub mod calculator;
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
