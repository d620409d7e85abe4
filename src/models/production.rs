use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "production_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    Planned,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: i32,
    pub product_id: i32,
    pub quantity_planned: i32,
    pub quantity_produced: i32,
    pub status: ProductionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductionRequest {
    #[validate(range(min = 1, message = "Invalid product id"))]
    pub product_id: i32,
    #[validate(range(min = 1, message = "Planned quantity must be at least 1"))]
    pub quantity_planned: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductionRequest {
    pub status: Option<ProductionStatus>,
    #[validate(range(min = 0, message = "Produced quantity cannot be negative"))]
    pub quantity_produced: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ProductionWithProduct {
    #[serde(flatten)]
    pub production: Production,
    pub product: Option<Product>,
}
