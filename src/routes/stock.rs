use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateProductRequest, Product, UpdateProductRequest},
    queries::product_queries,
};

pub async fn list_stock(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = product_queries::list_products(&state.db).await?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    payload.validate()?;

    let product = product_queries::create_product(&state.db, &payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    payload.validate()?;

    let product = product_queries::update_product(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    Ok(Json(product))
}
