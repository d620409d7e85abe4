use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateProductionRequest, Production, ProductionWithProduct, UpdateProductionRequest},
    queries::{product_queries, production_queries},
};

pub async fn list_productions(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductionWithProduct>>> {
    let productions = production_queries::list_productions(&state.db).await?;

    Ok(Json(productions))
}

pub async fn create_production(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductionRequest>,
) -> Result<(StatusCode, Json<Production>)> {
    payload.validate()?;

    if product_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Product with id {} not found",
            payload.product_id
        )));
    }

    let production = production_queries::create_production(&state.db, &payload).await?;

    Ok((StatusCode::CREATED, Json(production)))
}

pub async fn update_production(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductionRequest>,
) -> Result<Json<Production>> {
    payload.validate()?;

    let production = production_queries::update_production(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Production plan not found".to_string()))?;

    Ok(Json(production))
}
