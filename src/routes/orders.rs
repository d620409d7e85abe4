use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AdminOrderView, OrderEnvelope, OrderFilter, OrderWithProduct, PlaceOrderRequest,
        PlaceOrderResponse, UpdateOrderStatusRequest,
    },
    queries::{order_queries, user_queries},
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    payload.validate()?;
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User or product not found".to_string()))?;

    let order = order_queries::place_order(
        &state.db,
        &user,
        payload.product_id,
        payload.quantity,
        state.stock_policy,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order and transaction created successfully".to_string(),
            order,
        }),
    ))
}

pub async fn user_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<OrderWithProduct>>> {
    let user_id = extract_user_id(&claims)?;
    let orders = order_queries::get_user_orders(&state.db, user_id, filter).await?;

    Ok(Json(orders))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<AdminOrderView>>> {
    let orders = order_queries::get_orders(&state.db, filter).await?;

    Ok(Json(orders))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderEnvelope>> {
    payload.validate()?;

    if payload.status.is_none() && payload.status_detail.is_none() {
        return Err(AppError::BadRequest(
            "Provide status or statusDetail to update".to_string(),
        ));
    }

    let order = order_queries::update_order_status(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    tracing::info!("Order {} status set to {:?}", id, order.order.status);

    Ok(Json(OrderEnvelope {
        message: "Order updated successfully".to_string(),
        order,
    }))
}
