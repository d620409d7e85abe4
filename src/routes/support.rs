use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AdminTicketView, CreateMessageRequest, CreateTicketRequest, MessageEnvelope,
        MessageSender, SupportTicket, TicketMessage, TicketWithProduct, UpdateTicketRequest,
    },
    queries::{product_queries, support_queries},
    utils::{
        extractors::{ensure_owner_or_admin, extract_user_id},
        jwt::Claims,
    },
};

async fn load_ticket(state: &AppState, id: i32) -> Result<SupportTicket> {
    support_queries::find_ticket(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))
}

pub async fn user_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<TicketWithProduct>>> {
    let user_id = extract_user_id(&claims)?;
    let tickets = support_queries::get_user_tickets(&state.db, user_id).await?;

    Ok(Json(tickets))
}

pub async fn all_tickets(State(state): State<AppState>) -> Result<Json<Vec<AdminTicketView>>> {
    let tickets = support_queries::get_all_tickets(&state.db).await?;

    Ok(Json(tickets))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>)> {
    payload.validate()?;
    let user_id = extract_user_id(&claims)?;

    if product_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Product with id {} not found",
            payload.product_id
        )));
    }

    let ticket = support_queries::create_ticket(
        &state.db,
        user_id,
        payload.product_id,
        payload.description.trim(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTicketRequest>,
) -> Result<Json<SupportTicket>> {
    let closed_at = payload.resolved_closed_at(chrono::Utc::now());

    let ticket = support_queries::update_ticket(&state.db, id, payload.status, closed_at)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ticket))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageEnvelope>)> {
    payload.validate()?;

    let ticket = load_ticket(&state, id).await?;
    ensure_owner_or_admin(&claims, ticket.user_id)?;

    let message = support_queries::create_message(
        &state.db,
        ticket.id,
        MessageSender::from(claims.role),
        payload.content.trim(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(MessageEnvelope { message })))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<TicketMessage>>> {
    let ticket = load_ticket(&state, id).await?;
    ensure_owner_or_admin(&claims, ticket.user_id)?;

    let messages = support_queries::get_messages(&state.db, ticket.id).await?;

    Ok(Json(messages))
}
