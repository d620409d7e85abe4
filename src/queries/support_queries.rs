use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{
        AdminTicketView, MessageSender, ProductSummary, SupportTicket, TicketMessage,
        TicketStatus, TicketWithProduct,
    },
    queries::product_queries,
};

const UNKNOWN_USER: &str = "Unknown";

pub async fn find_ticket(pool: &PgPool, id: i32) -> Result<Option<SupportTicket>> {
    let ticket = sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(ticket)
}

pub async fn get_user_tickets(pool: &PgPool, user_id: i32) -> Result<Vec<TicketWithProduct>> {
    let tickets = sqlx::query_as::<_, SupportTicket>(
        "SELECT * FROM support_tickets WHERE user_id = $1 ORDER BY opened_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let product_ids: Vec<i32> = tickets.iter().map(|t| t.product_id).collect();
    let products = product_queries::find_by_ids(pool, &product_ids).await?;

    Ok(tickets
        .into_iter()
        .map(|ticket| {
            let product = products.get(&ticket.product_id).cloned();
            TicketWithProduct { ticket, product }
        })
        .collect())
}

pub async fn get_all_tickets(pool: &PgPool) -> Result<Vec<AdminTicketView>> {
    let tickets =
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets ORDER BY opened_at DESC")
            .fetch_all(pool)
            .await?;

    let user_ids: Vec<i32> = tickets.iter().map(|t| t.user_id).collect();
    let product_ids: Vec<i32> = tickets.iter().map(|t| t.product_id).collect();

    let names: HashMap<i32, String> =
        sqlx::query_as::<_, (i32, String)>("SELECT id, name FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect();

    let products: HashMap<i32, ProductSummary> = sqlx::query_as::<_, ProductSummary>(
        "SELECT id, name, category FROM products WHERE id = ANY($1)",
    )
    .bind(&product_ids)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

    Ok(tickets
        .into_iter()
        .map(|ticket| AdminTicketView {
            user_name: names
                .get(&ticket.user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            product: products.get(&ticket.product_id).cloned(),
            ticket,
        })
        .collect())
}

pub async fn create_ticket(
    pool: &PgPool,
    user_id: i32,
    product_id: i32,
    description: &str,
) -> Result<SupportTicket> {
    let ticket = sqlx::query_as::<_, SupportTicket>(
        "INSERT INTO support_tickets (user_id, product_id, description, status)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(description)
    .bind(TicketStatus::Open)
    .fetch_one(pool)
    .await?;

    Ok(ticket)
}

pub async fn update_ticket(
    pool: &PgPool,
    id: i32,
    status: Option<TicketStatus>,
    closed_at: Option<DateTime<Utc>>,
) -> Result<Option<SupportTicket>> {
    let ticket = sqlx::query_as::<_, SupportTicket>(
        "UPDATE support_tickets
         SET status = COALESCE($1, status), closed_at = COALESCE($2, closed_at)
         WHERE id = $3
         RETURNING *",
    )
    .bind(status)
    .bind(closed_at)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(ticket)
}

pub async fn create_message(
    pool: &PgPool,
    ticket_id: i32,
    sender: MessageSender,
    content: &str,
) -> Result<TicketMessage> {
    let message = sqlx::query_as::<_, TicketMessage>(
        "INSERT INTO ticket_messages (ticket_id, sender, content) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(ticket_id)
    .bind(sender)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

pub async fn get_messages(pool: &PgPool, ticket_id: i32) -> Result<Vec<TicketMessage>> {
    let messages = sqlx::query_as::<_, TicketMessage>(
        "SELECT * FROM ticket_messages WHERE ticket_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(ticket_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
