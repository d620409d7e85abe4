use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Product, ProductSummary, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Admin,
}

impl From<UserRole> for MessageSender {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => MessageSender::Admin,
            UserRole::User => MessageSender::User,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub description: String,
    pub status: TicketStatus,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: i32,
    pub ticket_id: i32,
    pub sender: MessageSender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Message cannot be empty".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[validate(range(min = 1, message = "Invalid product id"))]
    pub product_id: i32,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub status: Option<TicketStatus>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl UpdateTicketRequest {
    /// Closing a ticket without an explicit timestamp stamps it with `now`.
    pub fn resolved_closed_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match (self.closed_at, self.status) {
            (Some(at), _) => Some(at),
            (None, Some(TicketStatus::Closed)) => Some(now),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TicketWithProduct {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub product: Option<Product>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTicketView {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub user_name: String,
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: TicketMessage,
}
