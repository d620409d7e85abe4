use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Product;

pub const PENDING_STATUS_DETAIL: &str = "Awaiting payment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

// DB models

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: OrderStatus,
    pub status_detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Price of `quantity` units at the product's current unit price.
pub fn order_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

// Request types

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[validate(range(min = 1, message = "Invalid product id"))]
    pub product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: Option<OrderStatus>,
    #[validate(length(min = 1, max = 255))]
    pub status_detail: Option<String>,
}

// Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub product_name: String,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: PlacedOrder,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderCustomer {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct OrderWithProduct {
    #[serde(flatten)]
    pub order: Order,
    pub product: Option<Product>,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub product: Option<Product>,
    pub user: Option<OrderCustomer>,
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub message: String,
    pub order: AdminOrderView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_unit_price_times_quantity() {
        assert_eq!(order_total(Decimal::from(100), 3), Decimal::from(300));
        assert_eq!(
            order_total(Decimal::new(1999, 2), 4),
            Decimal::new(7996, 2)
        );
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let req = PlaceOrderRequest {
            product_id: 1,
            quantity: 0,
        };
        assert!(req.validate().is_err());

        let req = PlaceOrderRequest {
            product_id: 1,
            quantity: 2,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn place_order_body_uses_camel_case() {
        let req: PlaceOrderRequest =
            serde_json::from_str(r#"{"productId": 7, "quantity": 3}"#).unwrap();
        assert_eq!(req.product_id, 7);
        assert_eq!(req.quantity, 3);
    }

    #[test]
    fn placement_response_carries_numeric_total_and_product_name() {
        let response = PlaceOrderResponse {
            message: "Order and transaction created successfully".to_string(),
            order: PlacedOrder {
                order: Order {
                    id: 1,
                    user_id: 2,
                    product_id: 3,
                    quantity: 3,
                    total_price: Decimal::from(300),
                    city: Some("Rio Claro".to_string()),
                    state: Some("SP".to_string()),
                    status: OrderStatus::Pending,
                    status_detail: Some(PENDING_STATUS_DETAIL.to_string()),
                    created_at: Utc::now(),
                },
                product_name: "Cadeira".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["order"]["totalPrice"].is_number());
        assert_eq!(json["order"]["totalPrice"].as_f64(), Some(300.0));
        assert_eq!(json["order"]["productName"], "Cadeira");
        assert_eq!(json["order"]["status"], "pending");
    }

    #[test]
    fn order_status_wire_names() {
        let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
