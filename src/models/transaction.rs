use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderStatus, Product, Segment, User};

/// Ledger row: a snapshot of an order taken when it was placed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i32,
    pub order_id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub client_name: String,
    pub client_segment: Segment,
    pub product_name: String,
    pub product_category: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionRecord {
    pub order_id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub client_name: String,
    pub client_segment: Segment,
    pub product_name: String,
    pub product_category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl NewTransactionRecord {
    /// `segment` is the client's tier after the order has been applied.
    pub fn snapshot(order: &Order, client: &User, product: &Product, segment: Segment) -> Self {
        Self {
            order_id: order.id,
            user_id: client.id,
            product_id: product.id,
            order_date: order.created_at,
            status: order.status,
            status_detail: order.status_detail.clone(),
            city: order.city.clone(),
            state: order.state.clone(),
            client_name: client.name.clone(),
            client_segment: segment,
            product_name: product.name.clone(),
            product_category: product.category.clone(),
            quantity: order.quantity,
            unit_price: product.price,
            total_price: order.total_price,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region: Option<String>,
    pub product_category: Option<String>,
    pub client_segment: Option<Segment>,
}

/// Brazilian macro-region to state codes. Accepts `centro-oeste` and
/// `centrooeste` alike.
pub fn region_states(region: &str) -> Option<&'static [&'static str]> {
    let key = region.trim().to_lowercase().replace('-', "");
    let states: &'static [&'static str] = match key.as_str() {
        "norte" => &["AC", "AP", "AM", "PA", "RO", "RR", "TO"],
        "nordeste" => &["AL", "BA", "CE", "MA", "PB", "PE", "PI", "RN", "SE"],
        "centrooeste" => &["DF", "GO", "MT", "MS"],
        "sudeste" => &["ES", "MG", "RJ", "SP"],
        "sul" => &["PR", "RS", "SC"],
        _ => return None,
    };
    Some(states)
}

// Report rows

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionReportRow {
    pub transaction_id: i32,
    pub order_id: i32,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub order_status_detail: Option<String>,
    pub customer_id: i32,
    pub customer_name: String,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_segment: Segment,
    pub product_id: i32,
    pub product_name: String,
    pub product_category: String,
    pub product_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportCustomer {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub segment: Segment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProduct {
    pub id: i32,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub transaction_id: i32,
    pub order_id: i32,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    pub customer: ReportCustomer,
    pub product: ReportProduct,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl TransactionView {
    /// Admin report shape: order location and status detail, quantity per row.
    pub fn report(row: TransactionReportRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            order_id: row.order_id,
            date: row.order_date,
            status: row.order_status,
            status_detail: row.order_status_detail,
            customer: ReportCustomer {
                id: row.customer_id,
                name: row.customer_name,
                city: None,
                state: None,
                segment: row.customer_segment,
            },
            product: ReportProduct {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                unit_price: row.product_price,
                quantity: Some(row.quantity),
            },
            total_price: row.total_price,
            city: row.city,
            state: row.state,
        }
    }

    /// Dashboard feed shape: customer location instead of order location.
    pub fn dashboard(row: TransactionReportRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            order_id: row.order_id,
            date: row.order_date,
            status: row.order_status,
            status_detail: None,
            customer: ReportCustomer {
                id: row.customer_id,
                name: row.customer_name,
                city: Some(row.customer_city),
                state: Some(row.customer_state),
                segment: row.customer_segment,
            },
            product: ReportProduct {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                unit_price: row.product_price,
                quantity: None,
            },
            total_price: row.total_price,
            city: None,
            state: None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales_value: Decimal,
    pub total_quantity_sold: i64,
    pub unique_clients: usize,
    pub unique_products: usize,
}

impl ReportSummary {
    pub fn from_views(views: &[TransactionView]) -> Self {
        use std::collections::HashSet;

        let clients: HashSet<i32> = views.iter().map(|v| v.customer.id).collect();
        let products: HashSet<i32> = views.iter().map(|v| v.product.id).collect();

        Self {
            total_sales_value: views.iter().map(|v| v.total_price).sum(),
            total_quantity_sold: views
                .iter()
                .map(|v| i64::from(v.product.quantity.unwrap_or(0)))
                .sum(),
            unique_clients: clients.len(),
            unique_products: products.len(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    pub total_records: usize,
    pub generated_at: DateTime<Utc>,
    pub filters_used: TransactionFilter,
    pub summary: ReportSummary,
    pub data: Vec<TransactionView>,
}

#[derive(Debug, Serialize)]
pub struct DashboardFeed {
    pub data: Vec<TransactionView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientType;
    use crate::models::UserRole;

    fn sample_row(customer_id: i32, product_id: i32, quantity: i32, total: i64) -> TransactionReportRow {
        TransactionReportRow {
            transaction_id: 1,
            order_id: 1,
            order_date: Utc::now(),
            order_status: OrderStatus::Pending,
            order_status_detail: Some("Awaiting payment".to_string()),
            customer_id,
            customer_name: "Cliente".to_string(),
            customer_city: "Campinas".to_string(),
            customer_state: "SP".to_string(),
            customer_segment: Segment::Bronze,
            product_id,
            product_name: "Mesa".to_string(),
            product_category: "Móveis".to_string(),
            product_price: Decimal::from(100),
            quantity,
            total_price: Decimal::from(total),
            city: Some("Campinas".to_string()),
            state: Some("SP".to_string()),
        }
    }

    #[test]
    fn region_lookup_normalizes_names() {
        assert_eq!(region_states("Sul"), Some(&["PR", "RS", "SC"][..]));
        assert_eq!(region_states("centro-oeste"), region_states("centrooeste"));
        assert!(region_states("sudeste").unwrap().contains(&"SP"));
        assert_eq!(region_states("atlantida"), None);
    }

    #[test]
    fn summary_counts_distinct_clients_and_products() {
        let views: Vec<_> = vec![
            sample_row(1, 10, 2, 200),
            sample_row(1, 11, 1, 100),
            sample_row(2, 10, 3, 300),
        ]
        .into_iter()
        .map(TransactionView::report)
        .collect();

        let summary = ReportSummary::from_views(&views);
        assert_eq!(summary.total_sales_value, Decimal::from(600));
        assert_eq!(summary.total_quantity_sold, 6);
        assert_eq!(summary.unique_clients, 2);
        assert_eq!(summary.unique_products, 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalSalesValue"].as_f64(), Some(600.0));
    }

    #[test]
    fn dashboard_view_exposes_customer_location_only() {
        let view = TransactionView::dashboard(sample_row(5, 9, 1, 100));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["customer"]["city"], "Campinas");
        assert!(json.get("city").is_none());
        assert!(json.get("statusDetail").is_none());
        assert!(json["product"].get("quantity").is_none());
        assert!(json["product"]["unitPrice"].is_number());
        assert!(json["totalPrice"].is_number());
    }

    #[test]
    fn snapshot_copies_order_totals() {
        let now = Utc::now();
        let order = Order {
            id: 42,
            user_id: 7,
            product_id: 3,
            quantity: 3,
            total_price: Decimal::from(300),
            city: Some("Rio Claro".to_string()),
            state: Some("SP".to_string()),
            status: OrderStatus::Pending,
            status_detail: Some("Awaiting payment".to_string()),
            created_at: now,
        };
        let client = User {
            id: 7,
            client_type: ClientType::Individual,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "hash".to_string(),
            cpf: Some("12345678901".to_string()),
            cnpj: None,
            phone: "1".to_string(),
            street: "Rua".to_string(),
            number: "1".to_string(),
            complement: "-".to_string(),
            district: "Centro".to_string(),
            city: "Rio Claro".to_string(),
            state: "SP".to_string(),
            role: UserRole::User,
            total_spent: Decimal::from(4900),
            segment: Segment::Bronze,
            created_at: now,
            updated_at: now,
        };
        let product = Product {
            id: 3,
            name: "Cadeira".to_string(),
            category: "Móveis".to_string(),
            price: Decimal::from(100),
            stock: 10,
            image_url: None,
            created_at: now,
            updated_at: now,
        };

        let record = NewTransactionRecord::snapshot(&order, &client, &product, Segment::Silver);
        assert_eq!(record.order_id, 42);
        assert_eq!(record.order_date, now);
        assert_eq!(record.client_segment, Segment::Silver);
        assert_eq!(record.unit_price * Decimal::from(record.quantity), record.total_price);
        assert_eq!(record.product_category, "Móveis");
    }
}
