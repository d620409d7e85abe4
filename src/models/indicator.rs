use serde::Serialize;

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub total_sales: i64,
    pub total_open_tickets: i64,
    pub avg_stock: f64,
}
