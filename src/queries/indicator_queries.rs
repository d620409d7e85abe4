use sqlx::PgPool;

use crate::{error::Result, models::Indicators};

pub async fn get_indicators(pool: &PgPool) -> Result<Indicators> {
    let indicators = sqlx::query_as::<_, Indicators>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM orders) AS total_sales,
            (SELECT COUNT(*) FROM support_tickets WHERE status = 'open') AS total_open_tickets,
            (SELECT COALESCE(AVG(stock), 0)::FLOAT8 FROM products) AS avg_stock
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(indicators)
}
