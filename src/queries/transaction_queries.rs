use sqlx::{PgPool, Postgres, QueryBuilder, postgres::PgExecutor};

use crate::{
    error::Result,
    models::{NewTransactionRecord, TransactionFilter, TransactionRecord, TransactionReportRow, region_states},
    queries::push_date_range,
};

const REPORT_SELECT: &str = r#"
    SELECT
        t.id AS transaction_id,
        o.id AS order_id,
        o.created_at AS order_date,
        o.status AS order_status,
        o.status_detail AS order_status_detail,
        u.id AS customer_id,
        u.name AS customer_name,
        u.city AS customer_city,
        u.state AS customer_state,
        u.segment AS customer_segment,
        p.id AS product_id,
        p.name AS product_name,
        p.category AS product_category,
        p.price AS product_price,
        t.quantity,
        t.total_price,
        t.city,
        t.state
    FROM transactions t
    JOIN orders o ON o.id = t.order_id
    JOIN users u ON u.id = t.user_id
    JOIN products p ON p.id = t.product_id
    WHERE 1=1"#;

pub async fn insert_record<'e, E: PgExecutor<'e>>(
    executor: E,
    record: &NewTransactionRecord,
) -> Result<TransactionRecord> {
    let inserted = sqlx::query_as::<_, TransactionRecord>(
        r#"
        INSERT INTO transactions (
            order_id, user_id, product_id, order_date, status, status_detail,
            city, state, client_name, client_segment, product_name,
            product_category, quantity, unit_price, total_price
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(record.order_id)
    .bind(record.user_id)
    .bind(record.product_id)
    .bind(record.order_date)
    .bind(record.status)
    .bind(&record.status_detail)
    .bind(&record.city)
    .bind(&record.state)
    .bind(&record.client_name)
    .bind(record.client_segment)
    .bind(&record.product_name)
    .bind(&record.product_category)
    .bind(record.quantity)
    .bind(record.unit_price)
    .bind(record.total_price)
    .fetch_one(executor)
    .await?;

    Ok(inserted)
}

pub(crate) fn build_report_query(filter: &TransactionFilter) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(REPORT_SELECT);

    push_date_range(&mut query, "o.created_at", filter.start_date, filter.end_date);

    // unknown regions are ignored rather than rejected
    if let Some(states) = filter.region.as_deref().and_then(region_states) {
        query.push(" AND t.state = ANY(");
        query.push_bind(states.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        query.push(")");
    }

    if let Some(ref category) = filter.product_category {
        query.push(" AND p.category ILIKE ");
        query.push_bind(format!("%{}%", category));
    }

    if let Some(segment) = filter.client_segment {
        query.push(" AND u.segment = ");
        query.push_bind(segment);
    }

    query.push(" ORDER BY t.id DESC");
    query
}

pub async fn get_report_rows(
    pool: &PgPool,
    filter: &TransactionFilter,
) -> Result<Vec<TransactionReportRow>> {
    let rows = build_report_query(filter)
        .build_query_as::<TransactionReportRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn get_dashboard_rows(pool: &PgPool) -> Result<Vec<TransactionReportRow>> {
    get_report_rows(pool, &TransactionFilter::default()).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<TransactionRecord>> {
    let record = sqlx::query_as::<_, TransactionRecord>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(record)
}

pub async fn delete_record(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;

    #[test]
    fn report_without_filters_only_orders() {
        let query = build_report_query(&TransactionFilter::default());
        assert!(query.sql().ends_with("WHERE 1=1 ORDER BY t.id DESC"));
    }

    #[test]
    fn report_filters_bind_in_order() {
        let filter = TransactionFilter {
            region: Some("Sul".to_string()),
            product_category: Some("mov".to_string()),
            client_segment: Some(Segment::Gold),
            ..Default::default()
        };
        let query = build_report_query(&filter);
        let sql = query.sql();
        assert!(sql.contains("AND t.state = ANY($1)"));
        assert!(sql.contains("AND p.category ILIKE $2"));
        assert!(sql.contains("AND u.segment = $3"));
    }

    #[test]
    fn unknown_region_is_ignored() {
        let filter = TransactionFilter {
            region: Some("nowhere".to_string()),
            ..Default::default()
        };
        assert!(!build_report_query(&filter).sql().contains("t.state"));
    }
}
