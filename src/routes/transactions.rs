use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        DashboardFeed, ReportSummary, TransactionFilter, TransactionRecord, TransactionReport,
        TransactionView,
    },
    queries::transaction_queries,
};

pub async fn report(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<TransactionReport>> {
    let rows = transaction_queries::get_report_rows(&state.db, &filter).await?;
    let data: Vec<TransactionView> = rows.into_iter().map(TransactionView::report).collect();

    Ok(Json(TransactionReport {
        total_records: data.len(),
        generated_at: chrono::Utc::now(),
        summary: ReportSummary::from_views(&data),
        filters_used: filter,
        data,
    }))
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardFeed>> {
    let rows = transaction_queries::get_dashboard_rows(&state.db).await?;

    Ok(Json(DashboardFeed {
        data: rows.into_iter().map(TransactionView::dashboard).collect(),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TransactionRecord>> {
    let record = transaction_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    Ok(Json(record))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Value>> {
    let deleted = transaction_queries::delete_record(&state.db, id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Transaction not found".to_string()));
    }

    tracing::info!("Transaction {} deleted", id);

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
