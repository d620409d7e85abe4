use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::Indicators, queries::indicator_queries};

pub async fn get_indicators(State(state): State<AppState>) -> Result<Json<Indicators>> {
    let indicators = indicator_queries::get_indicators(&state.db).await?;

    Ok(Json(indicators))
}
