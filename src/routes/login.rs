use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthUser, LoginRequest, LoginResponse},
    queries::user_queries,
    utils::jwt,
};

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }

    let token = jwt::generate_token(
        &state.auth.jwt_secret,
        state.auth.token_ttl_days,
        user.id,
        user.role,
    )?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: AuthUser::from(&user),
    }))
}
