use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::AppError,
    models::UserRole,
    queries::user_queries,
    utils::{
        extractors::extract_user_id,
        jwt::{self, Claims},
    },
};

pub const DASHBOARD_KEY_HEADER: &str = "x-api-key";

fn bearer_claims(state: &AppState, req: &Request) -> Result<Claims, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    jwt::verify_token(&state.auth.jwt_secret, token)
}

/// Replaces the role baked into the token with the stored one, so role
/// changes and deleted accounts take effect before the token expires.
async fn refresh_claims(state: &AppState, claims: Claims) -> Result<Claims, AppError> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Claims {
        role: user.role,
        ..claims
    })
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(&state, &req)?;
    let claims = refresh_claims(&state, claims).await?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(&state, &req)?;
    let claims = refresh_claims(&state, claims).await?;

    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Access denied: administrators only".to_string(),
        ));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Guards the external dashboard feed with a static API key.
pub async fn dashboard_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(DASHBOARD_KEY_HEADER)
        .and_then(|header| header.to_str().ok());

    if provided != Some(state.auth.dashboard_api_key.as_str()) {
        return Err(AppError::Unauthorized("Invalid API key".to_string()));
    }

    Ok(next.run(req).await)
}
