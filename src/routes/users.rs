use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ProfileResponse, UpdateRoleRequest, UpdateUserRequest, UserEnvelope, UserRole, UserSummary},
    queries::{order_queries, user_queries},
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let orders = order_queries::get_orders_for_profile(&state.db, user.id).await?;

    Ok(Json(ProfileResponse { user, orders }))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>> {
    payload.validate()?;
    let user_id = extract_user_id(&claims)?;

    if let Some(ref email) = payload.email {
        if let Some(existing) = user_queries::find_by_email(&state.db, email).await? {
            if existing.id != user_id {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }
    }

    if user_queries::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let user = user_queries::update_user(&state.db, user_id, &payload).await?;

    Ok(Json(UserEnvelope {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>> {
    let users = user_queries::list_users(&state.db).await?;

    Ok(Json(users))
}

/// The seeded default admin can never be demoted.
pub(crate) fn ensure_role_change_allowed(
    default_admin: Option<&str>,
    email: &str,
    role: UserRole,
) -> Result<()> {
    if default_admin == Some(email) && role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "The default admin role cannot be changed".to_string(),
        ));
    }

    Ok(())
}

pub async fn update_role(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<UserEnvelope>> {
    payload.validate()?;
    ensure_role_change_allowed(state.default_admin_email.as_deref(), &payload.email, payload.role)?;

    let user = user_queries::update_role_by_email(&state.db, &payload.email, payload.role)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!("User {} role set to {}", user.id, user.role.as_str());

    Ok(Json(UserEnvelope {
        message: format!("User updated to {}", user.role.as_str()),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_cannot_be_demoted() {
        let admin = Some("admin@portal.com");
        assert!(matches!(
            ensure_role_change_allowed(admin, "admin@portal.com", UserRole::User),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_role_change_allowed(admin, "admin@portal.com", UserRole::Admin).is_ok());
        assert!(ensure_role_change_allowed(admin, "other@portal.com", UserRole::User).is_ok());
        assert!(ensure_role_change_allowed(None, "admin@portal.com", UserRole::User).is_ok());
    }
}
