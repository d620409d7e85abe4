use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{RegisterRequest, UserEnvelope, UserRole},
    queries::user_queries::{self, NewUser},
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>)> {
    payload.validate()?;

    if user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(
        &state.db,
        &NewUser {
            client_type: payload.client_type,
            name: &payload.name,
            email: &payload.email,
            password_hash: &password_hash,
            cpf: payload.cpf.as_deref(),
            cnpj: payload.cnpj.as_deref(),
            phone: &payload.phone,
            street: &payload.street,
            number: &payload.number,
            complement: &payload.complement,
            district: &payload.district,
            city: &payload.city,
            state: &payload.state,
            role: UserRole::User,
        },
    )
    .await?;

    tracing::info!("User {} registered", user.id);

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}
