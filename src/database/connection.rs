use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    config::{AdminConfig, DatabaseConfig},
    error::{AppError, Result},
    models::{ClientType, UserRole},
    queries::user_queries::{self, NewUser},
};

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    tracing::info!(
        "Database connection established with {} max connections",
        config.max_connections
    );

    Ok(pool)
}

pub async fn check_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Creates the default administrator account if it does not exist yet.
pub async fn seed_admin(pool: &PgPool, admin: &AdminConfig) -> Result<()> {
    if user_queries::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::info!("Default admin already exists");
        return Ok(());
    }

    let password_hash = bcrypt::hash(&admin.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(
        pool,
        &NewUser {
            client_type: ClientType::Company,
            name: "Administrator",
            email: &admin.email,
            password_hash: &password_hash,
            cpf: None,
            cnpj: Some("00000000000000"),
            phone: "00000000000",
            street: "-",
            number: "-",
            complement: "-",
            district: "-",
            city: "Rio Claro",
            state: "SP",
            role: UserRole::Admin,
        },
    )
    .await?;

    tracing::info!("Default admin created with id {}", user.id);

    Ok(())
}
