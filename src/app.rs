use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, AuthConfig, StockPolicy},
    database,
    error::{AppError, Result},
    routes,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthConfig,
    pub stock_policy: StockPolicy,
    pub default_admin_email: Option<String>,
}

impl AppState {
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        Self {
            db,
            auth: config.auth.clone(),
            stock_policy: config.orders.stock_policy,
            default_admin_email: config.admin.as_ref().map(|a| a.email.clone()),
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;

    if let Some(admin) = &config.admin {
        database::seed_admin(&pool, admin).await?;
    }

    tracing::info!("Stock policy: {:?}", config.orders.stock_policy);

    router(AppState::new(pool, config), config)
}

/// Wires routes, CORS and body limits around an existing state.
pub fn router(state: AppState, config: &AppConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins)
        .allow_credentials(true);

    let app = routes::create_router(state.clone())
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
