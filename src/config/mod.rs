mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AuthConfig, CorsConfig, DatabaseConfig, OrderConfig, ServerConfig,
    StockPolicy,
};
