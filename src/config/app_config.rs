use std::{env, str::FromStr};

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub admin: Option<AdminConfig>,
    pub orders: OrderConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub dashboard_api_key: String,
}

/// Default administrator seeded on startup.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct OrderConfig {
    pub stock_policy: StockPolicy,
}

/// What order placement does when the requested quantity exceeds stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    /// Decrement unconditionally; stock may go negative.
    #[default]
    Unchecked,
    /// Refuse the order with a conflict and roll back.
    Reject,
}

impl FromStr for StockPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unchecked" => Ok(StockPolicy::Unchecked),
            "reject" => Ok(StockPolicy::Reject),
            other => Err(AppError::ConfigError(format!(
                "Invalid STOCK_POLICY value: {}",
                other
            ))),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value", name)))
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::ConfigError(format!("{} not set", name)))
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminConfig { email, password }),
            _ => None,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "3000")?,
                max_body_size: parse_var("MAX_BODY_SIZE", "1048576")?,
            },
            database: DatabaseConfig {
                url: required_var("DB_URL")?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", "20")?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&required_var("FRONTEND_URL")?),
            },
            auth: AuthConfig {
                jwt_secret: required_var("JWT_SECRET")?,
                token_ttl_days: parse_var("TOKEN_TTL_DAYS", "7")?,
                dashboard_api_key: required_var("DASHBOARD_API_KEY")?,
            },
            admin,
            orders: OrderConfig {
                stock_policy: env::var("STOCK_POLICY")
                    .map(|v| v.parse())
                    .unwrap_or(Ok(StockPolicy::default()))?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_policy_parses_case_insensitively() {
        assert_eq!("unchecked".parse::<StockPolicy>().unwrap(), StockPolicy::Unchecked);
        assert_eq!(" Reject ".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert!("floor".parse::<StockPolicy>().is_err());
    }

    #[test]
    fn stock_policy_defaults_to_unchecked() {
        assert_eq!(StockPolicy::default(), StockPolicy::Unchecked);
    }

    #[test]
    fn origins_are_trimmed_and_split() {
        assert_eq!(
            parse_origins("http://localhost:5173, https://portal.example.com ,"),
            vec![
                "http://localhost:5173".to_string(),
                "https://portal.example.com".to_string()
            ]
        );
    }
}
