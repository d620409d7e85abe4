use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "client_type")]
pub enum ClientType {
    #[sqlx(rename = "PF")]
    #[serde(rename = "PF")]
    Individual,
    #[sqlx(rename = "PJ")]
    #[serde(rename = "PJ")]
    Company,
}

/// Customer tier derived from cumulative spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "customer_segment")]
pub enum Segment {
    Bronze,
    Silver,
    Gold,
}

const SILVER_THRESHOLD: i64 = 5_000;
const GOLD_THRESHOLD: i64 = 10_000;

impl Segment {
    /// Bronze up to 5000 inclusive, Silver up to 10000 inclusive, Gold above.
    pub fn classify(total_spent: Decimal) -> Self {
        if total_spent > Decimal::from(GOLD_THRESHOLD) {
            Segment::Gold
        } else if total_spent > Decimal::from(SILVER_THRESHOLD) {
            Segment::Silver
        } else {
            Segment::Bronze
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub client_type: ClientType,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub phone: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub role: UserRole,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    pub segment: Segment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub role: UserRole,
    pub segment: Segment,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

// Request types

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_document"))]
pub struct RegisterRequest {
    pub client_type: ClientType,
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must have at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "Number is required"))]
    pub number: String,
    #[validate(length(min = 1, message = "Complement is required"))]
    pub complement: String,
    #[validate(length(min = 1, message = "District is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(equal = 2, message = "State must be a 2-letter code"))]
    pub state: String,
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

/// PF registrations carry an 11-digit CPF, PJ registrations a 14-digit CNPJ.
fn validate_document(req: &RegisterRequest) -> Result<(), ValidationError> {
    let (document, len, code) = match req.client_type {
        ClientType::Individual => (req.cpf.as_deref(), 11, "cpf"),
        ClientType::Company => (req.cnpj.as_deref(), 14, "cnpj"),
    };

    match document {
        Some(value) if is_digits(value, len) => Ok(()),
        _ => Err(ValidationError::new(code)
            .with_message(format!("{} must contain {} numeric digits", code.to_uppercase(), len).into())),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "State must be a 2-letter code"))]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: UserRole,
}

// Response types

#[derive(Debug, Serialize)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(client_type: ClientType) -> RegisterRequest {
        RegisterRequest {
            client_type,
            name: "Maria Souza".to_string(),
            cpf: Some("12345678901".to_string()),
            cnpj: None,
            email: "maria@example.com".to_string(),
            password: "s3cretpass".to_string(),
            phone: "19999990000".to_string(),
            street: "Rua 1".to_string(),
            number: "100".to_string(),
            complement: "Apto 2".to_string(),
            district: "Centro".to_string(),
            city: "Rio Claro".to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn classify_uses_inclusive_upper_bounds() {
        assert_eq!(Segment::classify(Decimal::ZERO), Segment::Bronze);
        assert_eq!(Segment::classify(Decimal::from(5000)), Segment::Bronze);
        assert_eq!(Segment::classify(Decimal::new(500001, 2)), Segment::Silver);
        assert_eq!(Segment::classify(Decimal::from(10000)), Segment::Silver);
        assert_eq!(Segment::classify(Decimal::new(1000001, 2)), Segment::Gold);
    }

    #[test]
    fn classify_crossing_thresholds() {
        let before = Decimal::from(4900);
        let after = before + Decimal::from(300);
        assert_eq!(Segment::classify(before), Segment::Bronze);
        assert_eq!(Segment::classify(after), Segment::Silver);

        let after_gold = Decimal::from(9800) + Decimal::from(300);
        assert_eq!(Segment::classify(after_gold), Segment::Gold);
    }

    #[test]
    fn individual_registration_requires_cpf() {
        let mut req = registration(ClientType::Individual);
        assert!(req.validate().is_ok());

        req.cpf = Some("123".to_string());
        let errors = req.validate().unwrap_err();
        let codes: Vec<_> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter().map(|e| e.code.to_string()))
            .collect();
        assert_eq!(codes, vec!["cpf".to_string()]);

        req.cpf = None;
        assert!(req.validate().is_err());
    }

    #[test]
    fn company_registration_requires_cnpj() {
        let mut req = registration(ClientType::Company);
        assert!(req.validate().is_err());

        req.cnpj = Some("12345678000199".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn registration_field_rules() {
        let mut req = registration(ClientType::Individual);
        req.email = "not-an-email".to_string();
        req.password = "short".to_string();
        req.state = "SAO".to_string();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("state"));
    }

    #[test]
    fn client_type_uses_document_codes_on_the_wire() {
        let json = serde_json::to_string(&ClientType::Company).unwrap();
        assert_eq!(json, "\"PJ\"");
        let parsed: ClientType = serde_json::from_str("\"PF\"").unwrap();
        assert_eq!(parsed, ClientType::Individual);
    }

    #[test]
    fn partial_update_skips_absent_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let req = UpdateUserRequest {
            state: Some("Sao Paulo".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
