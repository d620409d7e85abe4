use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub category: String,
}

// NUMERIC(12, 2)
const PRICE_SCALE: u32 = 2;
const PRICE_INTEGER_DIGITS: u32 = 10;

fn valid_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("range").with_message("Price must be zero or greater".into()));
    }

    if value.normalize().scale() > PRICE_SCALE {
        return Err(ValidationError::new("scale")
            .with_message("Price must have at most 2 decimal places".into()));
    }

    if *value >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(ValidationError::new("range")
            .with_message("Price must be less than 10000000000".into()));
    }

    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(custom(function = "valid_price"))]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock must be an integer >= 0"))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[validate(custom(function = "valid_price"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock must be an integer >= 0"))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_price_and_stock() {
        let req = CreateProductRequest {
            name: "Cadeira".to_string(),
            category: "Móveis".to_string(),
            price: Decimal::new(-1, 2),
            stock: Some(-5),
            image_url: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("stock"));
    }

    #[test]
    fn accepts_free_product_without_stock() {
        let req = CreateProductRequest {
            name: "Brinde".to_string(),
            category: "Promo".to_string(),
            price: Decimal::ZERO,
            stock: None,
            image_url: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn price_must_fit_two_decimal_places() {
        let mut req = UpdateProductRequest {
            price: Some(Decimal::new(1005, 3)),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors()["price"][0].code, "scale");

        // trailing zeros are not extra precision
        req.price = Some(Decimal::new(1500, 3));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn price_is_bounded_by_column_precision() {
        let mut req = UpdateProductRequest {
            price: Some(Decimal::from(100_000_000_000_i64)),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors()["price"][0].code, "range");

        req.price = Some(Decimal::new(999_999_999_999, 2));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn product_price_serializes_as_number() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            name: "Mesa".to_string(),
            category: "Móveis".to_string(),
            price: Decimal::new(19990, 2),
            stock: 4,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"].as_f64(), Some(199.9));
    }

    #[test]
    fn update_requires_non_empty_strings_when_present() {
        let req = UpdateProductRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateProductRequest::default().validate().is_ok());
    }
}
