use std::collections::HashMap;

use sqlx::{PgPool, postgres::PgExecutor};

use crate::{
    error::Result,
    models::{CreateProductRequest, Product, UpdateProductRequest},
};

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(product)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<HashMap<i32, Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(products)
}

pub async fn create_product(pool: &PgPool, req: &CreateProductRequest) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, category, price, stock, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.category)
    .bind(req.price)
    .bind(req.stock.unwrap_or(0))
    .bind(&req.image_url)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    req: &UpdateProductRequest,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            category = COALESCE($2, category),
            price = COALESCE($3, price),
            stock = COALESCE($4, stock),
            image_url = COALESCE($5, image_url),
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.category)
    .bind(req.price)
    .bind(req.stock)
    .bind(&req.image_url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}
