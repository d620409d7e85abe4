use sqlx::PgPool;

use crate::{
    error::Result,
    models::{CreateProductionRequest, Production, ProductionWithProduct, UpdateProductionRequest},
    queries::product_queries,
};

pub async fn list_productions(pool: &PgPool) -> Result<Vec<ProductionWithProduct>> {
    let productions =
        sqlx::query_as::<_, Production>("SELECT * FROM productions ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;

    let product_ids: Vec<i32> = productions.iter().map(|p| p.product_id).collect();
    let products = product_queries::find_by_ids(pool, &product_ids).await?;

    Ok(productions
        .into_iter()
        .map(|production| {
            let product = products.get(&production.product_id).cloned();
            ProductionWithProduct {
                production,
                product,
            }
        })
        .collect())
}

pub async fn create_production(pool: &PgPool, req: &CreateProductionRequest) -> Result<Production> {
    let production = sqlx::query_as::<_, Production>(
        "INSERT INTO productions (product_id, quantity_planned) VALUES ($1, $2) RETURNING *",
    )
    .bind(req.product_id)
    .bind(req.quantity_planned)
    .fetch_one(pool)
    .await?;

    Ok(production)
}

pub async fn update_production(
    pool: &PgPool,
    id: i32,
    req: &UpdateProductionRequest,
) -> Result<Option<Production>> {
    let production = sqlx::query_as::<_, Production>(
        r#"
        UPDATE productions
        SET
            status = COALESCE($1, status),
            quantity_produced = COALESCE($2, quantity_produced)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(req.status)
    .bind(req.quantity_produced)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(production)
}
