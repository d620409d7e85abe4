use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    config::StockPolicy,
    error::{AppError, Result},
    models::{
        AdminOrderView, NewTransactionRecord, Order, OrderCustomer, OrderFilter, OrderStatus,
        OrderWithProduct, PENDING_STATUS_DETAIL, PlacedOrder, Product, Segment,
        UpdateOrderStatusRequest, User, order_total,
    },
    queries::{product_queries, push_date_range, transaction_queries},
};

/// Places an order in one database transaction: the spend/segment update,
/// the stock decrement, the order row and the ledger snapshot either all
/// land or none do.
pub async fn place_order(
    pool: &PgPool,
    user: &User,
    product_id: i32,
    quantity: i32,
    policy: StockPolicy,
) -> Result<PlacedOrder> {
    let mut tx = pool.begin().await?;

    let product = product_queries::find_by_id(&mut *tx, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User or product not found".to_string()))?;

    let total_price = order_total(product.price, quantity);

    // locks the customer row first; a vanished account aborts before any write lands
    let spend: Option<(Decimal, Segment)> = sqlx::query_as(
        "UPDATE users SET total_spent = total_spent + $1, updated_at = NOW()
         WHERE id = $2
         RETURNING total_spent, segment",
    )
    .bind(total_price)
    .bind(user.id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((total_spent, current_segment)) = spend else {
        tx.rollback().await?;
        return Err(AppError::NotFound("User or product not found".to_string()));
    };

    // stock is decremented in SQL so concurrent orders serialize on the row lock
    let decrement = match policy {
        StockPolicy::Unchecked => {
            sqlx::query("UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2")
                .bind(quantity)
                .bind(product.id)
                .execute(&mut *tx)
                .await?
        }
        StockPolicy::Reject => {
            sqlx::query(
                "UPDATE products SET stock = stock - $1, updated_at = NOW()
                 WHERE id = $2 AND stock >= $1",
            )
            .bind(quantity)
            .bind(product.id)
            .execute(&mut *tx)
            .await?
        }
    };

    if decrement.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(match policy {
            StockPolicy::Reject => {
                AppError::Conflict(format!("Insufficient stock for product {}", product.id))
            }
            StockPolicy::Unchecked => AppError::NotFound("User or product not found".to_string()),
        });
    }

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (user_id, product_id, quantity, total_price, city, state, status, status_detail)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(user.id)
    .bind(product.id)
    .bind(quantity)
    .bind(total_price)
    .bind(&user.city)
    .bind(&user.state)
    .bind(OrderStatus::Pending)
    .bind(PENDING_STATUS_DETAIL)
    .fetch_one(&mut *tx)
    .await?;

    let segment = Segment::classify(total_spent);
    if segment != current_segment {
        sqlx::query("UPDATE users SET segment = $1 WHERE id = $2")
            .bind(segment)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
    }

    let record = NewTransactionRecord::snapshot(&order, user, &product, segment);
    transaction_queries::insert_record(&mut *tx, &record).await?;

    tx.commit().await?;

    tracing::info!(
        "Order {} placed: user={}, product={}, quantity={}, total={}, segment={:?}",
        order.id,
        user.id,
        product.id,
        quantity,
        total_price,
        segment
    );

    Ok(PlacedOrder {
        order,
        product_name: product.name,
    })
}

fn push_order_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ");
        query.push_bind(user_id);
    }

    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }

    push_date_range(query, "created_at", filter.start_date, filter.end_date);
}

async fn search_orders(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<Order>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM orders WHERE 1=1");
    push_order_filters(&mut query, filter);
    query.push(" ORDER BY created_at DESC, id DESC");

    let orders = query.build_query_as::<Order>().fetch_all(pool).await?;

    Ok(orders)
}

/// Orders of one user, newest first, each with its product.
pub async fn get_user_orders(
    pool: &PgPool,
    user_id: i32,
    filter: OrderFilter,
) -> Result<Vec<OrderWithProduct>> {
    let filter = OrderFilter {
        user_id: Some(user_id),
        ..filter
    };
    let orders = search_orders(pool, &filter).await?;

    let product_ids: Vec<i32> = orders.iter().map(|o| o.product_id).collect();
    let products = product_queries::find_by_ids(pool, &product_ids).await?;

    Ok(orders
        .into_iter()
        .map(|order| {
            let product = products.get(&order.product_id).cloned();
            OrderWithProduct { order, product }
        })
        .collect())
}

async fn find_customers(pool: &PgPool, ids: &[i32]) -> Result<HashMap<i32, OrderCustomer>> {
    let customers = sqlx::query_as::<_, OrderCustomer>(
        "SELECT id, name, city, state FROM users WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(customers.into_iter().map(|c| (c.id, c)).collect())
}

fn admin_view(
    order: Order,
    products: &HashMap<i32, Product>,
    customers: &HashMap<i32, OrderCustomer>,
) -> AdminOrderView {
    AdminOrderView {
        product: products.get(&order.product_id).cloned(),
        user: customers.get(&order.user_id).cloned(),
        order,
    }
}

/// All orders for the admin panel, with product and customer summary.
pub async fn get_orders(pool: &PgPool, filter: OrderFilter) -> Result<Vec<AdminOrderView>> {
    let orders = search_orders(pool, &filter).await?;

    let product_ids: Vec<i32> = orders.iter().map(|o| o.product_id).collect();
    let user_ids: Vec<i32> = orders.iter().map(|o| o.user_id).collect();
    let products = product_queries::find_by_ids(pool, &product_ids).await?;
    let customers = find_customers(pool, &user_ids).await?;

    Ok(orders
        .into_iter()
        .map(|order| admin_view(order, &products, &customers))
        .collect())
}

pub async fn update_order_status(
    pool: &PgPool,
    id: i32,
    req: &UpdateOrderStatusRequest,
) -> Result<Option<AdminOrderView>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders
         SET status = COALESCE($1, status), status_detail = COALESCE($2, status_detail)
         WHERE id = $3
         RETURNING *",
    )
    .bind(req.status)
    .bind(&req.status_detail)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let products = product_queries::find_by_ids(pool, &[order.product_id]).await?;
    let customers = find_customers(pool, &[order.user_id]).await?;

    Ok(Some(admin_view(order, &products, &customers)))
}

pub async fn get_orders_for_profile(pool: &PgPool, user_id: i32) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}
