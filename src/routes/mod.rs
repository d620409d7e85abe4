mod health;
mod indicators;
mod login;
mod orders;
mod production;
mod register;
mod stock;
mod support;
mod transactions;
mod users;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware, dashboard_middleware},
};

pub fn create_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register::register_user))
        .route("/login", post(login::login_user));

    let authenticated = Router::new()
        .route("/profile", get(users::profile))
        .route("/users", put(users::update_me))
        .route("/order", get(orders::user_orders))
        .route("/order/user", post(orders::place_order))
        .route("/stock", get(stock::list_stock))
        .route("/production", get(production::list_productions))
        .route(
            "/support",
            get(support::user_tickets).post(support::create_ticket),
        )
        .route(
            "/support/{id}/message",
            get(support::list_messages).post(support::send_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/role", put(users::update_role))
        .route("/order/admin", get(orders::list_orders))
        .route("/order/{id}", put(orders::update_order_status))
        .route("/stock", post(stock::create_product))
        .route("/stock/{id}", put(stock::update_product))
        .route("/transactions/admin", get(transactions::report))
        .route(
            "/transactions/{id}",
            get(transactions::show).delete(transactions::delete),
        )
        .route("/production", post(production::create_production))
        .route("/production/{id}", put(production::update_production))
        .route("/support/admin", get(support::all_tickets))
        .route("/support/{id}", put(support::update_ticket))
        .route("/indicators", get(indicators::get_indicators))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    let dashboard = Router::new()
        .route("/transactions/dashboard", get(transactions::dashboard))
        .route_layer(middleware::from_fn_with_state(state, dashboard_middleware));

    let api = public.merge(authenticated).merge(admin).merge(dashboard);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api", api)
}
