use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::transactions::use_cases::create_transaction::inbound::http as create_http;
use crate::modules::transactions::use_cases::delete_transaction::inbound::http as delete_http;
use crate::modules::transactions::use_cases::query_transactions::inbound::http as query_http;
use crate::modules::transactions::use_cases::update_transaction_status::inbound::http as update_status_http;
use crate::shell::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/transactions",
            get(query_http::list_all).post(create_http::handle),
        )
        .route(
            "/api/transactions/",
            get(query_http::list_all).post(create_http::handle),
        )
        .route(
            "/api/transactions/cart/{cart_id}",
            get(query_http::list_by_cart),
        )
        .route(
            "/api/transactions/{id}",
            get(query_http::get)
                .put(update_status_http::handle)
                .delete(delete_http::handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
