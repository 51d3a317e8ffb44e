use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::modules::transactions::adapters::inbound::envelope::Envelope;
use crate::shell::state::AppState;

pub async fn list_all(State(state): State<AppState>) -> impl IntoResponse {
    match state.queries.list_all().await {
        Ok(transactions) => Json(Envelope::ok().transactions(transactions)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    match state.queries.get(&transaction_id).await {
        Ok(transaction) => Json(Envelope::ok().transaction(transaction)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_by_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> impl IntoResponse {
    match state.queries.list_by_cart(&cart_id).await {
        Ok(transactions) => Json(Envelope::ok().transactions(transactions)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod query_transactions_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
    use crate::modules::transactions::core::transaction::TransactionId;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::app_state::{make_offline_store_app, make_test_app};
    use crate::tests::fixtures::commands::create_transaction::CreateTransactionBuilder;

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/", get(super::list_all))
            .route("/{id}", get(super::get))
            .route("/cart/{cart_id}", get(super::list_by_cart))
            .with_state(state)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn it_should_list_all_transactions() {
        let test_app = make_test_app();
        for cart_id in ["c1", "c2"] {
            test_app
                .store
                .insert(CreateTransactionBuilder::new().cart_id(cart_id).build_new())
                .await
                .unwrap();
        }

        let (status, json) = get_json(app(test_app.state), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn it_should_return_an_empty_list() {
        let (status, json) = get_json(app(make_test_app().state), "/cart/nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["transactions"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn it_should_get_one_transaction() {
        let test_app = make_test_app();
        let stored = test_app
            .store
            .insert(CreateTransactionBuilder::new().build_new())
            .await
            .unwrap();

        let (status, json) = get_json(app(test_app.state), &format!("/{}", stored.id)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["transaction"]["id"], stored.id.to_string());
        assert_eq!(json["transaction"]["cart_id"], stored.cart_id);
    }

    #[tokio::test]
    async fn it_should_list_the_transactions_of_a_cart() {
        let test_app = make_test_app();
        for cart_id in ["c1", "c2", "c1"] {
            test_app
                .store
                .insert(CreateTransactionBuilder::new().cart_id(cart_id).build_new())
                .await
                .unwrap();
        }

        let (_, json) = get_json(app(test_app.state), "/cart/c1").await;

        let transactions = json["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t["cart_id"] == "c1"));
    }

    #[tokio::test]
    async fn it_should_return_400_for_a_malformed_id() {
        let (status, json) = get_json(app(make_test_app().state), "/not-an-id").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "Invalid transaction ID format");
    }

    #[tokio::test]
    async fn it_should_return_404_for_an_absent_transaction() {
        let uri = format!("/{}", TransactionId::generate());
        let (status, json) = get_json(app(make_test_app().state), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn it_should_return_500_when_the_store_is_offline() {
        let (status, json) = get_json(app(make_offline_store_app().state), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
    }
}
