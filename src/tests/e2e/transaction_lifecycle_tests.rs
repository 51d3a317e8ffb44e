use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::core::errors::{NotFoundReason, TransactionError};
use crate::modules::transactions::core::status::TransactionStatus;
use crate::modules::transactions::use_cases::update_transaction_status::command::UpdateTransactionStatus;
use crate::shared::infrastructure::task_channel::{CART_QUEUE, TaskChannel, TaskRoutes};
use crate::shell::workers::{Polled, TaskWorker};
use crate::shared::infrastructure::task_channel::TRANSACTION_QUEUE;
use crate::tests::fixtures::app_state::make_test_app;
use crate::tests::fixtures::commands::create_transaction::CreateTransactionBuilder;
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;

fn update(transaction_id: &str, status: &str, cart_id: &str) -> UpdateTransactionStatus {
    UpdateTransactionStatus {
        transaction_id: transaction_id.to_string(),
        status: status.to_string(),
        cart_id: Some(cart_id.to_string()),
    }
}

#[tokio::test]
async fn completes_refunds_and_refuses_to_complete_again() {
    let test_app = make_test_app();
    let state = &test_app.state;

    let created = state
        .create_handler
        .handle(
            CreateTransactionBuilder::new()
                .cart_id("c1")
                .transaction_value(dec!(42.0))
                .currency(Some("USD"))
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(created.status, TransactionStatus::Pending);
    let id = created.id.to_string();

    test_app.clock.advance(1_000);
    let completed = state
        .update_status_handler
        .handle(update(&id, "completed", "c1"))
        .await
        .unwrap();
    test_app.clock.advance(1_000);
    let refunded = state
        .update_status_handler
        .handle(update(&id, "refunded", "c1"))
        .await
        .unwrap();
    let again = state
        .update_status_handler
        .handle(update(&id, "completed", "c1"))
        .await;

    assert_eq!(completed.current, TransactionStatus::Completed);
    assert_eq!(refunded.previous, TransactionStatus::Completed);
    assert_eq!(refunded.current, TransactionStatus::Refunded);
    assert!(refunded.transaction.updated_at > completed.transaction.updated_at);
    assert!(matches!(
        again,
        Err(TransactionError::NotFound(NotFoundReason::StatusMismatch {
            current: TransactionStatus::Refunded,
            required: TransactionStatus::Pending,
        }))
    ));

    let sent = test_app.channel.sent.lock().await.clone();
    let names: Vec<_> = sent.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["cart.completeCheckout", "cart.processRefund"]);
    assert!(sent.iter().all(|t| t.args == vec![json!("c1")]));
    assert!(sent.iter().all(|t| t.queue == CART_QUEUE));
    assert_eq!(test_app.channel.pending(CART_QUEUE).await, 2);

    let stored = state.queries.get(&id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Refunded);
    assert_eq!(stored.created_at, created.created_at);
}

#[tokio::test]
async fn failing_with_the_wrong_cart_leaves_the_transaction_pending() {
    let test_app = make_test_app();
    let created = test_app
        .state
        .create_handler
        .handle(CreateTransactionBuilder::new().cart_id("c1").build())
        .await
        .unwrap();

    let result = test_app
        .state
        .update_status_handler
        .handle(update(&created.id.to_string(), "failed", "c2"))
        .await;

    assert!(matches!(
        result,
        Err(TransactionError::NotFound(NotFoundReason::CartMismatch))
    ));
    let stored = test_app.store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Pending);
    assert!(test_app.channel.sent.lock().await.is_empty());
}

#[tokio::test]
async fn deleting_never_dispatches() {
    let test_app = make_test_app();
    let created = test_app
        .state
        .create_handler
        .handle(CreateTransactionBuilder::new().build())
        .await
        .unwrap();
    test_app
        .state
        .update_status_handler
        .handle(update(&created.id.to_string(), "completed", &created.cart_id))
        .await
        .unwrap();
    let dispatched_before = test_app.channel.sent.lock().await.len();

    test_app
        .state
        .delete_handler
        .handle(&created.id.to_string())
        .await
        .unwrap();

    assert_eq!(test_app.channel.sent.lock().await.len(), dispatched_before);
    assert!(test_app.state.queries.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn many_racing_transitions_produce_a_single_winner() {
    let test_app = make_test_app();
    test_app.store.set_delay_update_ms(5);
    let created = test_app
        .state
        .create_handler
        .handle(CreateTransactionBuilder::new().cart_id("c1").build())
        .await
        .unwrap();
    let id = created.id.to_string();

    let attempts: Vec<_> = ["completed", "failed", "completed", "failed", "completed"]
        .into_iter()
        .map(|status| {
            let handler = test_app.state.update_status_handler.clone();
            let command = update(&id, status, "c1");
            tokio::spawn(async move { handler.handle(command).await })
        })
        .collect();

    let mut winners = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => winners += 1,
            Err(TransactionError::NotFound(NotFoundReason::StatusMismatch { .. })) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(test_app.channel.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn a_transaction_created_by_task_can_be_completed() {
    let test_app = make_test_app();
    let worker = TaskWorker::new(
        test_app.channel.clone(),
        test_app.state.create_handler.clone(),
        TRANSACTION_QUEUE,
        Duration::from_millis(5),
    );
    test_app
        .channel
        .send(TaskRoutes::default().task("transaction.create", vec![json!("c7"), json!(99.9)]))
        .await
        .unwrap();

    let Polled::Handled(envelope) = worker.poll_once().await.unwrap() else {
        panic!("expected a handled task");
    };
    let created = envelope.transaction.expect("transaction expected");

    let completed = test_app
        .state
        .update_status_handler
        .handle(update(&created.id.to_string(), "completed", "c7"))
        .await
        .unwrap();

    assert_eq!(completed.transaction.id, created.id);
    assert_eq!(
        test_app.channel.sent_named("cart.completeCheckout").await[0].args,
        vec![json!("c7")]
    );
}
