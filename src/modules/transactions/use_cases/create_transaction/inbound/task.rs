// Inbound `transaction.create(cart_id, transaction_value[, currency])` task.
//
// Produces the same envelope as the HTTP create endpoint. Keyword arguments are ignored.

use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::modules::transactions::adapters::inbound::envelope::Envelope;
use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::core::errors::ErrorClass;
use crate::modules::transactions::use_cases::create_transaction::command::CreateTransaction;
use crate::modules::transactions::use_cases::create_transaction::handler::CreateTransactionHandler;

pub const TASK_NAME: &str = "transaction.create";

const USAGE: &str = "transaction.create expects [cart_id, transaction_value, currency?]";

pub fn parse_args(args: &[Json]) -> Option<CreateTransaction> {
    let (cart_id, value, currency) = match args {
        [cart_id, value] => (cart_id, value, None),
        [cart_id, value, currency] => (cart_id, value, Some(currency)),
        _ => return None,
    };
    let cart_id = cart_id.as_str()?.to_string();
    if !(value.is_number() || value.is_string()) {
        return None;
    }
    let transaction_value = serde_json::from_value::<Decimal>(value.clone()).ok()?;
    let currency = match currency {
        None | Some(Json::Null) => None,
        Some(currency) => Some(currency.as_str()?.to_string()),
    };
    Some(CreateTransaction {
        cart_id,
        transaction_value,
        currency,
    })
}

pub async fn handle<TStore>(handler: &CreateTransactionHandler<TStore>, args: &[Json]) -> Envelope
where
    TStore: TransactionStore + ?Sized,
{
    let Some(command) = parse_args(args) else {
        return Envelope::failure(ErrorClass::Validation, USAGE);
    };

    match handler.handle(command).await {
        Ok(transaction) => Envelope::ok()
            .message(format!(
                "Transaction created successfully for cart: {}",
                transaction.cart_id
            ))
            .transaction(transaction),
        Err(err) => Envelope::from_error(&err),
    }
}
