use crate::modules::transactions::core::transaction::NewTransaction;
use crate::modules::transactions::use_cases::create_transaction::{
    command::CreateTransaction,
    decision::{DecideError, Decision},
};
use crate::shared::core::primitives::EpochMillis;
use rust_decimal::Decimal;

pub fn decide_create(
    command: CreateTransaction,
    default_currency: &str,
    now: EpochMillis,
) -> Decision {
    if command.cart_id.trim().is_empty() {
        return Decision::Rejected {
            reason: DecideError::MissingCartId,
        };
    }
    if command.transaction_value < Decimal::ZERO {
        return Decision::Rejected {
            reason: DecideError::NegativeValue,
        };
    }
    let currency = match command.currency {
        Some(currency) if currency.trim().is_empty() => {
            return Decision::Rejected {
                reason: DecideError::EmptyCurrency,
            };
        }
        Some(currency) => currency,
        None => default_currency.to_string(),
    };

    Decision::Accepted {
        transaction: NewTransaction {
            cart_id: command.cart_id,
            transaction_value: command.transaction_value,
            currency,
            created_at: now,
        },
    }
}
