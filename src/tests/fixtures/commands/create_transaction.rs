use crate::modules::transactions::core::transaction::NewTransaction;
use crate::modules::transactions::use_cases::create_transaction::command::CreateTransaction;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

pub const FIXTURE_CREATED_AT: i64 = 1_700_000_000_000;

// JSON -> DTO (transport shape)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionDto {
    pub cart_id: String,
    pub transaction_value: Decimal,
    pub currency: Option<String>,
}

pub struct CreateTransactionBuilder {
    inner: CreateTransaction,
}

impl Default for CreateTransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CreateTransactionBuilder {
    pub fn new() -> Self {
        let json_str =
            fs::read_to_string("./src/tests/fixtures/commands/json/create_transaction.json")
                .unwrap();
        let dto: CreateTransactionDto = serde_json::from_str(&json_str).unwrap();

        Self {
            inner: CreateTransaction {
                cart_id: dto.cart_id,
                transaction_value: dto.transaction_value,
                currency: dto.currency,
            },
        }
    }

    pub fn cart_id(mut self, v: impl Into<String>) -> Self {
        self.inner.cart_id = v.into();
        self
    }

    pub fn transaction_value(mut self, v: Decimal) -> Self {
        self.inner.transaction_value = v;
        self
    }

    pub fn currency(mut self, v: Option<&str>) -> Self {
        self.inner.currency = v.map(str::to_string);
        self
    }

    pub fn build(self) -> CreateTransaction {
        self.inner
    }

    /// The validated record a store would receive for this command.
    pub fn build_new(self) -> NewTransaction {
        NewTransaction {
            cart_id: self.inner.cart_id,
            transaction_value: self.inner.transaction_value,
            currency: self.inner.currency.unwrap_or_else(|| "dollar".into()),
            created_at: FIXTURE_CREATED_AT,
        }
    }
}

#[cfg(test)]
mod create_transaction_builder_tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    fn default_delegates_to_new_and_parses_json() {
        let built = CreateTransactionBuilder::default().build();
        assert_eq!(built.cart_id, "cart-fixed-0001");
        assert_eq!(built.transaction_value, dec!(42.0));
        assert_eq!(built.currency.as_deref(), Some("USD"));
    }

    #[rstest]
    fn setters_override_all_fields() {
        let custom = CreateTransactionBuilder::new()
            .cart_id("c9")
            .transaction_value(dec!(7.25))
            .currency(None)
            .build_new();

        assert_eq!(custom.cart_id, "c9");
        assert_eq!(custom.transaction_value, dec!(7.25));
        assert_eq!(custom.currency, "dollar");
        assert_eq!(custom.created_at, FIXTURE_CREATED_AT);
    }
}
