use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTransaction {
    pub cart_id: String,
    pub transaction_value: Decimal,
    pub currency: Option<String>,
}
