/// Raw request to move a transaction to another status. Parsed by `decide`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTransactionStatus {
    pub transaction_id: String,
    pub status: String,
    pub cart_id: Option<String>,
}
