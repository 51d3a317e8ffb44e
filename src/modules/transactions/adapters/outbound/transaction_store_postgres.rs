// PostgreSQL implementation of the TransactionStore port.
//
// Responsibilities
// - Persist one row per transaction in `transactions`.
// - Perform the conditional status update as a single UPDATE ... RETURNING statement.

use crate::modules::transactions::adapters::outbound::transaction_store::{
    StatusFilter, StatusUpdate, StoreError, TransactionStore,
};
use crate::modules::transactions::core::status::TransactionStatus;
use crate::modules::transactions::core::transaction::{
    NewTransaction, Transaction, TransactionId,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;
use uuid::Uuid;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id UUID PRIMARY KEY,
        cart_id TEXT NOT NULL,
        transaction_value NUMERIC NOT NULL CHECK (transaction_value >= 0),
        currency TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('pending', 'completed', 'failed', 'refunded')),
        created_at BIGINT NOT NULL,
        updated_at BIGINT NOT NULL
    )
"#;

const CREATE_CART_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS transactions_cart_id_idx ON transactions (cart_id)";

const COLUMNS: &str = "id, cart_id, transaction_value, currency, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    cart_id: String,
    transaction_value: Decimal,
    currency: String,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TransactionStatus>()
            .map_err(|_| StoreError::Corrupt(format!("unknown status {:?}", row.status)))?;
        Ok(Transaction {
            id: TransactionId::from(row.id),
            cart_id: row.cart_id,
            transaction_value: row.transaction_value,
            currency: row.currency,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn backend(context: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{context}: {err}"))
}

pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| backend("Failed to connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| backend("Failed to create transactions table", e))?;
        sqlx::query(CREATE_CART_INDEX)
            .execute(&self.pool)
            .await
            .map_err(|e| backend("Failed to create cart index", e))?;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn insert(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        let record = transaction.into_transaction(TransactionId::generate());
        debug!(transaction_id = %record.id, "Inserting transaction");

        sqlx::query(&format!(
            "INSERT INTO transactions ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(record.id.as_uuid())
        .bind(&record.cart_id)
        .bind(record.transaction_value)
        .bind(&record.currency)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| backend("Failed to insert transaction", e))?;

        Ok(record)
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend("Failed to find transaction", e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend("Failed to list transactions", e))?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn find_by_cart(&self, cart_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE cart_id = $1 ORDER BY created_at, id"
        ))
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend("Failed to list transactions by cart", e))?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn delete_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "DELETE FROM transactions WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend("Failed to delete transaction", e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_one_and_update(
        &self,
        filter: &StatusFilter,
        update: StatusUpdate,
    ) -> Result<Option<Transaction>, StoreError> {
        debug!(
            transaction_id = %filter.id,
            cart_id = %filter.cart_id,
            required = %filter.status,
            target = %update.status,
            "Conditional status update"
        );

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE transactions
            SET status = $4, updated_at = $5
            WHERE id = $1 AND cart_id = $2 AND status = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(filter.id.as_uuid())
        .bind(&filter.cart_id)
        .bind(filter.status.as_str())
        .bind(update.status.as_str())
        .bind(update.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend("Failed to update transaction status", e))?;

        row.map(Transaction::try_from).transpose()
    }
}
