//! Transactions over a `may_postgres` connection.
//!
//! Saving an option touches three tables, so callers that need the option, its owned
//! values and its product references to change together run the repository against a
//! [`Transaction`]. Nested transactions map to savepoints.

use crate::executor::{run_execute, run_query, Executor, StoreError};
use crate::value_conversion::with_converted_params;
use may_postgres::{Client, Error as PostgresError, Row};
use sea_query::Values;
use std::fmt;

#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Transaction isolation level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    /// Read committed (default)
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    fn to_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Transaction error type
#[derive(Debug)]
pub enum TransactionError {
    /// PostgreSQL error from may_postgres
    PostgresError(PostgresError),
    /// Transaction already committed or rolled back
    TransactionClosed,
    /// Other transaction errors
    Other(String),
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionError::PostgresError(e) => write!(f, "PostgreSQL error: {e}"),
            TransactionError::TransactionClosed => {
                write!(f, "Transaction has already been committed or rolled back")
            }
            TransactionError::Other(s) => write!(f, "Transaction error: {s}"),
        }
    }
}

impl std::error::Error for TransactionError {}

impl From<PostgresError> for TransactionError {
    fn from(err: PostgresError) -> Self {
        TransactionError::PostgresError(err)
    }
}

impl From<StoreError> for TransactionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PostgresError(e) => TransactionError::PostgresError(e),
            other => TransactionError::Other(other.to_string()),
        }
    }
}

impl From<TransactionError> for StoreError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::PostgresError(e) => StoreError::PostgresError(e),
            TransactionError::TransactionClosed => {
                StoreError::Other("Transaction closed".to_string())
            }
            TransactionError::Other(s) => StoreError::Other(s),
        }
    }
}

/// A database transaction
///
/// Dropping an open transaction does not roll it back; call [`rollback`](Self::rollback)
/// on error paths.
pub struct Transaction {
    client: Client,
    depth: u32,
    closed: bool,
}

impl Transaction {
    pub(crate) fn new(client: Client) -> Result<Self, TransactionError> {
        Self::new_with_isolation(client, IsolationLevel::ReadCommitted)
    }

    pub(crate) fn new_with_isolation(
        client: Client,
        isolation_level: IsolationLevel,
    ) -> Result<Self, TransactionError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::begin_transaction_span().entered();

        run_execute(&client, "BEGIN", &[])?;
        if isolation_level != IsolationLevel::ReadCommitted {
            let isolation_sql = format!(
                "SET TRANSACTION ISOLATION LEVEL {}",
                isolation_level.to_sql()
            );
            run_execute(&client, &isolation_sql, &[])?;
        }

        Ok(Self {
            client,
            depth: 0,
            closed: false,
        })
    }

    /// Start a nested transaction (savepoint).
    pub fn begin_nested(&mut self) -> Result<Transaction, TransactionError> {
        if self.closed {
            return Err(TransactionError::TransactionClosed);
        }

        let savepoint_sql = format!("SAVEPOINT sp_{}", self.depth + 1);
        run_execute(&self.client, &savepoint_sql, &[])?;

        Ok(Transaction {
            client: self.client.clone(),
            depth: self.depth + 1,
            closed: false,
        })
    }

    /// Commit the transaction, or release the savepoint of a nested one.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has already been committed or rolled back.
    pub fn commit(mut self) -> Result<(), TransactionError> {
        if self.closed {
            return Err(TransactionError::TransactionClosed);
        }

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::commit_transaction_span().entered();

        if self.depth == 0 {
            run_execute(&self.client, "COMMIT", &[])?;
        } else {
            let release_sql = format!("RELEASE SAVEPOINT sp_{}", self.depth);
            run_execute(&self.client, &release_sql, &[])?;
        }

        self.closed = true;
        Ok(())
    }

    /// Roll back the transaction, or roll back to the savepoint of a nested one.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has already been committed or rolled back.
    pub fn rollback(mut self) -> Result<(), TransactionError> {
        if self.closed {
            return Err(TransactionError::TransactionClosed);
        }

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::rollback_transaction_span().entered();

        if self.depth == 0 {
            run_execute(&self.client, "ROLLBACK", &[])?;
        } else {
            let rollback_sql = format!("ROLLBACK TO SAVEPOINT sp_{}", self.depth);
            run_execute(&self.client, &rollback_sql, &[])?;
        }

        self.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Other("Transaction is closed".to_string()));
        }
        Ok(())
    }
}

impl Executor for Transaction {
    type Row = Row;

    fn execute(&self, query: &str, values: &Values) -> Result<u64, StoreError> {
        self.ensure_open()?;
        with_converted_params(values, |params| run_execute(&self.client, query, params))
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Row>, StoreError> {
        self.ensure_open()?;
        with_converted_params(values, |params| run_query(&self.client, query, params))
    }
}
