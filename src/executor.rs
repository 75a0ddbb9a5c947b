//! Statement execution over `may_postgres`.
//!
//! The [`Executor`] trait is the seam between the repository and the database. The
//! repository builds statements with sea-query and hands the SQL plus bound values to
//! an executor. Calls block the current coroutine.

use crate::mapper::ColumnReader;
use crate::transaction::{IsolationLevel, Transaction, TransactionError};
use crate::value_conversion::with_converted_params;
use may_postgres::types::ToSql;
use may_postgres::{Client, Error as PostgresError, Row};
use sea_query::Values;
use std::fmt;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Store error type
#[derive(Debug)]
pub enum StoreError {
    /// `PostgreSQL` error from `may_postgres`
    PostgresError(PostgresError),
    /// Query execution error
    QueryError(String),
    /// Row parsing/conversion error
    ParseError(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::PostgresError(e) => write!(f, "PostgreSQL error: {e}"),
            StoreError::QueryError(s) => write!(f, "Query error: {s}"),
            StoreError::ParseError(s) => write!(f, "Parse error: {s}"),
            StoreError::Other(s) => write!(f, "Execution error: {s}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::PostgresError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PostgresError> for StoreError {
    fn from(err: PostgresError) -> Self {
        StoreError::PostgresError(err)
    }
}

/// Trait for executing database statements
///
/// Lets the repository run against a direct client, a transaction or a scripted test
/// double interchangeably. Statements arrive as SQL plus the `Values` sea-query bound
/// to it; rows come back as anything the mapper can read.
pub trait Executor {
    type Row: ColumnReader;

    /// Execute a statement and return the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the statement fails.
    fn execute(&self, query: &str, values: &Values) -> Result<u64, StoreError>;

    /// Execute a query and return all rows.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Self::Row>, StoreError>;
}

impl<E: Executor + ?Sized> Executor for &E {
    type Row = E::Row;

    fn execute(&self, query: &str, values: &Values) -> Result<u64, StoreError> {
        (**self).execute(query, values)
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Self::Row>, StoreError> {
        (**self).query_all(query, values)
    }
}

/// Implementation of `Executor` for `may_postgres::Client`
pub struct MayPostgresExecutor {
    client: Client,
}

impl MayPostgresExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn into_client(self) -> Client {
        self.client
    }

    /// Start a new transaction on this connection.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError` if the transaction cannot be started.
    pub fn begin(&self) -> Result<Transaction, TransactionError> {
        Transaction::new(self.client.clone())
    }

    /// Start a new transaction with an explicit isolation level.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError` if the transaction cannot be started.
    pub fn begin_with_isolation(
        &self,
        isolation_level: IsolationLevel,
    ) -> Result<Transaction, TransactionError> {
        Transaction::new_with_isolation(self.client.clone(), isolation_level)
    }

    /// Run `SELECT 1` to verify the connection is alive.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the health check query fails.
    pub fn check_health(&self) -> Result<bool, StoreError> {
        crate::connection::check_connection_health(&self.client)
            .map_err(|e| StoreError::Other(format!("Health check error: {e}")))
    }

    /// Execute plain SQL without parameters, e.g. DDL.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the statement fails.
    pub fn execute_raw(&self, query: &str) -> Result<u64, StoreError> {
        run_execute(&self.client, query, &[])
    }
}

impl Executor for MayPostgresExecutor {
    type Row = Row;

    fn execute(&self, query: &str, values: &Values) -> Result<u64, StoreError> {
        with_converted_params(values, |params| run_execute(&self.client, query, params))
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Row>, StoreError> {
        with_converted_params(values, |params| run_query(&self.client, query, params))
    }
}

pub(crate) fn run_execute(
    client: &Client,
    query: &str,
    params: &[&dyn ToSql],
) -> Result<u64, StoreError> {
    timed(query, || client.execute(query, params))
}

pub(crate) fn run_query(
    client: &Client,
    query: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Row>, StoreError> {
    timed(query, || client.query(query, params))
}

fn timed<T>(
    query: &str,
    run: impl FnOnce() -> Result<T, PostgresError>,
) -> Result<T, StoreError> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::execute_query_span(query).entered();

    let start = Instant::now();
    let result = run().map_err(|e| {
        #[cfg(feature = "metrics")]
        METRICS.record_query_error();
        StoreError::PostgresError(e)
    });

    let duration = start.elapsed();
    #[cfg(feature = "metrics")]
    METRICS.record_query_duration(duration);
    log::trace!("{query} finished in {duration:?}");

    result
}
