//! Scripted executor for exercising the repository and id generators without a
//! database.
//!
//! Every statement is recorded with its bound values. Queries answer with the next
//! queued row set (or nothing); statements answer with the next queued affected count
//! (or 1).

use crate::executor::{Executor, StoreError};
use crate::mapper::ValueRow;
use sea_query::Values;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A statement seen by [`ScriptedExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub values: Values,
}

#[derive(Debug, Default)]
struct Script {
    rows: VecDeque<Vec<ValueRow>>,
    affected: VecDeque<u64>,
    failure: Option<String>,
    statements: Vec<RecordedStatement>,
}

#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    script: Mutex<Script>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next query.
    pub fn push_rows(&self, rows: Vec<ValueRow>) {
        self.with_script(|s| s.rows.push_back(rows));
    }

    /// Queue the affected count returned by the next statement.
    pub fn push_affected(&self, affected: u64) {
        self.with_script(|s| s.affected.push_back(affected));
    }

    /// Make the next statement or query fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_script(|s| s.failure = Some(message));
    }

    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.with_script(|s| s.statements.clone())
    }

    /// SQL of every recorded statement, in order.
    pub fn sql(&self) -> Vec<String> {
        self.with_script(|s| s.statements.iter().map(|st| st.sql.clone()).collect())
    }

    pub fn clear(&self) {
        self.with_script(|s| s.statements.clear());
    }

    fn with_script<T>(&self, f: impl FnOnce(&mut Script) -> T) -> T {
        let mut guard = match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn record(&self, query: &str, values: &Values) -> Result<(), StoreError> {
        self.with_script(|s| {
            s.statements.push(RecordedStatement {
                sql: query.to_string(),
                values: values.clone(),
            });
            match s.failure.take() {
                Some(message) => Err(StoreError::QueryError(message)),
                None => Ok(()),
            }
        })
    }
}

impl Executor for ScriptedExecutor {
    type Row = ValueRow;

    fn execute(&self, query: &str, values: &Values) -> Result<u64, StoreError> {
        self.record(query, values)?;
        Ok(self.with_script(|s| s.affected.pop_front().unwrap_or(1)))
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<ValueRow>, StoreError> {
        self.record(query, values)?;
        Ok(self.with_script(|s| s.rows.pop_front().unwrap_or_default()))
    }
}
