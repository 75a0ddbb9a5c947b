//! Table mapping: which record field lives in which column.

use super::column::ColumnDefinition;
use sea_query::{Alias, Index, Table, TableCreateStatement};

/// One field → column entry of a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Record field name.
    pub field: &'static str,
    /// Database column name.
    pub column: &'static str,
    pub def: ColumnDefinition,
}

impl ColumnMapping {
    pub const fn new(field: &'static str, column: &'static str, def: ColumnDefinition) -> Self {
        Self { field, column, def }
    }
}

/// Second-level cache concurrency strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    ReadOnly,
    ReadWrite,
    NonstrictReadWrite,
}

/// Caching hint for a table or relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheHint {
    pub strategy: CacheStrategy,
    pub region: &'static str,
}

/// Explicit mapping of a record type to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMapping {
    pub table: &'static str,
    pub columns: &'static [ColumnMapping],
    pub cache: Option<CacheHint>,
}

impl TableMapping {
    pub fn column(&self, field: &str) -> Option<&ColumnMapping> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.column)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.columns.iter().filter(|c| c.def.primary_key)
    }

    /// Columns written on insert/update, excluding primary key columns.
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.columns.iter().filter(|c| !c.def.primary_key)
    }

    /// The single primary key column. Composite keys return `None`.
    pub fn id_column(&self) -> Option<&'static str> {
        let mut keys = self.primary_key();
        match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key.column),
            _ => None,
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this mapping.
    pub fn create_table(&self) -> TableCreateStatement {
        let single_key = self.primary_key().count() == 1;
        let mut stmt = Table::create();
        stmt.table(Alias::new(self.table)).if_not_exists();

        for column in self.columns {
            stmt.col(column.def.to_column_def(column.column, single_key));
        }

        if !single_key {
            let mut pk = Index::create();
            for key in self.primary_key() {
                pk.col(Alias::new(key.column));
            }
            stmt.primary_key(&mut pk);
        }

        stmt
    }

    /// Secondary index statements for columns flagged `indexed`.
    pub fn create_indexes(&self) -> Vec<sea_query::IndexCreateStatement> {
        self.columns
            .iter()
            .filter(|c| c.def.indexed)
            .map(|c| {
                Index::create()
                    .if_not_exists()
                    .name(format!("IDX_{}_{}", self.table, c.column))
                    .table(Alias::new(self.table))
                    .col(Alias::new(c.column))
                    .to_owned()
            })
            .collect()
    }
}

/// Kind of relation between two mapped tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Child rows are owned: saved and deleted together with the parent.
    OwnedOneToMany {
        foreign_key: &'static str,
        order_by: &'static str,
    },
    /// Shared many-to-many through a join table. Neither side owns the other.
    SharedManyToMany {
        join_table: &'static str,
        join_column: &'static str,
        inverse_join_column: &'static str,
        /// Number of owners whose references are fetched per query.
        batch_size: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMapping {
    pub field: &'static str,
    pub target: &'static str,
    pub kind: RelationKind,
    pub cache: Option<CacheHint>,
}
