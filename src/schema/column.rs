//! Column definition metadata.
//!
//! `ColumnDefinition` stores what the mapper and the DDL builder need to know about a
//! column: its SQL type, nullability and key role.

use sea_query::{Alias, ColumnDef};

/// SQL type of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Integer,
    Boolean,
    /// Variable length text with a maximum length.
    String(u32),
    /// Fixed precision numeric: (precision, scale).
    Decimal(u32, u32),
}

/// Column definition metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column_type: ColumnType,
    /// Whether the column is nullable
    pub nullable: bool,
    /// Whether the column is (part of) the primary key
    pub primary_key: bool,
    /// Whether the column is indexed
    pub indexed: bool,
}

impl ColumnDefinition {
    pub const fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            nullable: true,
            primary_key: false,
            indexed: false,
        }
    }

    /// Non-null primary key column.
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Convert to SeaQuery's `ColumnDef` for table creation.
    ///
    /// Composite keys are declared on the table, so `primary_key` is only applied here
    /// when `single_key` is set.
    pub fn to_column_def(&self, column_name: &str, single_key: bool) -> ColumnDef {
        let mut def = ColumnDef::new(Alias::new(column_name));
        apply_column_type(self.column_type, &mut def);

        if self.nullable {
            def.null();
        } else {
            def.not_null();
        }

        if self.primary_key && single_key {
            def.primary_key();
        }

        def
    }
}

fn apply_column_type(column_type: ColumnType, def: &mut ColumnDef) {
    match column_type {
        ColumnType::BigInt => {
            def.big_integer();
        }
        ColumnType::Integer => {
            def.integer();
        }
        ColumnType::Boolean => {
            def.boolean();
        }
        ColumnType::String(len) => {
            def.string_len(len);
        }
        ColumnType::Decimal(precision, scale) => {
            def.decimal_len(precision, scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_nullable() {
        let def = ColumnDefinition::new(ColumnType::String(255));
        assert!(def.nullable);
        assert!(!def.primary_key);
        assert!(!def.indexed);
    }

    #[test]
    fn test_primary_key_is_not_null() {
        let def = ColumnDefinition::new(ColumnType::BigInt).primary_key();
        assert!(def.primary_key);
        assert!(!def.nullable);
    }

    #[test]
    fn test_to_column_def() {
        let def = ColumnDefinition::new(ColumnType::Decimal(19, 5));
        // ColumnDef internals are opaque; building it must not panic
        let _ = def.to_column_def("PRICE_ADJUSTMENT", false);
    }
}
