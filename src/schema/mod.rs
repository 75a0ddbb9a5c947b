//! Explicit mapping tables for the option tables.
//!
//! Each record type has a [`TableMapping`] listing field → column, SQL type and
//! nullability. The mapper and the repository read these tables instead of
//! attributes on the record types, and DDL is generated from the same source.

pub mod column;
pub mod table;

pub use column::{ColumnDefinition, ColumnType};
pub use table::{
    CacheHint, CacheStrategy, ColumnMapping, RelationKind, RelationMapping, TableMapping,
};

use sea_query::{PostgresQueryBuilder, TableCreateStatement};

/// Cache hint shared by the option tables and their relations.
pub const STANDARD_ELEMENTS: CacheHint = CacheHint {
    strategy: CacheStrategy::ReadWrite,
    region: "blStandardElements",
};

pub const PRODUCT_OPTION_TABLE: &str = "BLC_PRODUCT_OPTION";
pub const PRODUCT_OPTION_VALUE_TABLE: &str = "BLC_PRODUCT_OPTION_VALUE";
pub const PRODUCT_OPTION_XREF_TABLE: &str = "BLC_PRODUCT_OPTION_XREF";

/// Id generator segments.
pub const PRODUCT_OPTION_SEGMENT: &str = "ProductOptionImpl";
pub const PRODUCT_OPTION_VALUE_SEGMENT: &str = "ProductOptionValueImpl";

const fn col(column_type: ColumnType) -> ColumnDefinition {
    ColumnDefinition::new(column_type)
}

pub static PRODUCT_OPTION: TableMapping = TableMapping {
    table: PRODUCT_OPTION_TABLE,
    columns: &[
        ColumnMapping::new("id", "PRODUCT_OPTION_ID", col(ColumnType::BigInt).primary_key()),
        ColumnMapping::new("type", "OPTION_TYPE", col(ColumnType::String(255))),
        ColumnMapping::new("attribute_name", "ATTRIBUTE_NAME", col(ColumnType::String(255))),
        ColumnMapping::new("label", "LABEL", col(ColumnType::String(255))),
        ColumnMapping::new("required", "REQUIRED", col(ColumnType::Boolean)),
        ColumnMapping::new(
            "use_in_sku_generation",
            "USE_IN_SKU_GENERATION",
            col(ColumnType::Boolean),
        ),
        ColumnMapping::new("display_order", "DISPLAY_ORDER", col(ColumnType::Integer)),
        ColumnMapping::new("validation_type", "VALIDATION_TYPE", col(ColumnType::String(255))),
        ColumnMapping::new(
            "validation_string",
            "VALIDATION_STRING",
            col(ColumnType::String(255)),
        ),
        ColumnMapping::new("error_code", "ERROR_CODE", col(ColumnType::String(255))),
        ColumnMapping::new("error_message", "ERROR_MESSAGE", col(ColumnType::String(255))),
    ],
    cache: Some(STANDARD_ELEMENTS),
};

pub static PRODUCT_OPTION_VALUE: TableMapping = TableMapping {
    table: PRODUCT_OPTION_VALUE_TABLE,
    columns: &[
        ColumnMapping::new(
            "id",
            "PRODUCT_OPTION_VALUE_ID",
            col(ColumnType::BigInt).primary_key(),
        ),
        ColumnMapping::new("attribute_value", "ATTRIBUTE_VALUE", col(ColumnType::String(255))),
        ColumnMapping::new("display_order", "DISPLAY_ORDER", col(ColumnType::BigInt)),
        ColumnMapping::new(
            "price_adjustment",
            "PRICE_ADJUSTMENT",
            col(ColumnType::Decimal(19, 5)),
        ),
        ColumnMapping::new(
            "product_option_id",
            "PRODUCT_OPTION_ID",
            col(ColumnType::BigInt).indexed(),
        ),
    ],
    cache: Some(STANDARD_ELEMENTS),
};

pub static PRODUCT_OPTION_XREF: TableMapping = TableMapping {
    table: PRODUCT_OPTION_XREF_TABLE,
    columns: &[
        ColumnMapping::new(
            "product_option_id",
            "PRODUCT_OPTION_ID",
            col(ColumnType::BigInt).primary_key(),
        ),
        ColumnMapping::new("product_id", "PRODUCT_ID", col(ColumnType::BigInt).primary_key()),
    ],
    cache: None,
};

/// Relations declared by the product option record.
pub static PRODUCT_OPTION_RELATIONS: &[RelationMapping] = &[
    RelationMapping {
        field: "allowed_values",
        target: PRODUCT_OPTION_VALUE_TABLE,
        kind: RelationKind::OwnedOneToMany {
            foreign_key: "PRODUCT_OPTION_ID",
            order_by: "DISPLAY_ORDER",
        },
        cache: Some(STANDARD_ELEMENTS),
    },
    RelationMapping {
        field: "products",
        target: "BLC_PRODUCT",
        kind: RelationKind::SharedManyToMany {
            join_table: PRODUCT_OPTION_XREF_TABLE,
            join_column: "PRODUCT_OPTION_ID",
            inverse_join_column: "PRODUCT_ID",
            batch_size: 50,
        },
        cache: Some(STANDARD_ELEMENTS),
    },
];

/// Relation mapping for a record field, if it is a relation.
pub fn relation(field: &str) -> Option<&'static RelationMapping> {
    PRODUCT_OPTION_RELATIONS.iter().find(|r| r.field == field)
}

/// Table creation statements for all option tables, parents first.
pub fn create_tables() -> Vec<TableCreateStatement> {
    [&PRODUCT_OPTION, &PRODUCT_OPTION_VALUE, &PRODUCT_OPTION_XREF]
        .iter()
        .map(|mapping| mapping.create_table())
        .collect()
}

/// Postgres DDL for all option tables and their indexes.
pub fn create_tables_sql() -> Vec<String> {
    let mut sql: Vec<String> = create_tables()
        .iter()
        .map(|stmt| stmt.to_string(PostgresQueryBuilder))
        .collect();
    sql.extend(
        PRODUCT_OPTION_VALUE
            .create_indexes()
            .iter()
            .map(|stmt| stmt.to_string(PostgresQueryBuilder)),
    );
    sql
}
