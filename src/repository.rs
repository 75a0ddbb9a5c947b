//! Persistence of product options.
//!
//! An option is stored across three tables: its own row, one row per owned allowed
//! value, and one cross-reference row per product using it. Values are saved and
//! deleted with their option. Products are only ever referenced.
//!
//! Each operation issues several statements. Run the repository against a
//! [`Transaction`](crate::transaction::Transaction) when they must apply atomically.

use crate::config::CatalogSettings;
use crate::executor::{Executor, StoreError};
use crate::id::{IdGenerationError, IdGenerator};
use crate::mapper::{self, ColumnReader, Mapped, MappingError};
use crate::model::{ProductId, ProductOption, ProductOptionValue};
use crate::schema::{
    self, RelationKind, TableMapping, PRODUCT_OPTION_SEGMENT, PRODUCT_OPTION_VALUE_SEGMENT,
};
use sea_query::{
    Alias, Expr, ExprTrait, OnConflict, Order, PostgresQueryBuilder, Query, Value, Values,
};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Repository error type
#[derive(Debug)]
pub enum RepositoryError {
    /// Statement failed in the store
    Store(StoreError),
    /// Row could not be mapped to or from a record
    Mapping(MappingError),
    /// No id could be assigned
    IdGeneration(IdGenerationError),
    /// No option with this id
    NotFound(i64),
    /// Operation needs a persisted option but the option has no id
    PrimaryKeyRequired,
    /// Statement could not be built
    Query(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Store(e) => write!(f, "{e}"),
            RepositoryError::Mapping(e) => write!(f, "Mapping error: {e}"),
            RepositoryError::IdGeneration(e) => write!(f, "{e}"),
            RepositoryError::NotFound(id) => write!(f, "Product option {id} not found"),
            RepositoryError::PrimaryKeyRequired => {
                write!(f, "Product option has no id; insert it first")
            }
            RepositoryError::Query(s) => write!(f, "Query build error: {s}"),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Store(e) => Some(e),
            RepositoryError::Mapping(e) => Some(e),
            RepositoryError::IdGeneration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        RepositoryError::Store(err)
    }
}

impl From<MappingError> for RepositoryError {
    fn from(err: MappingError) -> Self {
        RepositoryError::Mapping(err)
    }
}

impl From<IdGenerationError> for RepositoryError {
    fn from(err: IdGenerationError) -> Self {
        RepositoryError::IdGeneration(err)
    }
}

fn query_error(err: impl fmt::Display) -> RepositoryError {
    RepositoryError::Query(err.to_string())
}

fn col(name: &'static str) -> Alias {
    Alias::new(name)
}

fn id_column(mapping: &TableMapping) -> Result<&'static str, RepositoryError> {
    mapping
        .id_column()
        .ok_or_else(|| query_error(format!("{} has no single-column key", mapping.table)))
}

/// Product options over any [`Executor`], drawing ids from an [`IdGenerator`].
pub struct ProductOptionRepository<E, G> {
    executor: E,
    ids: G,
    xref_batch_size: usize,
}

impl<E: Executor, G: IdGenerator> ProductOptionRepository<E, G> {
    /// Repository using the product relation's configured batch size.
    pub fn new(executor: E, ids: G) -> Self {
        let xref_batch_size = match schema::relation("products").map(|r| r.kind) {
            Some(RelationKind::SharedManyToMany { batch_size, .. }) => batch_size,
            _ => 50,
        };
        Self {
            executor,
            ids,
            xref_batch_size,
        }
    }

    /// Repository using the configured batch size.
    pub fn from_settings(executor: E, ids: G, settings: &CatalogSettings) -> Self {
        Self::new(executor, ids).with_xref_batch_size(settings.xref_batch_size)
    }

    /// Override how many options' product references are fetched per query.
    #[must_use]
    pub fn with_xref_batch_size(mut self, batch_size: usize) -> Self {
        self.xref_batch_size = batch_size.max(1);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Create the option tables and their indexes if missing.
    pub fn create_tables(&self) -> Result<(), RepositoryError> {
        let empty = Values(Vec::new());
        for sql in schema::create_tables_sql() {
            self.executor.execute(&sql, &empty)?;
        }
        Ok(())
    }

    /// Persist a new option with its allowed values and product references.
    ///
    /// Ids already present on the option or its values are kept. Missing ones are
    /// drawn from the generator and written back to `option` once every statement
    /// has succeeded. On error `option` is left as it was.
    pub fn insert(&self, option: &mut ProductOption) -> Result<i64, RepositoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::repository_span("insert", option.id()).entered();

        let mut staged = option.clone();
        let id = self.ids.assign(PRODUCT_OPTION_SEGMENT, staged.id())?;
        staged.set_id(Some(id));

        let mapping = ProductOption::mapping();
        let mut insert = Query::insert();
        insert
            .into_table(col(mapping.table))
            .columns(mapping.column_names().map(col));
        insert
            .values(record_values(&staged)?.into_iter().map(Expr::val))
            .map_err(query_error)?;
        let (sql, values) = insert.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &values)?;

        self.insert_values(id, &mut staged)?;
        self.insert_xref(id, staged.products())?;

        log::debug!(
            "inserted product option {id} with {} values and {} products",
            staged.allowed_values().len(),
            staged.products().len()
        );
        *option = staged;
        Ok(id)
    }

    /// Load one option with its values and product references.
    pub fn find_by_id(&self, id: i64) -> Result<Option<ProductOption>, RepositoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::repository_span("find_by_id", Some(id)).entered();

        Ok(self.find_many(&[id])?.into_iter().next())
    }

    /// Load several options in the order of `ids`. Unknown ids are skipped.
    ///
    /// Rows are fetched per batch of ids, so the number of statements grows with
    /// `ids.len() / batch_size` rather than with the number of options.
    pub fn find_many(&self, ids: &[i64]) -> Result<Vec<ProductOption>, RepositoryError> {
        let mut found: HashMap<i64, ProductOption> = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(self.xref_batch_size) {
            for option in self.select_options(chunk)? {
                if let Some(id) = option.id() {
                    found.insert(id, option);
                }
            }

            let present: Vec<i64> = chunk
                .iter()
                .copied()
                .filter(|id| found.contains_key(id))
                .collect();
            if present.is_empty() {
                continue;
            }

            let mut values = self.select_values(&present)?;
            let mut products = self.select_products(&present)?;
            for id in &present {
                if let Some(option) = found.get_mut(id) {
                    option.set_allowed_values(values.remove(id).unwrap_or_default());
                    option.set_products(products.remove(id).unwrap_or_default());
                }
            }
        }

        log::debug!("loaded {} of {} product options", found.len(), ids.len());
        let mut result = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(option) = found.remove(id) {
                result.push(option);
            }
        }
        Ok(result)
    }

    /// Rewrite a persisted option.
    ///
    /// Scalar columns are overwritten, the owned values are replaced by the option's
    /// current ones, and the product references are replaced by `option.products()`.
    /// Ids drawn for new values are written back only when every statement succeeded.
    pub fn update(&self, option: &mut ProductOption) -> Result<(), RepositoryError> {
        let id = option.id().ok_or(RepositoryError::PrimaryKeyRequired)?;

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::repository_span("update", Some(id)).entered();

        let mapping = ProductOption::mapping();
        let fields: Vec<&str> = mapping.data_columns().map(|c| c.field).collect();
        let mut update = Query::update();
        update.table(col(mapping.table));
        for (column, value) in mapping
            .data_columns()
            .zip(mapper::field_values(&*option, fields.iter().copied())?)
        {
            update.value(col(column.column), Expr::val(value));
        }
        update.and_where(Expr::col(col(id_column(mapping)?)).eq(id));
        let (sql, values) = update.build(PostgresQueryBuilder);

        if self.executor.execute(&sql, &values)? == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        let mut staged = option.clone();
        self.delete_where(ProductOptionValue::mapping(), "product_option_id", id)?;
        self.insert_values(id, &mut staged)?;
        self.delete_where(&schema::PRODUCT_OPTION_XREF, "product_option_id", id)?;
        self.insert_xref(id, staged.products())?;
        *option = staged;

        log::debug!("updated product option {id}");
        Ok(())
    }

    /// Delete an option and its owned values, and drop its product references.
    ///
    /// Products themselves are left alone. Returns `false` when no option had `id`.
    pub fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::repository_span("delete", Some(id)).entered();

        self.delete_where(ProductOptionValue::mapping(), "product_option_id", id)?;
        self.delete_where(&schema::PRODUCT_OPTION_XREF, "product_option_id", id)?;
        let deleted = self.delete_where(ProductOption::mapping(), "id", id)? > 0;

        log::debug!("deleted product option {id}: {deleted}");
        Ok(deleted)
    }

    /// Reference `product` from option `option_id`. Returns `false` when the
    /// reference already existed.
    pub fn link_product(
        &self,
        option_id: i64,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::repository_span("link_product", Some(option_id)).entered();

        let xref = &schema::PRODUCT_OPTION_XREF;
        let option_col = mapper::column(xref, "product_option_id")?;
        let product_col = mapper::column(xref, "product_id")?;

        let mut insert = Query::insert();
        insert
            .into_table(col(xref.table))
            .columns([col(option_col), col(product_col)]);
        insert
            .values([Expr::val(option_id), Expr::val(product.get())])
            .map_err(query_error)?;
        insert.on_conflict(
            OnConflict::columns([col(option_col), col(product_col)])
                .do_nothing()
                .to_owned(),
        );
        let (sql, values) = insert.build(PostgresQueryBuilder);
        Ok(self.executor.execute(&sql, &values)? > 0)
    }

    /// Remove the reference from option `option_id` to `product`.
    pub fn unlink_product(
        &self,
        option_id: i64,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        #[cfg(feature = "tracing")]
        let _span =
            tracing_helpers::repository_span("unlink_product", Some(option_id)).entered();

        let xref = &schema::PRODUCT_OPTION_XREF;
        let (sql, values) = Query::delete()
            .from_table(col(xref.table))
            .and_where(Expr::col(col(mapper::column(xref, "product_option_id")?)).eq(option_id))
            .and_where(Expr::col(col(mapper::column(xref, "product_id")?)).eq(product.get()))
            .build(PostgresQueryBuilder);
        Ok(self.executor.execute(&sql, &values)? > 0)
    }

    fn insert_values(
        &self,
        option_id: i64,
        option: &mut ProductOption,
    ) -> Result<(), RepositoryError> {
        if option.allowed_values().is_empty() {
            return Ok(());
        }

        let mapping = ProductOptionValue::mapping();
        let mut insert = Query::insert();
        insert
            .into_table(col(mapping.table))
            .columns(mapping.column_names().map(col));

        for value in option.allowed_values_mut() {
            value.id = Some(self.ids.assign(PRODUCT_OPTION_VALUE_SEGMENT, value.id)?);
            value.product_option_id = Some(option_id);
            insert
                .values(record_values(&*value)?.into_iter().map(Expr::val))
                .map_err(query_error)?;
        }

        let (sql, values) = insert.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &values)?;
        Ok(())
    }

    fn insert_xref(&self, option_id: i64, products: &[ProductId]) -> Result<(), RepositoryError> {
        if products.is_empty() {
            return Ok(());
        }

        let xref = &schema::PRODUCT_OPTION_XREF;
        let option_col = mapper::column(xref, "product_option_id")?;
        let product_col = mapper::column(xref, "product_id")?;

        let mut insert = Query::insert();
        insert
            .into_table(col(xref.table))
            .columns([col(option_col), col(product_col)]);
        let mut seen = HashSet::with_capacity(products.len());
        for product in products.iter().filter(|p| seen.insert(**p)) {
            insert
                .values([Expr::val(option_id), Expr::val(product.get())])
                .map_err(query_error)?;
        }
        insert.on_conflict(
            OnConflict::columns([col(option_col), col(product_col)])
                .do_nothing()
                .to_owned(),
        );

        let (sql, values) = insert.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &values)?;
        Ok(())
    }

    fn delete_where(
        &self,
        mapping: &TableMapping,
        field: &str,
        id: i64,
    ) -> Result<u64, RepositoryError> {
        let (sql, values) = Query::delete()
            .from_table(col(mapping.table))
            .and_where(Expr::col(col(mapper::column(mapping, field)?)).eq(id))
            .build(PostgresQueryBuilder);
        Ok(self.executor.execute(&sql, &values)?)
    }

    fn select_options(&self, ids: &[i64]) -> Result<Vec<ProductOption>, RepositoryError> {
        let mapping = ProductOption::mapping();
        let (sql, values) = Query::select()
            .columns(mapping.column_names().map(col))
            .from(col(mapping.table))
            .and_where(Expr::col(col(id_column(mapping)?)).is_in(ids.iter().copied()))
            .build(PostgresQueryBuilder);

        self.executor
            .query_all(&sql, &values)?
            .iter()
            .map(|row| ProductOption::from_reader(row).map_err(RepositoryError::from))
            .collect()
    }

    fn select_values(
        &self,
        option_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<ProductOptionValue>>, RepositoryError> {
        let mapping = ProductOptionValue::mapping();
        let (order_by, foreign_key) = match schema::relation("allowed_values").map(|r| r.kind) {
            Some(RelationKind::OwnedOneToMany {
                order_by,
                foreign_key,
            }) => (order_by, foreign_key),
            _ => (
                mapper::column(mapping, "display_order")?,
                mapper::column(mapping, "product_option_id")?,
            ),
        };

        let (sql, values) = Query::select()
            .columns(mapping.column_names().map(col))
            .from(col(mapping.table))
            .and_where(Expr::col(col(foreign_key)).is_in(option_ids.iter().copied()))
            .order_by(col(order_by), Order::Asc)
            .order_by(col(id_column(mapping)?), Order::Asc)
            .build(PostgresQueryBuilder);

        let mut grouped: HashMap<i64, Vec<ProductOptionValue>> = HashMap::new();
        for row in self.executor.query_all(&sql, &values)? {
            let value = ProductOptionValue::from_reader(&row)?;
            if let Some(owner) = value.product_option_id {
                grouped.entry(owner).or_default().push(value);
            }
        }
        Ok(grouped)
    }

    fn select_products(
        &self,
        option_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<ProductId>>, RepositoryError> {
        let xref = &schema::PRODUCT_OPTION_XREF;
        let option_col = mapper::column(xref, "product_option_id")?;
        let product_col = mapper::column(xref, "product_id")?;

        let (sql, values) = Query::select()
            .columns([col(option_col), col(product_col)])
            .from(col(xref.table))
            .and_where(Expr::col(col(option_col)).is_in(option_ids.iter().copied()))
            .order_by(col(product_col), Order::Asc)
            .build(PostgresQueryBuilder);

        let mut grouped: HashMap<i64, Vec<ProductId>> = HashMap::new();
        for row in self.executor.query_all(&sql, &values)? {
            if let (Some(option), Some(product)) =
                (row.get_i64(option_col)?, row.get_i64(product_col)?)
            {
                grouped.entry(option).or_default().push(ProductId(product));
            }
        }
        Ok(grouped)
    }
}

/// Values of every mapped column of `record`, in mapping order.
fn record_values<M: Mapped>(record: &M) -> Result<Vec<Value>, MappingError> {
    mapper::field_values(record, M::mapping().columns.iter().map(|c| c.field))
}
