//! # catalog-options
//!
//! Product options for a commerce catalog ("Color", "Size", ...) with their allowed
//! values and product references, persisted to PostgreSQL through `may_postgres`.
//!
//! Mapping, caching and admin metadata are plain data here (see [`schema`] and
//! [`presentation`]) rather than attributes on the record.

pub mod config;
pub mod connection;
pub mod executor;
pub mod i18n;
pub mod id;
pub mod mapper;
pub mod metrics;
pub mod model;
pub mod presentation;
pub mod repository;
pub mod schema;
pub mod sku;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod transaction;
pub mod types;
pub mod validation;
pub mod value;
mod value_conversion;

pub use config::CatalogConfig;
pub use executor::{Executor, MayPostgresExecutor, StoreError};
pub use i18n::{InMemoryTranslations, TranslationContext, TranslationProvider};
pub use id::{IdGenerationError, IdGenerator, SegmentIdGenerator, TableIdGenerator};
pub use model::{ProductId, ProductOption, ProductOptionValue};
pub use presentation::AdminMainEntity;
pub use repository::{ProductOptionRepository, RepositoryError};
pub use types::{CodeEnum, ProductOptionType, ProductOptionValidationType};
pub use validation::ValidationError;
pub use value::TriState;
