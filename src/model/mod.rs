//! Catalog records: the product option, its owned values and product references.

mod product;
mod product_option;
mod product_option_value;

pub use product::ProductId;
pub use product_option::ProductOption;
pub use product_option_value::ProductOptionValue;
