use super::{CodeEnum, UnknownCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a product option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductOptionType {
    Color,
    Size,
    Date,
    Datetime,
    Text,
    Boolean,
    Decimal,
    Integer,
    Input,
    Product,
}

impl CodeEnum for ProductOptionType {
    const TABLE: &'static str = "ProductOptionType";

    fn all() -> &'static [Self] {
        &[
            Self::Color,
            Self::Size,
            Self::Date,
            Self::Datetime,
            Self::Text,
            Self::Boolean,
            Self::Decimal,
            Self::Integer,
            Self::Input,
            Self::Product,
        ]
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Color => "COLOR",
            Self::Size => "SIZE",
            Self::Date => "DATE",
            Self::Datetime => "DATETIME",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Decimal => "DECIMAL",
            Self::Integer => "INTEGER",
            Self::Input => "INPUT",
            Self::Product => "PRODUCT",
        }
    }

    fn friendly_name(&self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Size => "Size",
            Self::Date => "Date",
            Self::Datetime => "Date Time",
            Self::Text => "Text",
            Self::Boolean => "Boolean",
            Self::Decimal => "Decimal",
            Self::Integer => "Integer",
            Self::Input => "Input",
            Self::Product => "Product",
        }
    }
}

impl fmt::Display for ProductOptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProductOptionType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode {
            table: Self::TABLE,
            code: s.to_string(),
        })
    }
}
