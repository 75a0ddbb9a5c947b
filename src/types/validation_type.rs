use super::{CodeEnum, UnknownCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy used to validate a value supplied for a product option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductOptionValidationType {
    /// The value must fully match the option's validation string.
    Regex,
}

impl CodeEnum for ProductOptionValidationType {
    const TABLE: &'static str = "ProductOptionValidationType";

    fn all() -> &'static [Self] {
        &[Self::Regex]
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Regex => "REGEX",
        }
    }

    fn friendly_name(&self) -> &'static str {
        match self {
            Self::Regex => "Regular Expression",
        }
    }
}

impl fmt::Display for ProductOptionValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProductOptionValidationType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode {
            table: Self::TABLE,
            code: s.to_string(),
        })
    }
}
