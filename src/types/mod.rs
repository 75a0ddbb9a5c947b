//! Closed code tables for the string-backed option columns.
//!
//! Columns such as `OPTION_TYPE` and `VALIDATION_TYPE` hold a short string code.
//! Each code table is a Rust enum plus an explicit two-way mapping to that code.
//! Lookup of an unknown code yields `None`; callers decide whether that is an error.

mod option_type;
mod validation_type;

pub use option_type::ProductOptionType;
pub use validation_type::ProductOptionValidationType;

use std::fmt;

/// A closed enumeration persisted as a string code.
pub trait CodeEnum: Sized + Copy + 'static {
    /// Name of the code table, used in logs and error messages.
    const TABLE: &'static str;

    /// Every member, in declaration order.
    fn all() -> &'static [Self];

    /// The persisted code (e.g. `"COLOR"`).
    fn code(&self) -> &'static str;

    /// Human readable name shown in admin listings.
    fn friendly_name(&self) -> &'static str;

    /// Look up a member by its persisted code. Matching is exact.
    fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.code() == code)
    }
}

/// Error returned when parsing a code that is not part of a code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode {
    pub table: &'static str,
    pub code: String,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {} code: {}", self.table, self.code)
    }
}

impl std::error::Error for UnknownCode {}

/// Resolve an optional stored code into a table member.
///
/// `None` in gives `None` out. An unrecognized code is logged and also read as `None`.
pub(crate) fn resolve_code<T: CodeEnum>(code: Option<&str>) -> Option<T> {
    let code = code?;
    let found = T::from_code(code);
    if found.is_none() {
        log::warn!("ignoring unrecognized {} code {:?}", T::TABLE, code);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_code_none_passes_through() {
        assert_eq!(resolve_code::<ProductOptionType>(None), None);
    }

    #[test]
    fn test_resolve_code_unknown_reads_as_none() {
        assert_eq!(resolve_code::<ProductOptionType>(Some("FLAVOUR")), None);
        assert_eq!(resolve_code::<ProductOptionType>(Some("color")), None);
    }

    #[test]
    fn test_unknown_code_display() {
        let err = UnknownCode {
            table: ProductOptionType::TABLE,
            code: "X".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown ProductOptionType code: X");
    }
}
