//! Applies an option's validation bundle to a value entered for it.
//!
//! The bundle is the option's validation type, validation string, error code and
//! error message. Only `REGEX` exists today: the whole value must match the pattern.

use crate::model::ProductOption;
use crate::types::ProductOptionValidationType;
use regex::Regex;
use std::fmt;

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required option left empty
    Required { attribute_name: Option<String> },
    /// Value rejected by the option's rule; carries the option's error code and message
    Rejected {
        value: String,
        error_code: Option<String>,
        error_message: Option<String>,
    },
    /// The option's rule itself is unusable (missing or malformed pattern)
    Configuration(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { attribute_name } => write!(
                f,
                "A value is required for {}",
                attribute_name.as_deref().unwrap_or("option")
            ),
            ValidationError::Rejected {
                value,
                error_code,
                error_message,
            } => match (error_message, error_code) {
                (Some(message), _) => write!(f, "{message}"),
                (None, Some(code)) => write!(f, "Invalid value {value:?} ({code})"),
                (None, None) => write!(f, "Invalid value {value:?}"),
            },
            ValidationError::Configuration(s) => write!(f, "Invalid validation rule: {s}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Compiled form of an option's validation bundle.
#[derive(Debug, Clone)]
pub struct OptionValidator {
    attribute_name: Option<String>,
    required: bool,
    pattern: Option<Regex>,
    error_code: Option<String>,
    error_message: Option<String>,
}

impl OptionValidator {
    /// Compile the rule of `option`.
    ///
    /// # Errors
    ///
    /// `ValidationError::Configuration` when the option asks for `REGEX` validation but
    /// has no pattern, or the pattern does not compile.
    pub fn new(option: &ProductOption) -> Result<Self, ValidationError> {
        let pattern = match option.validation_type() {
            None => None,
            Some(ProductOptionValidationType::Regex) => {
                let source = option
                    .validation_string()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        ValidationError::Configuration(format!(
                            "option {:?} uses REGEX validation without a pattern",
                            option.attribute_name().unwrap_or_default()
                        ))
                    })?;
                // anchored so the entire value has to match
                let anchored = format!("^(?:{source})$");
                Some(Regex::new(&anchored).map_err(|e| {
                    ValidationError::Configuration(format!("pattern {source:?}: {e}"))
                })?)
            }
        };

        Ok(Self {
            attribute_name: option.attribute_name().map(str::to_owned),
            required: option.required().unwrap_or(false),
            pattern,
            error_code: option.error_code().map(str::to_owned),
            error_message: option.error_message().map(str::to_owned),
        })
    }

    /// Check `value`. A missing or blank value only fails for required options.
    pub fn validate(&self, value: Option<&str>) -> Result<(), ValidationError> {
        let value = match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None if self.required => {
                return Err(ValidationError::Required {
                    attribute_name: self.attribute_name.clone(),
                })
            }
            None => return Ok(()),
        };

        match &self.pattern {
            Some(pattern) if !pattern.is_match(value) => {
                log::debug!(
                    "value {value:?} rejected for {:?}",
                    self.attribute_name.as_deref().unwrap_or_default()
                );
                Err(ValidationError::Rejected {
                    value: value.to_string(),
                    error_code: self.error_code.clone(),
                    error_message: self.error_message.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Compile and apply `option`'s rule to `value` in one step.
pub fn validate(option: &ProductOption, value: Option<&str>) -> Result<(), ValidationError> {
    OptionValidator::new(option)?.validate(value)
}
