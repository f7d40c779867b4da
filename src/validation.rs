//! Path segment validation and identifier normalization.
//!
//! Every user-supplied resource name or entity id passes through a
//! [`NameValidator`] before it reaches a storage backend, so a segment can
//! never escape its parent directory or carry separator characters.

use std::fmt;

use thiserror::Error;

/// Why a proposed segment name was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("File or folder name is empty")]
    Empty,

    #[error("File or folder name is not a string")]
    NotAString,

    #[error("File or folder name contains invalid characters")]
    InvalidCharacters,
}

/// A resource name or entity id as supplied by a caller.
///
/// Numeric ids are accepted at the boundary and normalized once to their
/// decimal string form via [`Identifier::canonical`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Text(String),
    Integer(i64),
}

impl Identifier {
    /// The string form used as the directory name.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Text(text) => f.write_str(text),
            Identifier::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Identifier::Text(value.clone())
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Integer(value.into())
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Integer(value)
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Identifier::Integer(value.into())
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        // Values beyond i64 keep their exact decimal form as text.
        match i64::try_from(value) {
            Ok(value) => Identifier::Integer(value),
            Err(_) => Identifier::Text(value.to_string()),
        }
    }
}

/// Decides whether a string is an acceptable path segment.
pub trait NameValidator: Send + Sync {
    /// Accept or reject a proposed segment name.
    fn validate(&self, name: &str) -> Result<(), NameError>;

    /// Validate a raw, possibly absent identifier without coercing it.
    ///
    /// Absent values are [`NameError::Empty`]; integers are
    /// [`NameError::NotAString`]. This is the strict check for callers that
    /// hold an uncoerced identifier. The store itself never calls it:
    /// [`Resource`](crate::Resource) normalizes numeric ids with
    /// [`Identifier::canonical`] and then validates the text with
    /// [`validate`](Self::validate).
    fn validate_identifier(&self, name: Option<&Identifier>) -> Result<(), NameError> {
        match name {
            None => Err(NameError::Empty),
            Some(Identifier::Integer(_)) => Err(NameError::NotAString),
            Some(Identifier::Text(text)) => self.validate(text),
        }
    }
}

/// Accepts non-empty names made only of ASCII letters, digits, `_`, `-` and space.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpecialCharsValidator;

impl NameValidator for NoSpecialCharsValidator {
    fn validate(&self, name: &str) -> Result<(), NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' ');
        if !name.chars().all(allowed) {
            return Err(NameError::InvalidCharacters);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        let validator = NoSpecialCharsValidator;
        let names = [
            "kdsjfskdjfsk",
            "sdSf992",
            "subresource1",
            "00000000000",
            "with space",
            "a_b-c",
        ];
        for name in names {
            assert_eq!(validator.validate(name), Ok(()), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_separators_and_special_chars() {
        let validator = NoSpecialCharsValidator;
        for name in ["sdf/", "sdf\\*#&", "/", "..", "a.json", "tab\there", "é"] {
            assert_eq!(validator.validate(name), Err(NameError::InvalidCharacters), "{name:?}");
        }
    }

    #[test]
    fn distinguishes_empty_absent_and_non_string() {
        let validator = NoSpecialCharsValidator;
        assert_eq!(validator.validate(""), Err(NameError::Empty));
        assert_eq!(validator.validate_identifier(None), Err(NameError::Empty));
        assert_eq!(
            validator.validate_identifier(Some(&Identifier::Integer(1))),
            Err(NameError::NotAString)
        );
        assert_eq!(validator.validate_identifier(Some(&Identifier::from("ok"))), Ok(()));
    }

    #[test]
    fn numeric_identifiers_normalize_to_decimal_text() {
        assert_eq!(Identifier::from(42).canonical(), "42");
        assert_eq!(Identifier::from(-7i64).canonical(), "-7");
        assert_eq!(Identifier::from(u64::MAX).canonical(), u64::MAX.to_string());
        assert_eq!(Identifier::from("an-ID").canonical(), "an-ID");

        let coerced = Identifier::from(Identifier::from(7).canonical());
        assert_eq!(NoSpecialCharsValidator.validate_identifier(Some(&coerced)), Ok(()));
    }
}
