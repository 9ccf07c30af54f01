// Configuration-side errors
// These fire before any chain interaction takes place

use thiserror::Error;

/// Errors from the positional parameter parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The delimited string does not carry the expected number of fields
    #[error("expected {expected} comma-separated fields, found {found}")]
    Arity { expected: usize, found: usize },

    /// A positional field failed to parse as its declared type
    #[error("field `{field}`: cannot parse {value:?}: {reason}")]
    Field {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ParseError {
    pub fn field(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParseError::Field {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from client-side range checks on deployment configs. These fire
/// before submission, never after.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A named value fell outside its accepted range
    #[error("{field} out of range: {value} ({constraint})")]
    OutOfRange {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// A required field is empty
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

impl ValidationError {
    pub fn out_of_range(
        field: &'static str,
        value: impl ToString,
        constraint: &'static str,
    ) -> Self {
        ValidationError::OutOfRange {
            field,
            value: value.to_string(),
            constraint,
        }
    }
}

/// Convenient Result type for config construction
pub type ConfigResult<T> = Result<T, ValidationError>;
