use std::{error, fmt};

use serde_json::Error as SerdeError;

/// Error raised while decoding a project document.
#[derive(Debug)]
pub enum DocumentError {
    /// The text is not valid JSON
    Json(SerdeError),
    /// A required field is absent
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },
    /// A field is present but has the wrong shape
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// What the decoder expected to find
        expected: &'static str,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Json(err) => write!(f, "Failed to parse JSON: {}", err),
            DocumentError::MissingField { field } => write!(f, "Missing field '{}'", field),
            DocumentError::InvalidField { field, expected } => {
                write!(f, "Field '{}' must be {}", field, expected)
            }
        }
    }
}

impl error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DocumentError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SerdeError> for DocumentError {
    fn from(err: SerdeError) -> Self {
        DocumentError::Json(err)
    }
}
