//! Error types shared across the panel
use std::fmt;
use thiserror::Error;

use crate::schema::Datatype;

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// The field is required while visible and would be left empty
    Required,
    /// The value failed its declared datatype check
    Invalid { datatype: Datatype, value: String },
    /// A list was given for an option that holds a single value
    NotScalar,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Required => write!(f, "a value is required"),
            ValidationReason::Invalid { datatype, value } => {
                write!(f, "'{}' is not a valid {}", value, datatype)
            }
            ValidationReason::NotScalar => write!(f, "expected a single value"),
        }
    }
}

/// A field value that failed validation, scoped to its section and option
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{section}.{key}: {reason}")]
pub struct ValidationError {
    pub section: String,
    pub key: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(section: impl Into<String>, key: impl Into<String>, reason: ValidationReason) -> Self {
        ValidationError {
            section: section.into(),
            key: key.into(),
            reason,
        }
    }
}

/// Every validation failure found while checking a whole form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any failure names the given section and option
    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.0.iter().any(|e| e.section == section && e.key == key)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failures of the config store adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("section {section_id} has type {actual}, not {expected}")]
    TypeMismatch {
        section_id: String,
        expected: String,
        actual: String,
    },

    #[error("no {section_type} section named {section_id}")]
    UnknownSection {
        section_type: String,
        section_id: String,
    },
}

/// Failures while fetching the service status.
///
/// These never reach the user: the poller turns every one of them into
/// a not-running status.
#[derive(Debug, Error)]
pub enum StatusLookupError {
    #[error("failed to query the service supervisor: {0}")]
    Transport(#[from] std::io::Error),

    #[error("service supervisor exited with status {code:?}")]
    Exit { code: Option<i32> },

    #[error("service supervisor did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("unreadable service status: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service status has no {0}")]
    Missing(String),
}

/// Errors surfaced by panel-level operations
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration is invalid: {0}")]
    Invalid(ValidationErrors),

    #[error("no {section_type} section named {section_id}")]
    UnknownSection {
        section_type: String,
        section_id: String,
    },

    #[error("index {index} is out of range for {len} sections")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for PanelError {
    fn from(errors: ValidationErrors) -> Self {
        PanelError::Invalid(errors)
    }
}
