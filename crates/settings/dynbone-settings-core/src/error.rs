//! Error types for the settings store

use std::path::PathBuf;

use crate::value::ValueKind;

/// Errors raised while reading, writing or applying settings records.
///
/// A missing record is not an error: imports report it through
/// [`ImportOutcome::NoSuchRecord`](crate::serializer::ImportOutcome).
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SettingsError {
    /// Reading or writing a settings file failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not well-formed XML
    #[error("Malformed settings document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// The document parsed but its root is not `DynamicBones`
    #[error("Unexpected root element <{found}> in {} (expected <{expected}>)", path.display())]
    UnexpectedRoot {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },

    /// Serializing the document tree back to text failed
    #[error("Failed to emit settings document: {reason}")]
    Emit { reason: String },

    /// Stored text is not a symbol of the target enumeration
    #[error("Invalid value '{value}' for enum {enum_name} in field {field}")]
    InvalidEnumValue {
        field: String,
        enum_name: &'static str,
        value: String,
    },

    /// Stored text is not a valid decimal (or integer) literal
    #[error("Malformed number '{value}' in field {field}")]
    MalformedNumber { field: String, value: String },

    /// Stored text is not a boolean literal
    #[error("Malformed boolean '{value}' in field {field}")]
    MalformedBoolean { field: String, value: String },

    /// A required child element is absent
    #[error("Missing <{element}> in field {field}")]
    MissingElement { field: String, element: &'static str },

    /// A value does not match the kind declared for its field
    #[error("Value kind mismatch in field {field}: expected {expected:?}, got {actual:?}")]
    ValueKindMismatch {
        field: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Record name that cannot be stored and found again
    #[error("Invalid record name '{name}': names must contain a non-whitespace character")]
    InvalidRecordName { name: String },

    /// Configuration rejected by [`SettingsConfig::validate`](crate::config::SettingsConfig::validate)
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SettingsError>;

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the contents of a settings file rather than
    /// by the environment or the caller.
    #[inline]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedDocument { .. }
                | Self::UnexpectedRoot { .. }
                | Self::InvalidEnumValue { .. }
                | Self::MalformedNumber { .. }
                | Self::MalformedBoolean { .. }
                | Self::MissingElement { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::MalformedDocument { .. } | Self::UnexpectedRoot { .. } | Self::Emit { .. } => {
                "document"
            }
            Self::InvalidEnumValue { .. }
            | Self::MalformedNumber { .. }
            | Self::MalformedBoolean { .. }
            | Self::MissingElement { .. }
            | Self::ValueKindMismatch { .. } => "value",
            Self::InvalidRecordName { .. } => "record",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let io = SettingsError::io(
            "a.xml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(io.category(), "io");
        assert!(!io.is_data_error());

        let number = SettingsError::MalformedNumber {
            field: "m_Damping".into(),
            value: "abc".into(),
        };
        assert_eq!(number.category(), "value");
        assert!(number.is_data_error());

        let name = SettingsError::InvalidRecordName { name: " ".into() };
        assert_eq!(name.category(), "record");
        assert!(!name.is_data_error());
    }

    #[test]
    fn test_error_messages() {
        let err = SettingsError::InvalidEnumValue {
            field: "m_FreezeAxis".into(),
            enum_name: "FreezeAxis",
            value: "W".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'W' for enum FreezeAxis in field m_FreezeAxis"
        );
    }
}
