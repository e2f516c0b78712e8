//! Error types for AAS XML serialization and deserialization.
//!
//! Decoding errors name the offending node with its slash-separated ancestor
//! path, e.g. `/environment/submodels/submodel[0]/submodelElements/property[1]/valueType`.
//! Element names in paths are the unprefixed local names.

use thiserror::Error;

/// Errors produced by the codec.
#[derive(Debug, Error)]
pub enum SerdeError {
    /// An enumeration token has no mapping and no fallback was configured.
    #[error("unknown {enum_name} token '{token}' at {path}")]
    UnknownToken {
        token: String,
        enum_name: &'static str,
        path: String,
    },

    /// Required content is missing, or content sits where the schema does not allow it.
    #[error("schema violation at {path}: {message}")]
    SchemaViolation { path: String, message: String },

    /// A polymorphic element carries a tag the choice dispatcher does not know.
    #[error("unsupported element type '{tag}' at {path}")]
    UnsupportedElementType { tag: String, path: String },

    /// The document is not well-formed XML, or writing it failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl SerdeError {
    pub(crate) fn violation(path: impl Into<String>, message: impl Into<String>) -> Self {
        SerdeError::SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Moves a path relative to some element under that element's `parent` path.
    pub(crate) fn under(mut self, parent: &str) -> Self {
        if let SerdeError::UnknownToken { path, .. }
        | SerdeError::SchemaViolation { path, .. }
        | SerdeError::UnsupportedElementType { path, .. } = &mut self
        {
            *path = format!("{}/{}", parent, path);
        }
        self
    }

    /// Path of the node the error refers to, if it carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            SerdeError::UnknownToken { path, .. }
            | SerdeError::SchemaViolation { path, .. }
            | SerdeError::UnsupportedElementType { path, .. } => Some(path),
            SerdeError::Xml(_) | SerdeError::Io(_) | SerdeError::Utf8(_) => None,
        }
    }
}

impl From<quick_xml::escape::EscapeError> for SerdeError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        SerdeError::Xml(err.into())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SerdeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SerdeError::Xml(err.into())
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, SerdeError>;
