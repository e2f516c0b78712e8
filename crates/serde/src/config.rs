//! Namespace constants and decoding options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::xml::utils;

/// Settings shared by the serializer and the deserializer.
///
/// The defaults produce documents for the AAS V3.0 XML schema. The config
/// derives serde so it can be read from a settings file; keys that are
/// missing keep their default:
///
/// ```
/// use shellwork_serde::XmlConfig;
///
/// let config: XmlConfig = serde_json::from_str(r#"{"indent": 4}"#)?;
/// assert_eq!(config.indent, 4);
/// assert_eq!(config.prefix, "aas");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XmlConfig {
    /// Namespace URI bound to `prefix` on the root element.
    pub namespace: String,
    /// Prefix put in front of every element name when serializing. Decoding
    /// accepts whichever prefix the document's root binds to `namespace`.
    pub prefix: String,
    pub xsi_namespace: String,
    /// Value of the root's `xsi:schemaLocation` attribute.
    pub schema_location: String,
    /// Spaces per nesting level in rendered documents.
    pub indent: usize,
    /// Enumeration schema name -> token to use when decoding meets an unknown
    /// token of that enumeration. Empty unless the caller opts in.
    pub token_fallbacks: BTreeMap<String, String>,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            namespace: utils::AAS_NAMESPACE.to_string(),
            prefix: utils::AAS_PREFIX.to_string(),
            xsi_namespace: utils::XSI_NAMESPACE.to_string(),
            schema_location: utils::AAS_SCHEMA_LOCATION.to_string(),
            indent: 2,
            token_fallbacks: BTreeMap::new(),
        }
    }
}

impl XmlConfig {
    /// Registers the token used in place of unknown tokens of `enum_name`
    /// (for example `"DataTypeDefXsd"` -> `"xs:string"`).
    pub fn with_token_fallback(
        mut self,
        enum_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.token_fallbacks.insert(enum_name.into(), token.into());
        self
    }

    pub fn token_fallback(&self, enum_name: &str) -> Option<&str> {
        self.token_fallbacks.get(enum_name).map(String::as_str)
    }
}
