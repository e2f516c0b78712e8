//! Constants and small helpers shared by the XML serializer and deserializer.

/// AAS V3.0 namespace URI.
pub const AAS_NAMESPACE: &str = "https://admin-shell.io/aas/3/0";

/// Prefix bound to [`AAS_NAMESPACE`] on every element.
pub const AAS_PREFIX: &str = "aas";

/// XML Schema instance namespace, needed for `xsi:schemaLocation`.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const AAS_SCHEMA_LOCATION: &str = "https://admin-shell.io/aas/3/0 AAS.xsd";

/// Local name of the document root.
pub const ROOT_ELEMENT: &str = "environment";

/// Path of a singular child element.
pub fn child_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent, name)
}

/// Path of the `index`-th entry inside a container.
pub fn indexed_path(parent: &str, name: &str, index: usize) -> String {
    format!("{}/{}[{}]", parent, name, index)
}

/// Converts a Rust boolean to its xs:boolean representation.
pub fn bool_to_string(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

/// Parses the xs:boolean lexical space.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// True for text made only of XML whitespace.
pub fn is_blank(text: &str) -> bool {
    text.bytes()
        .all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}
