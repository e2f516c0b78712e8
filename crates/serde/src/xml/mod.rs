//! XML serialization and deserialization for AAS environments.
//!
//! Both directions go through a generic element tree ([`XmlElement`]):
//!
//! - **Serialization** builds the tree with one transformer per node kind,
//!   prefixes every element name, and renders the document.
//! - **Deserialization** parses the document into a tree, strips the prefix,
//!   and runs the transformers in reverse.
//!
//! ## Model ↔ XML Mapping
//!
//! | Model | XML |
//! |-------|-----|
//! | `id_short: Some("speed")` | `<aas:idShort>speed</aas:idShort>` |
//! | `id_short: None` or `Some("")` | nothing |
//! | `keys: vec![k1, k2]` | `<aas:keys><aas:key>…</aas:key><aas:key>…</aas:key></aas:keys>` |
//! | `qualifiers: Some(vec![])` | nothing |
//! | `SubmodelElement::Property(..)` | `<aas:property>…</aas:property>` |
//! | `ModellingKind::Template` | `<aas:kind>Template</aas:kind>` |
//! | `Blob { value: Some(bytes), .. }` | `<aas:value>` base64 `</aas:value>` |
//!
//! Children always appear in the order of the AAS V3.0 XML schema.
//!
//! ## Namespace Handling
//!
//! The root element declares the AAS namespace on the configured prefix
//! (`xmlns:aas`), the XML Schema instance namespace and the schema location.
//! Every element name carries the prefix; attribute names never do.
//!
//! When decoding, the root must bind its own prefix (or the default namespace)
//! to the AAS namespace URI. That prefix is the one stripped, so documents
//! using another prefix for the same namespace decode as well.
//!
//! ## Examples
//!
//! ```
//! use shellwork_aas::{
//!     DataTypeDefXsd, ElementBase, Environment, Property, Submodel, SubmodelElement,
//! };
//! use shellwork_serde::xml::{from_xml_str, to_xml_string};
//!
//! let mut submodel = Submodel::new("urn:example:sm:nameplate");
//! submodel.submodel_elements = Some(vec![SubmodelElement::Property(Property::new(
//!     ElementBase::with_id_short("ManufacturerName"),
//!     DataTypeDefXsd::String,
//!     Some("ACME".to_string()),
//! ))]);
//! let env = Environment {
//!     submodels: Some(vec![submodel]),
//!     ..Default::default()
//! };
//!
//! let xml = to_xml_string(&env)?;
//! assert_eq!(from_xml_str(&xml)?, env);
//! # Ok::<(), shellwork_serde::SerdeError>(())
//! ```

pub mod de;
mod dispatch;
mod prefix;
pub mod ser;
mod tokens;
mod tree;
pub(crate) mod utils;

pub use de::{from_xml_reader, from_xml_slice, from_xml_str, from_xml_str_with_config};
pub use dispatch::{IEC61360_TAG, dispatch_decode, dispatch_encode, element_kind, element_tag};
pub use prefix::{add_prefix, strip_prefix};
pub use ser::{
    to_xml_string, to_xml_string_with_config, to_xml_vec, to_xml_writer,
    to_xml_writer_with_config,
};
pub use tokens::{UnknownToken, WireToken};
pub use tree::{Descendants, XmlElement, parse_document, render_document};
