//! # Shellwork AAS Serialization Module
//!
//! This crate converts Asset Administration Shell (AAS) V3.0 environments
//! from [`shellwork_aas`] to and from the namespaced XML format of the AAS
//! XML schema.
//!
//! ## Features
//!
//! - **Schema order**: every element's children are written in the order the
//!   schema fixes, and read back strictly in that order.
//! - **Omission**: absent or empty optional fields produce no element at all.
//! - **Tagged dispatch**: polymorphic submodel elements and data specification
//!   contents are written under the tag of their model type and decoded by
//!   looking that tag up, never by inspecting which fields are filled.
//! - **Deep trees**: nested collections, lists, entities and operations are
//!   traversed with explicit work stacks.
//!
//! ## Examples
//!
//! ```
//! use shellwork_aas::{AssetAdministrationShell, AssetInformation, AssetKind, Environment};
//! use shellwork_serde::{from_xml_str, to_xml_string};
//!
//! let shell = AssetAdministrationShell::new(
//!     "urn:example:aas:1",
//!     AssetInformation::new(AssetKind::Instance),
//! );
//! let env = Environment {
//!     asset_administration_shells: Some(vec![shell]),
//!     ..Default::default()
//! };
//!
//! let xml = to_xml_string(&env)?;
//! assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
//! assert_eq!(from_xml_str(&xml)?, env);
//! # Ok::<(), shellwork_serde::SerdeError>(())
//! ```

pub mod config;
pub mod error;
pub mod xml;

// Re-export common types and functions
pub use config::XmlConfig;
pub use error::{Result, SerdeError};

pub use xml::{
    from_xml_reader, from_xml_slice, from_xml_str, from_xml_str_with_config, to_xml_string,
    to_xml_string_with_config, to_xml_vec, to_xml_writer, to_xml_writer_with_config,
};
