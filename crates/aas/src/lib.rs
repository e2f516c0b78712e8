//! # Shellwork AAS model
//!
//! Strongly-typed Rust representation of the Asset Administration Shell (AAS)
//! V3.0 metamodel.
//!
//! The types are plain data: public fields, constructors for the types that
//! have required fields, and `Default` for the ones that don't. They do not
//! validate metamodel constraints. Absent optional values are `None`, which
//! keeps "absent" distinguishable from "present but empty" for codecs.
//!
//! Polymorphic nodes carry their discriminator in the enum variant:
//! [`SubmodelElement::model_type`] and [`DataSpecificationContent::model_type`]
//! expose it without inspecting the populated fields.
//!
//! All types derive serde with the AAS JSON naming, so model instances can be
//! loaded from JSON documents:
//!
//! ```
//! use shellwork_aas::{Environment, Submodel};
//!
//! let env: Environment = serde_json::from_str(r#"{"submodels": [{"id": "urn:sm:1"}]}"#)?;
//! assert_eq!(env.submodels, Some(vec![Submodel::new("urn:sm:1")]));
//! # Ok::<(), serde_json::Error>(())
//! ```

mod common;
mod concept;
mod data_specification;
mod enums;
mod environment;
mod reference;
pub mod serde_helpers;
mod shell;
mod submodel;

pub use common::{
    AdministrativeInformation, ElementBase, Extension, HasSemantics, LangString, Qualifier,
    Referable, Resource, SpecificAssetId,
};
pub use concept::ConceptDescription;
pub use data_specification::{
    DataSpecificationContent, DataSpecificationIec61360, EmbeddedDataSpecification, LevelType,
    ValueList, ValueReferencePair,
};
pub use enums::{
    AasSubmodelElements, AssetKind, DataTypeDefXsd, DataTypeIec61360, Direction, EntityType,
    KeyTypes, ModellingKind, QualifierKind, ReferenceTypes, StateOfEvent,
};
pub use environment::Environment;
pub use reference::{Key, Reference};
pub use shell::{AssetAdministrationShell, AssetInformation};
pub use submodel::{
    AnnotatedRelationshipElement, BasicEventElement, Blob, Capability, Entity, File,
    MultiLanguageProperty, Operation, OperationVariable, Property, Range, ReferenceElement,
    RelationshipElement, Submodel, SubmodelElement, SubmodelElementCollection,
    SubmodelElementList,
};
