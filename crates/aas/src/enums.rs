//! Enumerations of the AAS V3.0 metamodel.
//!
//! The serde renames carry the external tokens used by the AAS JSON format,
//! which are the same tokens the XML schema uses.

use serde::{Deserialize, Serialize};

/// Whether an asset is a type, an instance, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Type,
    Instance,
    NotApplicable,
}

/// Kind of a submodel: template or instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModellingKind {
    Template,
    Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceTypes {
    ExternalReference,
    ModelReference,
}

/// Type of a single key segment inside a [`Reference`](crate::Reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyTypes {
    AnnotatedRelationshipElement,
    AssetAdministrationShell,
    BasicEventElement,
    Blob,
    Capability,
    ConceptDescription,
    DataElement,
    Entity,
    EventElement,
    File,
    FragmentReference,
    GlobalReference,
    Identifiable,
    MultiLanguageProperty,
    Operation,
    Property,
    Range,
    Referable,
    ReferenceElement,
    RelationshipElement,
    Submodel,
    SubmodelElement,
    SubmodelElementCollection,
    SubmodelElementList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualifierKind {
    ValueQualifier,
    ConceptQualifier,
    TemplateQualifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    CoManagedEntity,
    SelfManagedEntity,
}

/// Direction of a [`BasicEventElement`](crate::BasicEventElement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateOfEvent {
    On,
    Off,
}

/// Kinds of submodel elements.
///
/// Besides naming the concrete variants this enum doubles as the model-type
/// discriminator of [`SubmodelElement`](crate::SubmodelElement) and as the
/// element-type constraint of a [`SubmodelElementList`](crate::SubmodelElementList),
/// which is why it also contains the abstract kinds (`DataElement`,
/// `EventElement`, `SubmodelElement`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AasSubmodelElements {
    AnnotatedRelationshipElement,
    BasicEventElement,
    Blob,
    Capability,
    DataElement,
    Entity,
    EventElement,
    File,
    MultiLanguageProperty,
    Operation,
    Property,
    Range,
    ReferenceElement,
    RelationshipElement,
    SubmodelElement,
    SubmodelElementCollection,
    SubmodelElementList,
}

/// XML Schema built-in data types usable as value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTypeDefXsd {
    #[serde(rename = "xs:anyURI")]
    AnyUri,
    #[serde(rename = "xs:base64Binary")]
    Base64Binary,
    #[serde(rename = "xs:boolean")]
    Boolean,
    #[serde(rename = "xs:byte")]
    Byte,
    #[serde(rename = "xs:date")]
    Date,
    #[serde(rename = "xs:dateTime")]
    DateTime,
    #[serde(rename = "xs:decimal")]
    Decimal,
    #[serde(rename = "xs:double")]
    Double,
    #[serde(rename = "xs:duration")]
    Duration,
    #[serde(rename = "xs:float")]
    Float,
    #[serde(rename = "xs:gDay")]
    GDay,
    #[serde(rename = "xs:gMonth")]
    GMonth,
    #[serde(rename = "xs:gMonthDay")]
    GMonthDay,
    #[serde(rename = "xs:gYear")]
    GYear,
    #[serde(rename = "xs:gYearMonth")]
    GYearMonth,
    #[serde(rename = "xs:hexBinary")]
    HexBinary,
    #[serde(rename = "xs:int")]
    Int,
    #[serde(rename = "xs:integer")]
    Integer,
    #[serde(rename = "xs:long")]
    Long,
    #[serde(rename = "xs:negativeInteger")]
    NegativeInteger,
    #[serde(rename = "xs:nonNegativeInteger")]
    NonNegativeInteger,
    #[serde(rename = "xs:nonPositiveInteger")]
    NonPositiveInteger,
    #[serde(rename = "xs:positiveInteger")]
    PositiveInteger,
    #[serde(rename = "xs:short")]
    Short,
    #[serde(rename = "xs:string")]
    String,
    #[serde(rename = "xs:time")]
    Time,
    #[serde(rename = "xs:unsignedByte")]
    UnsignedByte,
    #[serde(rename = "xs:unsignedInt")]
    UnsignedInt,
    #[serde(rename = "xs:unsignedLong")]
    UnsignedLong,
    #[serde(rename = "xs:unsignedShort")]
    UnsignedShort,
}

/// Data types of the IEC 61360 data specification content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataTypeIec61360 {
    Date,
    String,
    StringTranslatable,
    IntegerMeasure,
    IntegerCount,
    IntegerCurrency,
    RealMeasure,
    RealCount,
    RealCurrency,
    Boolean,
    Iri,
    Irdi,
    Rational,
    RationalMeasure,
    Time,
    Timestamp,
    File,
    Html,
    Blob,
}
