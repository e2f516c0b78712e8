//! Attribute groups shared by many node kinds.

use serde::{Deserialize, Serialize};

use crate::data_specification::EmbeddedDataSpecification;
use crate::enums::{DataTypeDefXsd, QualifierKind};
use crate::reference::Reference;

/// A (language, text) pair.
///
/// The metamodel distinguishes several lang-string types by their length
/// constraints (name, text, IEC 61360 preferred name, short name,
/// definition); they share this one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LangString {
    pub language: String,
    pub text: String,
}

impl LangString {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasSemantics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplemental_semantic_ids: Option<Vec<Reference>>,
}

/// A name-keyed, vendor specific attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    #[serde(flatten)]
    pub semantics: HasSemantics,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<DataTypeDefXsd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refers_to: Option<Vec<Reference>>,
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            semantics: HasSemantics::default(),
            name: name.into(),
            value_type: None,
            value: None,
            refers_to: None,
        }
    }
}

/// A typed constraint attached to a qualifiable element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualifier {
    #[serde(flatten)]
    pub semantics: HasSemantics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<QualifierKind>,
    #[serde(rename = "type")]
    pub qualifier_type: String,
    pub value_type: DataTypeDefXsd,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

impl Qualifier {
    pub fn new(qualifier_type: impl Into<String>, value_type: DataTypeDefXsd) -> Self {
        Self {
            semantics: HasSemantics::default(),
            kind: None,
            qualifier_type: qualifier_type.into(),
            value_type,
            value: None,
            value_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_data_specifications: Option<Vec<EmbeddedDataSpecification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// Attributes of every referable node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<Extension>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Vec<LangString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<LangString>>,
}

impl Referable {
    pub fn with_id_short(id_short: impl Into<String>) -> Self {
        Self {
            id_short: Some(id_short.into()),
            ..Self::default()
        }
    }
}

/// Attributes shared by all submodel element variants, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    #[serde(flatten)]
    pub referable: Referable,
    #[serde(flatten)]
    pub semantics: HasSemantics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<Vec<Qualifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_data_specifications: Option<Vec<EmbeddedDataSpecification>>,
}

impl ElementBase {
    pub fn with_id_short(id_short: impl Into<String>) -> Self {
        Self {
            referable: Referable::with_id_short(id_short),
            ..Self::default()
        }
    }
}

/// Address of a file plus its content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A name/value identifier of an asset that is not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificAssetId {
    #[serde(flatten)]
    pub semantics: HasSemantics,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_subject_id: Option<Reference>,
}

impl SpecificAssetId {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            semantics: HasSemantics::default(),
            name: name.into(),
            value: value.into(),
            external_subject_id: None,
        }
    }
}
