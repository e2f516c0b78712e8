//! Submodels and the polymorphic submodel element tree.

use serde::{Deserialize, Serialize};

use crate::common::{
    AdministrativeInformation, ElementBase, HasSemantics, LangString, Qualifier, Referable,
    SpecificAssetId,
};
use crate::data_specification::EmbeddedDataSpecification;
use crate::enums::{
    AasSubmodelElements, DataTypeDefXsd, Direction, EntityType, ModellingKind, StateOfEvent,
};
use crate::reference::Reference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submodel {
    #[serde(flatten)]
    pub referable: Referable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ModellingKind>,
    #[serde(flatten)]
    pub semantics: HasSemantics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<Vec<Qualifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_data_specifications: Option<Vec<EmbeddedDataSpecification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submodel_elements: Option<Vec<SubmodelElement>>,
}

impl Submodel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            referable: Referable::default(),
            administration: None,
            id: id.into(),
            kind: None,
            semantics: HasSemantics::default(),
            qualifiers: None,
            embedded_data_specifications: None,
            submodel_elements: None,
        }
    }
}

/// A node of a submodel's element tree.
///
/// The variant is the model-type discriminator; [`SubmodelElement::model_type`]
/// exposes it as an [`AasSubmodelElements`] value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "modelType")]
pub enum SubmodelElement {
    Property(Property),
    MultiLanguageProperty(MultiLanguageProperty),
    Range(Range),
    Blob(Blob),
    File(File),
    ReferenceElement(ReferenceElement),
    RelationshipElement(RelationshipElement),
    AnnotatedRelationshipElement(AnnotatedRelationshipElement),
    Operation(Operation),
    Capability(Capability),
    Entity(Entity),
    BasicEventElement(BasicEventElement),
    SubmodelElementCollection(SubmodelElementCollection),
    SubmodelElementList(SubmodelElementList),
}

impl SubmodelElement {
    pub fn model_type(&self) -> AasSubmodelElements {
        match self {
            SubmodelElement::Property(_) => AasSubmodelElements::Property,
            SubmodelElement::MultiLanguageProperty(_) => AasSubmodelElements::MultiLanguageProperty,
            SubmodelElement::Range(_) => AasSubmodelElements::Range,
            SubmodelElement::Blob(_) => AasSubmodelElements::Blob,
            SubmodelElement::File(_) => AasSubmodelElements::File,
            SubmodelElement::ReferenceElement(_) => AasSubmodelElements::ReferenceElement,
            SubmodelElement::RelationshipElement(_) => AasSubmodelElements::RelationshipElement,
            SubmodelElement::AnnotatedRelationshipElement(_) => {
                AasSubmodelElements::AnnotatedRelationshipElement
            }
            SubmodelElement::Operation(_) => AasSubmodelElements::Operation,
            SubmodelElement::Capability(_) => AasSubmodelElements::Capability,
            SubmodelElement::Entity(_) => AasSubmodelElements::Entity,
            SubmodelElement::BasicEventElement(_) => AasSubmodelElements::BasicEventElement,
            SubmodelElement::SubmodelElementCollection(_) => {
                AasSubmodelElements::SubmodelElementCollection
            }
            SubmodelElement::SubmodelElementList(_) => AasSubmodelElements::SubmodelElementList,
        }
    }

    /// Data elements are the variants allowed as relationship annotations.
    pub fn is_data_element(&self) -> bool {
        matches!(
            self,
            SubmodelElement::Property(_)
                | SubmodelElement::MultiLanguageProperty(_)
                | SubmodelElement::Range(_)
                | SubmodelElement::Blob(_)
                | SubmodelElement::File(_)
                | SubmodelElement::ReferenceElement(_)
        )
    }

    pub fn base(&self) -> &ElementBase {
        match self {
            SubmodelElement::Property(e) => &e.base,
            SubmodelElement::MultiLanguageProperty(e) => &e.base,
            SubmodelElement::Range(e) => &e.base,
            SubmodelElement::Blob(e) => &e.base,
            SubmodelElement::File(e) => &e.base,
            SubmodelElement::ReferenceElement(e) => &e.base,
            SubmodelElement::RelationshipElement(e) => &e.base,
            SubmodelElement::AnnotatedRelationshipElement(e) => &e.base,
            SubmodelElement::Operation(e) => &e.base,
            SubmodelElement::Capability(e) => &e.base,
            SubmodelElement::Entity(e) => &e.base,
            SubmodelElement::BasicEventElement(e) => &e.base,
            SubmodelElement::SubmodelElementCollection(e) => &e.base,
            SubmodelElement::SubmodelElementList(e) => &e.base,
        }
    }

    pub fn id_short(&self) -> Option<&str> {
        self.base().referable.id_short.as_deref()
    }

    /// Moves out the elements nested directly in this one.
    fn take_nested(&mut self) -> Vec<SubmodelElement> {
        match self {
            SubmodelElement::AnnotatedRelationshipElement(e) => {
                e.annotations.take().unwrap_or_default()
            }
            SubmodelElement::Operation(e) => [
                e.input_variables.take(),
                e.output_variables.take(),
                e.inoutput_variables.take(),
            ]
            .into_iter()
            .flatten()
            .flatten()
            .map(|variable| variable.value)
            .collect(),
            SubmodelElement::Entity(e) => e.statements.take().unwrap_or_default(),
            SubmodelElement::SubmodelElementCollection(e) => e.value.take().unwrap_or_default(),
            SubmodelElement::SubmodelElementList(e) => e.value.take().unwrap_or_default(),
            SubmodelElement::Property(_)
            | SubmodelElement::MultiLanguageProperty(_)
            | SubmodelElement::Range(_)
            | SubmodelElement::Blob(_)
            | SubmodelElement::File(_)
            | SubmodelElement::ReferenceElement(_)
            | SubmodelElement::RelationshipElement(_)
            | SubmodelElement::Capability(_)
            | SubmodelElement::BasicEventElement(_) => Vec::new(),
        }
    }
}

impl Drop for SubmodelElement {
    /// Drains nested elements into a work list so deep trees do not recurse.
    fn drop(&mut self) {
        let mut pending = self.take_nested();
        while let Some(mut element) = pending.pop() {
            pending.append(&mut element.take_nested());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(flatten)]
    pub base: ElementBase,
    pub value_type: DataTypeDefXsd,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

impl Property {
    pub fn new(base: ElementBase, value_type: DataTypeDefXsd, value: Option<String>) -> Self {
        Self {
            base,
            value_type,
            value,
            value_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiLanguageProperty {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<LangString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(flatten)]
    pub base: ElementBase,
    pub value_type: DataTypeDefXsd,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

impl Range {
    pub fn new(base: ElementBase, value_type: DataTypeDefXsd) -> Self {
        Self {
            base,
            value_type,
            min: None,
            max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(
        default,
        with = "crate::serde_helpers::base64_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Vec<u8>>,
    pub content_type: String,
}

impl Blob {
    pub fn new(base: ElementBase, content_type: impl Into<String>) -> Self {
        Self {
            base,
            value: None,
            content_type: content_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub content_type: String,
}

impl File {
    pub fn new(base: ElementBase, content_type: impl Into<String>) -> Self {
        Self {
            base,
            value: None,
            content_type: content_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceElement {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub first: Reference,
    pub second: Reference,
}

impl RelationshipElement {
    pub fn new(base: ElementBase, first: Reference, second: Reference) -> Self {
        Self {
            base,
            first,
            second,
        }
    }
}

/// A relationship whose annotations are data elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRelationshipElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub first: Reference,
    pub second: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<SubmodelElement>>,
}

impl AnnotatedRelationshipElement {
    pub fn new(base: ElementBase, first: Reference, second: Reference) -> Self {
        Self {
            base,
            first,
            second,
            annotations: None,
        }
    }
}

/// Wraps the single submodel element describing an operation argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationVariable {
    pub value: SubmodelElement,
}

impl OperationVariable {
    pub fn new(value: SubmodelElement) -> Self {
        Self { value }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_variables: Option<Vec<OperationVariable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_variables: Option<Vec<OperationVariable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inoutput_variables: Option<Vec<OperationVariable>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(flatten)]
    pub base: ElementBase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<Vec<SubmodelElement>>,
    pub entity_type: EntityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_asset_ids: Option<Vec<SpecificAssetId>>,
}

impl Entity {
    pub fn new(base: ElementBase, entity_type: EntityType) -> Self {
        Self {
            base,
            statements: None,
            entity_type,
            global_asset_id: None,
            specific_asset_ids: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicEventElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub observed: Reference,
    pub direction: Direction,
    pub state: StateOfEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_broker: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_interval: Option<String>,
}

impl BasicEventElement {
    pub fn new(
        base: ElementBase,
        observed: Reference,
        direction: Direction,
        state: StateOfEvent,
    ) -> Self {
        Self {
            base,
            observed,
            direction,
            state,
            message_topic: None,
            message_broker: None,
            last_update: None,
            min_interval: None,
            max_interval: None,
        }
    }
}

/// Unordered set of child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmodelElementCollection {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<SubmodelElement>>,
}

/// Ordered list of child elements of one declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelElementList {
    #[serde(flatten)]
    pub base: ElementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_relevant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_id_list_element: Option<Reference>,
    pub type_value_list_element: AasSubmodelElements,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type_list_element: Option<DataTypeDefXsd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<SubmodelElement>>,
}

impl SubmodelElementList {
    pub fn new(base: ElementBase, type_value_list_element: AasSubmodelElements) -> Self {
        Self {
            base,
            order_relevant: None,
            semantic_id_list_element: None,
            type_value_list_element,
            value_type_list_element: None,
            value: None,
        }
    }
}
